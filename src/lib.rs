#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Cycle-safe structural rendering and readable report layout for captured
//! runtime errors.
//!
//! ## Overview
//!
//! A captured error can be anything: a message, a keyed record, an error with
//! a chain of causes, or a graph that refers back to itself. This crate turns
//! such a value into a deterministic, compact notation, stores it as an
//! immutable [`ErrorRecord`], and lays lists of records out as a readable
//! multi-line report.
//!
//! ## Quick Example
//!
//! ```
//! use chrono::DateTime;
//! use errscribe::prelude::*;
//!
//! let meta = object! { "from" => "console.error" };
//! meta.insert("self", meta.clone());
//!
//! let created = DateTime::from_timestamp_millis(0).unwrap();
//! let record = ErrorRecord::new(&Value::from("boom"), Some(&meta.clone().into()), "", created);
//! assert_eq!(
//!     record.meta(),
//!     r#"{from:"console.error",self:CircularReference(Object(class:Object keys:from,self))}"#
//! );
//!
//! let report = format_records(&[record], &FormatOptions::DEFAULT);
//! assert_eq!(
//!     report,
//!     "#1 1970-01-01T00:00:00.000Z\n\
//!      \n\
//!      stack: \n\
//!      \n\
//!      error: \"boom\"\n\
//!      \n\
//!      meta: {\n  \
//!        from: \"console.error\",\n  \
//!        self: CircularReference(Object(class: Object keys: from,\n  \
//!        self))\n\
//!      }\n\
//!      ================================================================"
//! );
//! meta.remove("self");
//! ```
//!
//! ## The pieces
//!
//! - [`value`]: the runtime value model. Composite values live behind shared
//!   [`Object`](value::Object) handles, so graphs may alias and contain
//!   cycles.
//! - [`handlers`]: the ordered table deciding which textual form each kind of
//!   value gets.
//! - [`serializer`]: deep and shallow rendering, with cycle detection and an
//!   optional depth limit.
//! - [`layout`]: the reformatter that re-indents the compact notation without
//!   touching string literals.
//! - [`record`] and [`formatter`]: record snapshots and the report layout.
//! - [`collector`]: a capture pipeline with transforms, a clock and a
//!   pluggable record sink.
//!
//! ## Features
//!
//! - `std` (default): the system clock for collectors.
//! - `backtrace`: collectors capture a stack text when none is given, see
//!   [`stack`].
//! - `serde`: (de)serialization of [`ErrorRecord`] and conversion from
//!   `serde_json::Value`.
//! - `compat-anyhow1`: conversion from `anyhow::Error`.
//!
//! The crate is `no_std` compatible with `default-features = false`; it only
//! needs `alloc`.
//!
//! ## Cycles and memory
//!
//! Objects are reference counted. A cycle keeps its nodes alive until one of
//! its edges is removed, for example with
//! [`Object::remove`](value::Object::remove).

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod collector;
pub mod compat;
pub mod formatter;
pub mod handlers;
pub mod layout;
pub mod prelude;
pub mod record;
pub mod serializer;
#[cfg(feature = "backtrace")]
#[cfg_attr(docsrs, doc(cfg(feature = "backtrace")))]
pub mod stack;
pub mod value;

mod into_value;
mod util;

pub use self::{
    formatter::{format_record, format_records},
    layout::{FormatOptions, reformat},
    record::ErrorRecord,
    serializer::{RenderMode, render},
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use alloc::{vec, vec::Vec};
}
