#![no_std]
#![forbid(
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
//! Internal implementation crate for [`errscribe`].
//!
//! # Overview
//!
//! This crate contains the shared heap cell that composite runtime values
//! live in. A value graph built by [`errscribe`] may contain cycles, so each
//! composite node is reference counted and carries a stable [`Identity`]
//! derived from its allocation. The serializer uses that identity to detect
//! back-edges without ever comparing node contents.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`errscribe`] crate,
//! not this one.
//!
//! # Locking
//!
//! Node contents sit behind a [`spin::RwLock`]. Readers never block other
//! readers, so a traversal may hold read guards on every node of its current
//! path, including the same node twice when the path loops back on itself.
//! Writers wait until all readers are gone.
//!
//! [`errscribe`]: https://docs.rs/errscribe/latest/errscribe/

mod cell;

pub use cell::{Identity, SharedCell, SharedReadGuard, SharedWriteGuard};
