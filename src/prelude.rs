//! Commonly used items for convenient importing.
//!
//! ```
//! use errscribe::prelude::*;
//!
//! let value = Value::from(array![1, "two"]);
//! assert_eq!(render(&value, RenderMode::Deep, false), "[1,two]");
//! ```

#[cfg(feature = "std")]
pub use crate::collector::SystemClock;
pub use crate::{
    array,
    collector::{Captured, Clock, Collector, RecordSink, Transform, TransformOutcome},
    formatter::{RecordFormatter, format_record, format_records},
    layout::{FormatOptions, Indent, reformat},
    object,
    record::ErrorRecord,
    serializer::{RenderMode, RenderOptions, render},
    value::{Callable, Object, Value},
};
