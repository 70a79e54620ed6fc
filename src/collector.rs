//! The capture pipeline: transforms, record construction and storage.
//!
//! A [`Collector`] takes a captured error and optional metadata, passes them
//! through its [`Transform`]s in order, renders the result into an
//! [`ErrorRecord`] and pushes that into a [`RecordSink`]. Where the errors
//! come from (event listeners, log redirection, panics) and where records
//! end up (memory, a key-value store, a database) is decided by the host.
//!
//! ```
//! use chrono::DateTime;
//! use errscribe::{
//!     collector::{Captured, Collector, TransformOutcome},
//!     layout::FormatOptions,
//!     object,
//!     record::ErrorRecord,
//!     value::Value,
//! };
//!
//! let mut collector = Collector::builder(Vec::<ErrorRecord>::new())
//!     .clock(|| DateTime::from_timestamp_millis(0).unwrap())
//!     .transform(|error: &Value, _meta: Option<&Value>| match error.as_str() {
//!         Some("noise") => TransformOutcome::Drop,
//!         _ => TransformOutcome::Unchanged,
//!     })
//!     .build();
//!
//! let meta = Value::from(object! { "from" => "console.error" });
//! assert_eq!(collector.add("noise", None), Ok(Captured::Dropped));
//! assert_eq!(collector.add_with_stack("boom", Some(meta), "at main"), Ok(Captured::Stored));
//!
//! assert_eq!(
//!     collector.format(&FormatOptions::DEFAULT),
//!     "#1 1970-01-01T00:00:00.000Z\n\nstack: at main\n\nerror: \"boom\"\n\n\
//!      meta: {\n  from: \"console.error\"\n}\n\
//!      ================================================================"
//! );
//! ```

use alloc::{boxed::Box, string::String, vec::Vec};
use core::{convert::Infallible, fmt};

use chrono::{DateTime, Utc};

use crate::{
    formatter::format_records,
    layout::FormatOptions,
    record::ErrorRecord,
    serializer::RenderOptions,
    value::Value,
};

/// What a [`Transform`] decided about a captured error.
#[derive(Clone, Debug, Default)]
pub enum TransformOutcome {
    /// Keep the error and metadata as they are.
    #[default]
    Unchanged,
    /// Replace the error and metadata. Later transforms and the stored
    /// record see the replacements.
    Continue {
        /// The replacement error.
        error: Value,
        /// The replacement metadata. `None` clears it.
        meta: Option<Value>,
    },
    /// Discard the error. No later transform runs and no record is stored.
    Drop,
}

impl TransformOutcome {
    /// Replaces the error and clears the metadata.
    #[must_use]
    pub fn replace_error(error: impl Into<Value>) -> Self {
        TransformOutcome::Continue {
            error: error.into(),
            meta: None,
        }
    }

    /// Replaces both the error and the metadata.
    #[must_use]
    pub fn replace(error: impl Into<Value>, meta: impl Into<Value>) -> Self {
        TransformOutcome::Continue {
            error: error.into(),
            meta: Some(meta.into()),
        }
    }
}

/// A step that may rewrite or discard captured errors before they are
/// stored.
///
/// Implemented for every `Fn(&Value, Option<&Value>) -> TransformOutcome`.
pub trait Transform: Send + Sync + 'static {
    /// Inspects one captured error.
    fn apply(&self, error: &Value, meta: Option<&Value>) -> TransformOutcome;
}

impl<F> Transform for F
where
    F: Fn(&Value, Option<&Value>) -> TransformOutcome + Send + Sync + 'static,
{
    fn apply(&self, error: &Value, meta: Option<&Value>) -> TransformOutcome {
        self(error, meta)
    }
}

/// Destination of finished records.
pub trait RecordSink {
    /// The error returned when a record cannot be stored.
    type Error;

    /// Stores a record after the ones already stored.
    fn push(&mut self, record: ErrorRecord) -> Result<(), Self::Error>;

    /// Returns the stored records in insertion order.
    fn records(&self) -> Vec<ErrorRecord>;

    /// Removes every stored record.
    fn clear(&mut self);
}

impl RecordSink for Vec<ErrorRecord> {
    type Error = Infallible;

    fn push(&mut self, record: ErrorRecord) -> Result<(), Self::Error> {
        Vec::push(self, record);
        Ok(())
    }

    fn records(&self) -> Vec<ErrorRecord> {
        self.clone()
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Supplies the creation time of records.
///
/// Implemented for every `Fn() -> DateTime<Utc>`.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// The system wall clock.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The result of a successful [`Collector::add`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Captured {
    /// A record was stored.
    Stored,
    /// A transform discarded the error.
    Dropped,
}

/// Error returned when the sink refuses a record.
pub struct CollectError<E> {
    source: E,
}

impl<E> CollectError<E> {
    /// Returns the error reported by the sink.
    pub fn into_inner(self) -> E {
        self.source
    }
}

impl<E: fmt::Debug> fmt::Debug for CollectError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectError")
            .field("source", &self.source)
            .finish()
    }
}

impl<E: fmt::Display> fmt::Display for CollectError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to store error record: {}", self.source)
    }
}

impl<E: core::error::Error + 'static> core::error::Error for CollectError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<E: PartialEq> PartialEq for CollectError<E> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

type OnRecord = Box<dyn Fn(&Value, Option<&Value>) + Send + Sync>;

/// Builder for a [`Collector`].
pub struct CollectorBuilder<S, C> {
    sink: S,
    clock: C,
    transforms: Vec<Box<dyn Transform>>,
    on_record: Option<OnRecord>,
    render_options: RenderOptions,
    #[cfg(feature = "backtrace")]
    stack_filter: crate::stack::StackFilter,
}

impl<S, C> CollectorBuilder<S, C>
where
    S: RecordSink,
    C: Clock,
{
    /// Appends a transform. Transforms run in the order they were added.
    #[must_use]
    pub fn transform(mut self, transform: impl Transform) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Sets the callback invoked after a record has been stored. It receives
    /// the error and metadata as left by the transforms.
    #[must_use]
    pub fn on_record(
        mut self,
        callback: impl Fn(&Value, Option<&Value>) + Send + Sync + 'static,
    ) -> Self {
        self.on_record = Some(Box::new(callback));
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn clock<C2: Clock>(self, clock: C2) -> CollectorBuilder<S, C2> {
        CollectorBuilder {
            sink: self.sink,
            clock,
            transforms: self.transforms,
            on_record: self.on_record,
            render_options: self.render_options,
            #[cfg(feature = "backtrace")]
            stack_filter: self.stack_filter,
        }
    }

    /// Sets the options used to render errors and metadata.
    #[must_use]
    pub fn render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Sets the filter used for stacks captured by the collector.
    #[cfg(feature = "backtrace")]
    #[must_use]
    pub fn stack_filter(mut self, filter: crate::stack::StackFilter) -> Self {
        self.stack_filter = filter;
        self
    }

    /// Finishes the collector.
    #[must_use]
    pub fn build(self) -> Collector<S, C> {
        Collector {
            sink: self.sink,
            clock: self.clock,
            transforms: self.transforms,
            on_record: self.on_record,
            render_options: self.render_options,
            #[cfg(feature = "backtrace")]
            stack_filter: self.stack_filter,
        }
    }
}

impl<S, C> fmt::Debug for CollectorBuilder<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorBuilder")
            .field("transforms", &self.transforms.len())
            .field("on_record", &self.on_record.is_some())
            .field("render_options", &self.render_options)
            .finish_non_exhaustive()
    }
}

/// Captures errors into a [`RecordSink`].
pub struct Collector<S, C> {
    sink: S,
    clock: C,
    transforms: Vec<Box<dyn Transform>>,
    on_record: Option<OnRecord>,
    render_options: RenderOptions,
    #[cfg(feature = "backtrace")]
    stack_filter: crate::stack::StackFilter,
}

#[cfg(feature = "std")]
impl<S: RecordSink> Collector<S, SystemClock> {
    /// Starts building a collector that stores into `sink` and timestamps
    /// records with the system clock.
    #[must_use]
    pub fn builder(sink: S) -> CollectorBuilder<S, SystemClock> {
        Self::builder_with_clock(sink, SystemClock)
    }
}

impl<S, C> Collector<S, C>
where
    S: RecordSink,
    C: Clock,
{
    /// Starts building a collector with an explicit clock.
    #[must_use]
    pub fn builder_with_clock(sink: S, clock: C) -> CollectorBuilder<S, C> {
        CollectorBuilder {
            sink,
            clock,
            transforms: Vec::new(),
            on_record: None,
            render_options: RenderOptions::DEFAULT,
            #[cfg(feature = "backtrace")]
            stack_filter: crate::stack::StackFilter::DEFAULT,
        }
    }

    /// Captures an error.
    ///
    /// The stack text is captured from the current thread when the
    /// `backtrace` feature is enabled and left empty otherwise.
    pub fn add(
        &mut self,
        error: impl Into<Value>,
        meta: Option<Value>,
    ) -> Result<Captured, CollectError<S::Error>> {
        self.capture(error.into(), meta, None)
    }

    /// Captures an error with a stack text supplied by the caller.
    pub fn add_with_stack(
        &mut self,
        error: impl Into<Value>,
        meta: Option<Value>,
        stack: &str,
    ) -> Result<Captured, CollectError<S::Error>> {
        self.capture(error.into(), meta, Some(stack))
    }

    fn capture(
        &mut self,
        mut error: Value,
        mut meta: Option<Value>,
        stack: Option<&str>,
    ) -> Result<Captured, CollectError<S::Error>> {
        for (index, transform) in self.transforms.iter().enumerate() {
            match transform.apply(&error, meta.as_ref()) {
                TransformOutcome::Unchanged => {}
                TransformOutcome::Continue {
                    error: new_error,
                    meta: new_meta,
                } => {
                    tracing::debug!(transform = index, "transform replaced captured error");
                    error = new_error;
                    meta = new_meta;
                }
                TransformOutcome::Drop => {
                    tracing::debug!(transform = index, "transform dropped captured error");
                    return Ok(Captured::Dropped);
                }
            }
        }

        let stack = match stack {
            Some(stack) => String::from(stack),
            None => self.current_stack(),
        };
        let record = ErrorRecord::with_options(
            &error,
            meta.as_ref(),
            &stack,
            self.clock.now(),
            self.render_options,
        );
        tracing::trace!(create_time = record.create_time(), "storing error record");
        self.sink
            .push(record)
            .map_err(|source| CollectError { source })?;

        if let Some(callback) = &self.on_record {
            callback(&error, meta.as_ref());
        }
        Ok(Captured::Stored)
    }

    #[cfg(feature = "backtrace")]
    fn current_stack(&self) -> String {
        crate::stack::capture_stack(&self.stack_filter)
    }

    #[cfg(not(feature = "backtrace"))]
    fn current_stack(&self) -> String {
        String::new()
    }

    /// Formats every stored record.
    #[must_use]
    pub fn format(&self, options: &FormatOptions) -> String {
        format_records(&self.sink.records(), options)
    }

    /// Returns the stored records in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<ErrorRecord> {
        self.sink.records()
    }

    /// Removes every stored record.
    pub fn clear(&mut self) {
        self.sink.clear();
    }

    /// Returns the sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the collector and returns the sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S, C> fmt::Debug for Collector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("transforms", &self.transforms.len())
            .field("on_record", &self.on_record.is_some())
            .field("render_options", &self.render_options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, sync::Arc, vec};
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn fixed_clock() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn collector() -> CollectorBuilder<Vec<ErrorRecord>, fn() -> DateTime<Utc>> {
        Collector::builder_with_clock(Vec::new(), fixed_clock as fn() -> DateTime<Utc>)
    }

    #[derive(Debug, PartialEq)]
    struct Full;

    impl fmt::Display for Full {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("sink is full")
        }
    }

    impl core::error::Error for Full {}

    #[derive(Default)]
    struct BoundedSink {
        records: Vec<ErrorRecord>,
    }

    impl RecordSink for BoundedSink {
        type Error = Full;

        fn push(&mut self, record: ErrorRecord) -> Result<(), Full> {
            if self.records.len() == 1 {
                return Err(Full);
            }
            self.records.push(record);
            Ok(())
        }

        fn records(&self) -> Vec<ErrorRecord> {
            self.records.clone()
        }

        fn clear(&mut self) {
            self.records.clear();
        }
    }

    #[test]
    fn test_collector_send_sync() {
        static_assertions::assert_impl_all!(Collector<Vec<ErrorRecord>, fn() -> DateTime<Utc>>: Send, Sync);
        static_assertions::assert_impl_all!(Captured: Send, Sync, Copy);
    }

    #[test]
    fn test_record_uses_clock() {
        let mut collector = collector().build();
        collector.add_with_stack(1, None, "").unwrap();
        assert_eq!(collector.records()[0].create_time(), "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn test_drop_short_circuits() {
        let later = Arc::new(AtomicUsize::new(0));
        let seen = later.clone();
        let mut collector = collector()
            .transform(|_: &Value, _: Option<&Value>| TransformOutcome::Drop)
            .transform(move |_: &Value, _: Option<&Value>| {
                seen.fetch_add(1, Ordering::SeqCst);
                TransformOutcome::Unchanged
            })
            .build();
        assert_eq!(collector.add_with_stack("x", None, ""), Ok(Captured::Dropped));
        assert_eq!(later.load(Ordering::SeqCst), 0);
        assert!(collector.records().is_empty());
    }

    #[test]
    fn test_continue_replaces_for_later_steps() {
        let mut collector = collector()
            .transform(|_: &Value, _: Option<&Value>| {
                TransformOutcome::replace("replaced", "new meta")
            })
            .transform(|error: &Value, meta: Option<&Value>| {
                assert_eq!(error.as_str(), Some("replaced"));
                assert_eq!(meta.and_then(Value::as_str), Some("new meta"));
                TransformOutcome::replace_error("final")
            })
            .build();
        collector
            .add_with_stack("original", Some(Value::from("m")), "")
            .unwrap();
        let record = &collector.records()[0];
        assert_eq!(record.error(), "\"final\"");
        assert_eq!(record.meta(), "undefined");
    }

    #[test]
    fn test_on_record_sees_transformed_values() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut collector = collector()
            .transform(|_: &Value, _: Option<&Value>| TransformOutcome::replace_error("swapped"))
            .on_record(move |error, meta| {
                assert_eq!(error.as_str(), Some("swapped"));
                assert!(meta.is_none());
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();
        collector.add_with_stack("x", None, "").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sink_error_is_forwarded() {
        let mut collector = Collector::builder_with_clock(BoundedSink::default(), fixed_clock)
            .on_record(|_, _| panic!("not called for refused records"))
            .build();
        let _ = collector.add_with_stack(1, None, "");
        let err = collector.add_with_stack(2, None, "").unwrap_err();
        assert_eq!(err.to_string(), "failed to store error record: sink is full");
        assert!(core::error::Error::source(&err).is_some());
        assert_eq!(err.into_inner(), Full);
    }

    #[test]
    fn test_clear_and_into_sink() {
        let mut collector = collector().build();
        collector.add_with_stack("a", None, "").unwrap();
        collector.add_with_stack("b", None, "").unwrap();
        assert_eq!(collector.sink().len(), 2);
        collector.clear();
        assert!(collector.records().is_empty());
        collector.add_with_stack("c", None, "").unwrap();
        assert_eq!(collector.into_sink(), vec![ErrorRecord::from_parts(
            "\"c\"",
            "undefined",
            "2023-11-14T22:13:20.000Z",
            "",
        )]);
    }

    #[cfg(not(feature = "backtrace"))]
    #[test]
    fn test_stack_is_empty_without_backtrace() {
        let mut collector = collector().build();
        collector.add(1, None).unwrap();
        assert_eq!(collector.records()[0].stack(), "");
    }
}
