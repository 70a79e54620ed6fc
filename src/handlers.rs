//! The ordered table that decides which textual form a value gets.
//!
//! Every value reaching the deep serializer is wrapped in a [`Subject`] and
//! matched against [`HANDLERS`] from first to last. The first handler whose
//! predicate accepts the subject renders it. The table is closed: adding a
//! new kind of value means adding a [`Slots`] variant and a handler here, at
//! the position that decides its priority.
//!
//! | # | Handler           | Form                                              |
//! |---|-------------------|---------------------------------------------------|
//! | 1 | `array`           | `[a,b]`                                           |
//! | 2 | `date`            | `Date(2024-01-01T00:00:00.000Z)`                  |
//! | 3 | `regexp`          | `RegExp(source)`                                  |
//! | 4 | `map`             | `Map {k => v,...}`                                |
//! | 5 | `set`             | `Set {v,...}`                                     |
//! | 6 | `array_buffer`    | `ArrayBuffer(8)`                                  |
//! | 7 | `typed_view`      | `Uint8Array(16)`                                  |
//! | 8 | `error`           | `Error({name:..,message:..,stack:..})`            |
//! | 9 | `error_event`     | `ErrorEvent({type:..,...,error:..})`              |
//! |10 | `rejection_event` | `PromiseRejectionEvent({type:..,reason:..})`      |
//! |11 | `keyed_record`    | `{key:value,...}`                                 |
//! |12 | `text`            | `"text"` or `text`                                |
//! |13 | `callable`        | `Class(Name)` or `Function(name)`                 |
//! |14 | `bigint`          | `123n`                                            |
//! |15 | `fallback`        | default textual conversion                        |
//!
//! ```
//! use errscribe::handlers::{HANDLERS, Subject, resolve};
//! use errscribe::value::Value;
//!
//! let value = Value::from("hello");
//! assert_eq!(resolve(&Subject::Primitive(&value)).name(), "text");
//! assert_eq!(HANDLERS.last().map(|h| h.name()), Some("fallback"));
//! ```

use alloc::string::String;
use core::fmt;

use crate::{
    serializer::Serializer,
    util::iso_millis,
    value::{Callable, ObjectData, Slots, Value},
};

/// A value as seen by the dispatch table.
///
/// Composite values are presented through their locked contents, so
/// predicates and renderers never take a lock themselves.
#[derive(Copy, Clone, Debug)]
pub enum Subject<'a> {
    /// The contents of an object node that is currently being rendered.
    Composite(&'a ObjectData),
    /// A primitive value.
    Primitive(&'a Value),
}

/// A `(predicate, renderer)` pair in the dispatch table.
#[derive(Copy, Clone)]
pub struct Handler {
    name: &'static str,
    matches: fn(&Subject<'_>) -> bool,
    render: fn(&mut Serializer, &Subject<'_>),
}

impl Handler {
    /// Returns the name of the handler.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this handler accepts the subject.
    #[must_use]
    pub fn matches(&self, subject: &Subject<'_>) -> bool {
        (self.matches)(subject)
    }

    pub(crate) fn render(&self, serializer: &mut Serializer, subject: &Subject<'_>) {
        (self.render)(serializer, subject);
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("name", &self.name).finish()
    }
}

macro_rules! handler {
    ($name:ident, $matches:expr, $render:expr) => {
        Handler {
            name: stringify!($name),
            matches: $matches,
            render: $render,
        }
    };
}

const FALLBACK: Handler = handler!(fallback, |_| true, render_fallback);

/// The dispatch table, in priority order.
pub static HANDLERS: [Handler; 15] = [
    handler!(array, |s| slots(s, |k| matches!(k, Slots::Array(_))), render_array),
    handler!(date, |s| slots(s, |k| matches!(k, Slots::Date(_))), render_date),
    handler!(regexp, |s| slots(s, |k| matches!(k, Slots::RegExp { .. })), render_regexp),
    handler!(map, |s| slots(s, |k| matches!(k, Slots::Map(_))), render_map),
    handler!(set, |s| slots(s, |k| matches!(k, Slots::Set(_))), render_set),
    handler!(
        array_buffer,
        |s| slots(s, |k| matches!(k, Slots::ArrayBuffer { .. })),
        render_array_buffer
    ),
    handler!(
        typed_view,
        |s| slots(s, |k| matches!(k, Slots::View { .. })),
        render_typed_view
    ),
    handler!(error, |s| slots(s, |k| matches!(k, Slots::Error(_))), render_error),
    handler!(
        error_event,
        |s| slots(s, |k| matches!(k, Slots::ErrorEvent(_))),
        render_error_event
    ),
    handler!(
        rejection_event,
        |s| slots(s, |k| matches!(k, Slots::RejectionEvent(_))),
        render_rejection_event
    ),
    handler!(
        keyed_record,
        |s| matches!(s, Subject::Composite(_)),
        render_keyed_record
    ),
    handler!(
        text,
        |s| matches!(s, Subject::Primitive(Value::String(_))),
        render_text
    ),
    handler!(
        callable,
        |s| matches!(s, Subject::Primitive(Value::Function(_))),
        render_callable
    ),
    handler!(
        bigint,
        |s| matches!(s, Subject::Primitive(Value::BigInt(_))),
        render_bigint
    ),
    FALLBACK,
];

/// Returns the first handler in [`HANDLERS`] that accepts the subject.
#[must_use]
pub fn resolve(subject: &Subject<'_>) -> &'static Handler {
    HANDLERS
        .iter()
        .find(|handler| handler.matches(subject))
        .unwrap_or(&FALLBACK)
}

/// Decides whether a callable is rendered as `Class(..)` or `Function(..)`.
///
/// This is a naming-convention heuristic: a name starting with an ASCII
/// uppercase letter is taken to be a class. It misclassifies constructors
/// with lowercase names and plain functions with capitalized names.
///
/// ```
/// use errscribe::{handlers::is_class_like, value::Callable};
///
/// assert!(is_class_like(&Callable::new("HttpClient")));
/// assert!(!is_class_like(&Callable::new("fetch")));
/// assert!(!is_class_like(&Callable::anonymous()));
/// ```
#[must_use]
pub fn is_class_like(callable: &Callable) -> bool {
    callable
        .name()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
}

fn slots(subject: &Subject<'_>, predicate: fn(&Slots) -> bool) -> bool {
    match subject {
        Subject::Composite(data) => predicate(&data.slots),
        Subject::Primitive(_) => false,
    }
}

fn render_array(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::Array(items),
        ..
    }) = subject
    {
        ser.push('[');
        ser.write_joined(items.iter(), |ser, item| ser.write_value(item));
        ser.push(']');
    }
}

fn render_date(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::Date(millis),
        ..
    }) = subject
    {
        let text = millis
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map_or_else(|| String::from("Invalid Date"), iso_millis);
        ser.push_str("Date(");
        ser.push_str(&text);
        ser.push(')');
    }
}

fn render_regexp(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::RegExp { source, .. },
        ..
    }) = subject
    {
        ser.push_str("RegExp(");
        ser.push_str(source);
        ser.push(')');
    }
}

fn render_map(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::Map(entries),
        ..
    }) = subject
    {
        ser.push_str("Map {");
        ser.write_joined(entries.iter(), |ser, (key, value)| {
            ser.write_value(key);
            ser.push_str(" => ");
            ser.write_value(value);
        });
        ser.push('}');
    }
}

fn render_set(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::Set(items),
        ..
    }) = subject
    {
        ser.push_str("Set {");
        ser.write_joined(items.iter(), |ser, item| ser.write_value(item));
        ser.push('}');
    }
}

fn render_array_buffer(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::ArrayBuffer { byte_length },
        ..
    }) = subject
    {
        ser.push_fmt(format_args!("ArrayBuffer({byte_length})"));
    }
}

fn render_typed_view(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::View { kind, byte_length },
        ..
    }) = subject
    {
        ser.push_fmt(format_args!("{}({byte_length})", kind.name()));
    }
}

fn render_error(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::Error(error),
        fields,
        ..
    }) = subject
    {
        ser.push_str("Error({name:");
        ser.write_text(&error.name);
        ser.push_str(",message:");
        ser.write_text(&error.message);
        ser.push_str(",stack:");
        ser.write_text(&error.stack);
        if let Some(cause) = &error.cause {
            ser.push_str(",cause:");
            ser.write_value(cause);
        }
        for (key, value) in fields {
            ser.push(',');
            ser.push_str(key);
            ser.push(':');
            ser.write_value(value);
        }
        ser.push_str("})");
    }
}

fn render_error_event(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::ErrorEvent(event),
        ..
    }) = subject
    {
        ser.push_str("ErrorEvent({type:");
        ser.write_text(&event.event_type);
        ser.push_str(",message:");
        ser.write_text(&event.message);
        ser.push_str(",filename:");
        ser.write_text(&event.filename);
        ser.push_fmt(format_args!(
            ",lineno:{},colno:{},error:",
            event.lineno, event.colno
        ));
        ser.write_value(&event.error);
        ser.push_str("})");
    }
}

fn render_rejection_event(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(ObjectData {
        slots: Slots::RejectionEvent(event),
        ..
    }) = subject
    {
        ser.push_str("PromiseRejectionEvent({type:");
        ser.write_text(&event.event_type);
        ser.push_str(",reason:");
        ser.write_value(&event.reason);
        ser.push_str("})");
    }
}

fn render_keyed_record(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Composite(data) = subject {
        ser.push('{');
        ser.write_joined(data.fields.iter(), |ser, (key, value)| {
            ser.push_str(key);
            ser.push(':');
            ser.write_value(value);
        });
        ser.push('}');
    }
}

fn render_text(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Primitive(Value::String(text)) = subject {
        ser.write_text(text);
    }
}

fn render_callable(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Primitive(Value::Function(callable)) = subject {
        let kind = if is_class_like(callable) {
            "Class"
        } else {
            "Function"
        };
        ser.push_fmt(format_args!("{kind}({})", callable.name()));
    }
}

fn render_bigint(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Primitive(Value::BigInt(big)) = subject {
        ser.push_fmt(format_args!("{big}n"));
    }
}

fn render_fallback(ser: &mut Serializer, subject: &Subject<'_>) {
    if let Subject::Primitive(value) = subject {
        ser.write_plain(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ErrorSlots, Object, ViewKind};

    fn composite_name(object: &Object) -> &'static str {
        let data = object.read();
        resolve(&Subject::Composite(&data)).name()
    }

    fn primitive_name(value: &Value) -> &'static str {
        resolve(&Subject::Primitive(value)).name()
    }

    #[test]
    fn test_table_order() {
        let names: alloc::vec::Vec<_> = HANDLERS.iter().map(Handler::name).collect();
        assert_eq!(
            names,
            [
                "array",
                "date",
                "regexp",
                "map",
                "set",
                "array_buffer",
                "typed_view",
                "error",
                "error_event",
                "rejection_event",
                "keyed_record",
                "text",
                "callable",
                "bigint",
                "fallback",
            ]
        );
    }

    #[test]
    fn test_composites_resolve_by_slots() {
        assert_eq!(composite_name(&Object::array([1])), "array");
        assert_eq!(composite_name(&Object::invalid_date()), "date");
        assert_eq!(composite_name(&Object::regexp("a+", "g")), "regexp");
        assert_eq!(composite_name(&Object::map([(1, 2)])), "map");
        assert_eq!(composite_name(&Object::set([1])), "set");
        assert_eq!(composite_name(&Object::array_buffer(4)), "array_buffer");
        assert_eq!(composite_name(&Object::view(ViewKind::DataView, 4)), "typed_view");
        assert_eq!(composite_name(&Object::with_class("Anything")), "keyed_record");
    }

    #[test]
    fn test_error_with_fields_is_still_an_error() {
        let error = Object::error_with_class("HttpError", ErrorSlots::new("HttpError", "boom"));
        error.insert("status", 503);
        assert_eq!(composite_name(&error), "error");
    }

    #[test]
    fn test_primitives_resolve() {
        assert_eq!(primitive_name(&Value::from("x")), "text");
        assert_eq!(primitive_name(&Value::Function(Callable::new("f"))), "callable");
        assert_eq!(primitive_name(&Value::BigInt(7_u8.into())), "bigint");
        assert_eq!(primitive_name(&Value::Null), "fallback");
        assert_eq!(primitive_name(&Value::Number(1.0)), "fallback");
    }

    #[test]
    fn test_class_heuristic() {
        assert!(is_class_like(&Callable::new("Zed")));
        assert!(!is_class_like(&Callable::new("_Private")));
        assert!(!is_class_like(&Callable::new("Ärger")));
    }
}
