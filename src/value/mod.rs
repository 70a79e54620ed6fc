//! The runtime value model that captured errors are expressed in.
//!
//! A captured error payload can be anything: a plain message, a keyed record,
//! an error carrying a cause chain, or a graph that refers back to itself.
//! [`Value`] covers the primitive kinds directly and stores every composite
//! kind behind an [`Object`] handle.
//!
//! # Building values
//!
//! ```
//! use errscribe::{
//!     array, object,
//!     value::{Object, Value},
//! };
//!
//! let request = object! {
//!     "id" => 7,
//!     "tags" => array!["slow", "retry"],
//! };
//!
//! // Objects are shared handles, so a graph can point back at itself.
//! request.insert("self", request.clone());
//!
//! let value = Value::from(request);
//! assert_eq!(
//!     value.to_string(),
//!     r#"{id:7,tags:["slow","retry"],self:CircularReference(Object(class:Object keys:id,tags,self))}"#
//! );
//! ```
//!
//! # Identity and cycles
//!
//! Cloning an [`Object`] never copies its contents; both handles refer to the
//! same node and share an [`Identity`]. The serializer relies on identities
//! to notice when a traversal comes back to a node it is still rendering.
//! Reference cycles are not reclaimed; remove the back-edge with
//! [`Object::remove`] (or by replacing the field) to release the nodes.

mod bigint;
mod number;
mod object;

use alloc::{borrow::Cow, string::String};
use core::fmt;

pub use errscribe_internals::Identity;

pub use self::{
    bigint::{BigInt, ParseBigIntError},
    object::{
        ErrorEventSlots, ErrorSlots, Fields, Object, ObjectData, RejectionEventSlots, Slots,
        ViewKind,
    },
};
pub(crate) use self::number::write_number;
use crate::serializer::{RenderMode, render};

/// A runtime value.
///
/// Primitive kinds are stored inline. All composite kinds (records, arrays,
/// dates, maps, errors, ...) live behind an [`Object`] handle.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Undefined,
    /// The explicit empty value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double precision number.
    Number(f64),
    /// An arbitrary-precision integer.
    BigInt(BigInt),
    /// A text value.
    String(String),
    /// A symbol with an optional description.
    Symbol(Option<String>),
    /// A callable value.
    Function(Callable),
    /// A composite value.
    Object(Object),
}

impl Value {
    /// Returns the object handle if this value is composite.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the text if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for `undefined` and `null`.
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Compares two values the way unique-element collections do.
    ///
    /// Primitives compare by value, with `NaN` equal to itself and both zeros
    /// equal to each other. Objects compare by identity.
    #[must_use]
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            // Symbols and callables have identity in a real runtime, which
            // this model does not track.
            _ => false,
        }
    }

    /// Renders this value with the given mode and string quoting.
    ///
    /// This is a shorthand for [`serializer::render`](crate::serializer::render).
    #[must_use]
    pub fn render(&self, mode: RenderMode, quote_strings: bool) -> String {
        render(self, mode, quote_strings)
    }
}

/// Formats the deep rendering with quoted strings.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, RenderMode::Deep, true))
    }
}

/// A callable value, described by its name.
///
/// The name is what decides between the `Class(..)` and `Function(..)`
/// renderings, see [`handlers::is_class_like`](crate::handlers::is_class_like).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Callable {
    name: Cow<'static, str>,
}

impl Callable {
    /// Creates a callable with the given name.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Creates a callable without a name.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            name: Cow::Borrowed(""),
        }
    }

    /// Returns the name of the callable, which may be empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_value_send_sync() {
        static_assertions::assert_impl_all!(Value: Send, Sync, Clone, Default);
        static_assertions::assert_impl_all!(Object: Send, Sync, Clone);
        static_assertions::assert_impl_all!(Callable: Send, Sync, Clone);
    }

    #[test]
    fn test_same_value_zero() {
        assert!(Value::Number(f64::NAN).same_value_zero(&Value::Number(f64::NAN)));
        assert!(Value::Number(0.0).same_value_zero(&Value::Number(-0.0)));
        assert!(!Value::Number(1.0).same_value_zero(&Value::String("1".to_string())));

        let a = Object::plain();
        let b = Object::plain();
        assert!(Value::from(a.clone()).same_value_zero(&Value::from(a)));
        assert!(!Value::from(b.clone()).same_value_zero(&Value::from(Object::plain())));
        assert!(!Value::Symbol(None).same_value_zero(&Value::Symbol(None)));
    }

    #[test]
    fn test_display_is_deep_quoted() {
        let value = Value::from("hi");
        assert_eq!(value.to_string(), "\"hi\"");
        assert_eq!(value.render(RenderMode::Deep, false), "hi");
    }
}
