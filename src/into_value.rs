//! Conversions from Rust values and Rust errors into [`Value`].
//!
//! Integers that a double represents exactly become numbers. Larger ones
//! become big integers, so no digits are lost.
//!
//! ```
//! use errscribe::value::Value;
//!
//! assert_eq!(Value::from(42_u64).to_string(), "42");
//! assert_eq!(Value::from(u64::MAX).to_string(), "18446744073709551615n");
//! assert_eq!(Value::from(None::<&str>).to_string(), "null");
//! assert_eq!(Value::from(vec![Some(1), None]).to_string(), "[1,null]");
//! ```

use alloc::{
    borrow::Cow,
    string::{String, ToString},
    vec::Vec,
};

use chrono::{DateTime, Utc};

use crate::value::{BigInt, Callable, ErrorSlots, Object, Value};

/// The largest integer a double represents exactly, 2^53 - 1.
const MAX_SAFE_INTEGER: i128 = 9_007_199_254_740_991;

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_small_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(f64::from(value))
                }
            }
        )*
    };
}

impl_from_small_int!(i8, i16, i32, u8, u16, u32, f32, f64);

macro_rules! impl_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    match i128::try_from(value) {
                        Ok(small) if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&small) => {
                            Value::Number(small as f64)
                        }
                        _ => Value::BigInt(BigInt::from(value)),
                    }
                }
            }
        )*
    };
}

impl_from_wide_int!(i64, u64, i128, u128, isize, usize);

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(String::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Self {
        Value::String(value.into_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<&Object> for Value {
    fn from(value: &Object) -> Self {
        Value::Object(value.clone())
    }
}

impl From<Callable> for Value {
    fn from(value: Callable) -> Self {
        Value::Function(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Object(Object::array(value))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Object(Object::date(value.timestamp_millis()))
    }
}

impl Value {
    /// Builds an error-like value from a Rust error.
    ///
    /// The outermost error is named after its type. Each error of the
    /// `source()` chain becomes the `cause` of the one before it and is
    /// named `Error`, since its concrete type is not known.
    ///
    /// ```
    /// use errscribe::value::Value;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("config could not be loaded")]
    /// struct ConfigError(#[source] std::fmt::Error);
    ///
    /// let value = Value::from_error(&ConfigError(std::fmt::Error));
    /// assert_eq!(
    ///     value.to_string(),
    ///     "Error({name:\"ConfigError\",message:\"config could not be loaded\",stack:\"\",\
    ///      cause:Error({name:\"Error\",message:\"an error occurred when formatting an argument\",stack:\"\"})})"
    /// );
    /// ```
    #[must_use]
    pub fn from_error<E: core::error::Error>(error: &E) -> Value {
        let messages = core::iter::successors(Some(error as &dyn core::error::Error), |e| e.source())
            .map(ToString::to_string);
        error_chain(short_type_name::<E>(), messages, String::new())
    }
}

/// Builds nested error values from the messages of an error chain, outermost
/// first. Only the outermost error gets `name` and `stack`.
pub(crate) fn error_chain(
    name: &'static str,
    messages: impl Iterator<Item = String>,
    mut stack: String,
) -> Value {
    let messages: Vec<String> = messages.collect();
    let mut cause: Option<Value> = None;
    for (index, message) in messages.into_iter().enumerate().rev() {
        let class = if index == 0 { name } else { "Error" };
        let mut slots = ErrorSlots::new(class, message);
        if index == 0 {
            slots.stack = core::mem::take(&mut stack);
        }
        slots.cause = cause.take();
        cause = Some(Value::Object(Object::error_with_class(class, slots)));
    }
    cause.unwrap_or_default()
}

/// Returns the last path segment of a type name, without generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = core::any::type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::fmt;

    use super::*;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("outer failed")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("inner failed")
        }
    }

    impl core::error::Error for Outer {
        fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    impl core::error::Error for Inner {}

    #[test]
    fn test_safe_integer_boundary() {
        assert!(matches!(Value::from(9_007_199_254_740_991_i64), Value::Number(_)));
        assert!(matches!(Value::from(9_007_199_254_740_992_i64), Value::BigInt(_)));
        assert!(matches!(Value::from(-9_007_199_254_740_992_i64), Value::BigInt(_)));
        assert!(matches!(Value::from(u128::MAX), Value::BigInt(_)));
    }

    #[test]
    fn test_collections() {
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[\"a\",\"b\"]");
        assert_eq!(Value::from(()).to_string(), "undefined");
        assert_eq!(Value::from('x').to_string(), "\"x\"");
    }

    #[test]
    fn test_datetime_becomes_date() {
        let instant = DateTime::from_timestamp_millis(86_400_000).unwrap();
        assert_eq!(Value::from(instant).to_string(), "Date(1970-01-02T00:00:00.000Z)");
    }

    #[test]
    fn test_from_error_chain() {
        let value = Value::from_error(&Outer(Inner));
        let object = value.as_object().unwrap();
        assert_eq!(object.class(), "Outer");
        assert_eq!(
            value.to_string(),
            "Error({name:\"Outer\",message:\"outer failed\",stack:\"\",\
             cause:Error({name:\"Error\",message:\"inner failed\",stack:\"\"})})"
        );
    }

    #[test]
    fn test_error_chain_stack_on_outermost_only() {
        let value = error_chain(
            "Error",
            ["top".to_string(), "bottom".to_string()].into_iter(),
            "at main".to_string(),
        );
        assert_eq!(
            value.to_string(),
            "Error({name:\"Error\",message:\"top\",stack:\"at main\",\
             cause:Error({name:\"Error\",message:\"bottom\",stack:\"\"})})"
        );
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Outer>(), "Outer");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
    }
}
