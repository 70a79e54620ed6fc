//! Converting [`serde_json::Value`] documents into values.
//!
//! Numbers that fit a double exactly become numbers; other integers become
//! big integers. Object keys keep the order the JSON map iterates in.
//!
//! ```
//! use errscribe::value::Value;
//!
//! let json = serde_json::json!({ "code": 503, "tags": ["retry"], "body": null });
//! assert_eq!(
//!     Value::from(json).to_string(),
//!     r#"{body:null,code:503,tags:["retry"]}"#
//! );
//! ```

use alloc::string::ToString;

use crate::value::{BigInt, Object, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(number) => number_value(&number),
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => Value::Object(Object::array(items)),
            serde_json::Value::Object(map) => {
                let object = Object::plain();
                for (key, value) in map {
                    object.insert(key, value);
                }
                Value::Object(object)
            }
        }
    }
}

fn number_value(number: &serde_json::Number) -> Value {
    if let Some(int) = number.as_i64() {
        return Value::from(int);
    }
    if let Some(int) = number.as_u64() {
        return Value::from(int);
    }
    match number.to_string().parse::<BigInt>() {
        Ok(big) => Value::BigInt(big),
        Err(_) => Value::Number(number.as_f64().unwrap_or(f64::NAN)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(Value::from(serde_json::json!(1.5)).to_string(), "1.5");
        assert_eq!(
            Value::from(serde_json::json!(u64::MAX)).to_string(),
            "18446744073709551615n"
        );
        assert_eq!(Value::from(serde_json::json!(-7)).to_string(), "-7");
    }

    #[test]
    fn test_nested() {
        let json = serde_json::json!({ "a": { "b": [true, "x"] } });
        assert_eq!(Value::from(json).to_string(), r#"{a:{b:[true,"x"]}}"#);
    }
}
