//! Rendering [`anyhow::Error`] values.
//!
//! An [`anyhow::Error`] becomes an error value whose `cause` chain follows
//! [`anyhow::Error::chain`]. A captured backtrace is kept as the stack text
//! of the outermost error.
//!
//! ```
//! use anyhow::Context;
//! use errscribe::value::Value;
//!
//! let error = Err::<(), _>(anyhow::anyhow!("connection refused"))
//!     .context("failed to load profile")
//!     .unwrap_err();
//!
//! let text = Value::from(&error).to_string();
//! assert!(text.starts_with("Error({name:\"Error\",message:\"failed to load profile\""));
//! assert!(text.contains("cause:Error({name:\"Error\",message:\"connection refused\""));
//! ```

use alloc::string::{String, ToString};
use std::backtrace::BacktraceStatus;

use anyhow::Error;

use crate::{into_value::error_chain, value::Value};

impl From<&Error> for Value {
    fn from(error: &Error) -> Self {
        let backtrace = error.backtrace();
        let stack = match backtrace.status() {
            BacktraceStatus::Captured => backtrace.to_string(),
            _ => String::new(),
        };
        error_chain("Error", error.chain().map(ToString::to_string), stack)
    }
}

impl From<Error> for Value {
    fn from(error: Error) -> Self {
        Value::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_error() {
        let error = anyhow::anyhow!("disk full");
        let value = Value::from(error);
        let object = value.as_object().unwrap();
        assert_eq!(object.class(), "Error");
        assert!(value.to_string().starts_with("Error({name:\"Error\",message:\"disk full\",stack:"));
    }

    #[test]
    fn test_context_chain_order() {
        let error = anyhow::anyhow!("inner").context("middle").context("outer");
        let text = Value::from(&error).to_string();
        let outer = text.find("\"outer\"").unwrap();
        let middle = text.find("\"middle\"").unwrap();
        let inner = text.find("\"inner\"").unwrap();
        assert!(outer < middle && middle < inner);
        assert_eq!(text.matches("cause:").count(), 2);
    }
}
