//! Immutable snapshots of captured errors.

use alloc::string::String;

use chrono::{DateTime, Utc};

use crate::{
    serializer::{RenderOptions, Serializer},
    util::iso_millis,
    value::Value,
};

/// One captured error, already rendered to text.
///
/// Records are created once and never change afterwards. All four parts are
/// plain text: the error and metadata are deep renderings with quoted
/// strings, the stack is stored verbatim, and the creation time is
/// ISO-8601 UTC with millisecond precision.
///
/// ```
/// use chrono::DateTime;
/// use errscribe::{object, record::ErrorRecord, value::Value};
///
/// let created = DateTime::from_timestamp_millis(0).unwrap();
/// let meta = Value::from(object! { "from" => "console.error" });
/// let record = ErrorRecord::new(&Value::from("boom"), Some(&meta), "at main", created);
///
/// assert_eq!(record.error(), "\"boom\"");
/// assert_eq!(record.meta(), "{from:\"console.error\"}");
/// assert_eq!(record.stack(), "at main");
/// assert_eq!(record.create_time(), "1970-01-01T00:00:00.000Z");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ErrorRecord {
    error: String,
    meta: String,
    create_time: String,
    stack: String,
}

impl ErrorRecord {
    /// Renders `error` and `meta` and captures them as a record.
    ///
    /// A missing `meta` is rendered as `undefined`.
    #[must_use]
    pub fn new(error: &Value, meta: Option<&Value>, stack: &str, created: DateTime<Utc>) -> Self {
        Self::with_options(error, meta, stack, created, RenderOptions::DEFAULT)
    }

    /// Like [`ErrorRecord::new`], rendering `error` and `meta` with custom
    /// options. The stack is always stored verbatim.
    #[must_use]
    pub fn with_options(
        error: &Value,
        meta: Option<&Value>,
        stack: &str,
        created: DateTime<Utc>,
        options: RenderOptions,
    ) -> Self {
        let mut serializer = Serializer::new(options);
        let error = serializer.render(error);
        let meta = serializer.render(meta.unwrap_or(&Value::Undefined));
        Self {
            error,
            meta,
            create_time: iso_millis(created),
            stack: String::from(stack),
        }
    }

    /// Reassembles a record from text read back from storage.
    #[must_use]
    pub fn from_parts(
        error: impl Into<String>,
        meta: impl Into<String>,
        create_time: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            meta: meta.into(),
            create_time: create_time.into(),
            stack: stack.into(),
        }
    }

    /// The rendered error.
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    /// The rendered metadata.
    #[must_use]
    pub fn meta(&self) -> &str {
        &self.meta
    }

    /// The creation time text.
    #[must_use]
    pub fn create_time(&self) -> &str {
        &self.create_time
    }

    /// The stack text.
    #[must_use]
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Parses the creation time. Returns `None` if a record read back from
    /// storage carries a malformed timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.create_time)
            .ok()
            .map(|instant| instant.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{serializer::RenderMode, value::Object};

    fn epoch() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(0).unwrap()
    }

    #[test]
    fn test_record_send_sync() {
        static_assertions::assert_impl_all!(ErrorRecord: Send, Sync, Clone);
    }

    #[test]
    fn test_absent_meta_is_undefined() {
        let record = ErrorRecord::new(&Value::from(1), None, "", epoch());
        assert_eq!(record.error(), "1");
        assert_eq!(record.meta(), "undefined");
        assert_eq!(record.stack(), "");
    }

    #[test]
    fn test_custom_options() {
        let list = Value::from(Object::array(["x"]));
        let options = RenderOptions::DEFAULT.with_mode(RenderMode::Shallow);
        let record = ErrorRecord::with_options(&list, Some(&list), "s", epoch(), options);
        assert_eq!(record.error(), "Array(length:1)");
        assert_eq!(record.meta(), "Array(length:1)");
    }

    #[test]
    fn test_created_at_round_trips() {
        let created = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let record = ErrorRecord::new(&Value::Null, None, "", created);
        assert_eq!(record.created_at(), Some(created));
        let broken = ErrorRecord::from_parts("e", "m", "yesterday", "s");
        assert_eq!(broken.created_at(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_field_names() {
        let record = ErrorRecord::from_parts("\"e\"", "undefined", "2024-01-01T00:00:00.000Z", "");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"error":"\"e\"","meta":"undefined","createTime":"2024-01-01T00:00:00.000Z","stack":""}"#
        );
        let back: ErrorRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
