use alloc::{borrow::Cow, string::String, vec::Vec};
use core::fmt;

use errscribe_internals::{Identity, SharedCell, SharedReadGuard, SharedWriteGuard};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::Value;
use crate::serializer::write_shallow;

/// Own enumerable fields of an object, in insertion order.
pub type Fields = IndexMap<String, Value, FxBuildHasher>;

/// A shared handle to a composite value.
///
/// Cloning the handle shares the node. Use [`Object::identity`] or
/// [`Object::ptr_eq`] to tell nodes apart.
#[derive(Clone)]
pub struct Object(SharedCell<ObjectData>);

/// The contents of an [`Object`].
#[derive(Debug)]
pub struct ObjectData {
    /// Name of the constructor, used by shallow descriptors.
    pub class: Cow<'static, str>,
    /// Own enumerable fields.
    pub fields: Fields,
    /// The internal kind of the object.
    pub slots: Slots,
}

/// The internal kind of an object, deciding which renderer handles it.
#[derive(Debug)]
pub enum Slots {
    /// A plain keyed record. All of its state lives in the fields.
    Plain,
    /// An ordered sequence.
    Array(Vec<Value>),
    /// A point in time as milliseconds since the Unix epoch, or `None` for an
    /// invalid date.
    Date(Option<i64>),
    /// A regular expression.
    RegExp {
        /// The pattern text.
        source: String,
        /// The flag letters.
        flags: String,
    },
    /// An ordered key-value association with unique keys.
    Map(Vec<(Value, Value)>),
    /// An ordered collection of unique elements.
    Set(Vec<Value>),
    /// A raw byte buffer.
    ArrayBuffer {
        /// Size of the buffer in bytes.
        byte_length: usize,
    },
    /// A typed view over a byte buffer.
    View {
        /// The kind of view.
        kind: ViewKind,
        /// Size of the viewed region in bytes.
        byte_length: usize,
    },
    /// An error.
    Error(ErrorSlots),
    /// A global error event.
    ErrorEvent(ErrorEventSlots),
    /// An unhandled promise rejection event.
    RejectionEvent(RejectionEventSlots),
}

/// The internal state of an error object.
#[derive(Clone, Debug, Default)]
pub struct ErrorSlots {
    /// The error name, such as `"TypeError"`.
    pub name: String,
    /// The error message.
    pub message: String,
    /// The pre-rendered stack text.
    pub stack: String,
    /// The error that caused this one, if any.
    pub cause: Option<Value>,
}

impl ErrorSlots {
    /// Creates error slots with an empty stack and no cause.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: String::new(),
            cause: None,
        }
    }

    /// Sets the stack text.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }

    /// Sets the cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Value>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// The payload of a global error event.
#[derive(Clone, Debug, Default)]
pub struct ErrorEventSlots {
    /// The event type, usually `"error"`.
    pub event_type: String,
    /// The error message.
    pub message: String,
    /// The script that raised the error.
    pub filename: String,
    /// Line number in the script.
    pub lineno: u32,
    /// Column number in the script.
    pub colno: u32,
    /// The thrown value.
    pub error: Value,
}

/// The payload of an unhandled rejection event.
#[derive(Clone, Debug, Default)]
pub struct RejectionEventSlots {
    /// The event type, usually `"unhandledrejection"`.
    pub event_type: String,
    /// The rejection reason.
    pub reason: Value,
}

/// The kind of a typed view over a byte buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ViewKind {
    Int8Array,
    Uint8Array,
    Uint8ClampedArray,
    Int16Array,
    Uint16Array,
    Int32Array,
    Uint32Array,
    Float16Array,
    Float32Array,
    Float64Array,
    BigInt64Array,
    BigUint64Array,
    DataView,
}

impl ViewKind {
    /// Returns the type name of the view.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ViewKind::Int8Array => "Int8Array",
            ViewKind::Uint8Array => "Uint8Array",
            ViewKind::Uint8ClampedArray => "Uint8ClampedArray",
            ViewKind::Int16Array => "Int16Array",
            ViewKind::Uint16Array => "Uint16Array",
            ViewKind::Int32Array => "Int32Array",
            ViewKind::Uint32Array => "Uint32Array",
            ViewKind::Float16Array => "Float16Array",
            ViewKind::Float32Array => "Float32Array",
            ViewKind::Float64Array => "Float64Array",
            ViewKind::BigInt64Array => "BigInt64Array",
            ViewKind::BigUint64Array => "BigUint64Array",
            ViewKind::DataView => "DataView",
        }
    }
}

impl ObjectData {
    /// Creates object contents with no fields.
    #[must_use]
    pub fn new(class: impl Into<Cow<'static, str>>, slots: Slots) -> Self {
        Self {
            class: class.into(),
            fields: Fields::default(),
            slots,
        }
    }
}

impl Object {
    /// Allocates a new object node.
    #[must_use]
    pub fn new(data: ObjectData) -> Self {
        Self(SharedCell::new(data))
    }

    /// Creates an empty plain record of class `Object`.
    #[must_use]
    pub fn plain() -> Self {
        Self::with_class("Object")
    }

    /// Creates an empty plain record with a custom class name.
    #[must_use]
    pub fn with_class(class: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ObjectData::new(class, Slots::Plain))
    }

    /// Creates an array from the given items.
    #[must_use]
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let items = items.into_iter().map(Into::into).collect();
        Self::new(ObjectData::new("Array", Slots::Array(items)))
    }

    /// Creates a date from milliseconds since the Unix epoch.
    #[must_use]
    pub fn date(millis: i64) -> Self {
        Self::new(ObjectData::new("Date", Slots::Date(Some(millis))))
    }

    /// Creates a date that does not denote any point in time.
    #[must_use]
    pub fn invalid_date() -> Self {
        Self::new(ObjectData::new("Date", Slots::Date(None)))
    }

    /// Creates a regular expression.
    #[must_use]
    pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::new(ObjectData::new(
            "RegExp",
            Slots::RegExp {
                source: source.into(),
                flags: flags.into(),
            },
        ))
    }

    /// Creates a map from entries. A repeated key keeps its first position
    /// and takes the last value.
    #[must_use]
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let map = Self::new(ObjectData::new("Map", Slots::Map(Vec::new())));
        for (key, value) in entries {
            map.map_insert(key, value);
        }
        map
    }

    /// Creates a set from items, skipping duplicates.
    #[must_use]
    pub fn set<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let set = Self::new(ObjectData::new("Set", Slots::Set(Vec::new())));
        for item in items {
            set.set_add(item);
        }
        set
    }

    /// Creates a raw byte buffer of the given size.
    #[must_use]
    pub fn array_buffer(byte_length: usize) -> Self {
        Self::new(ObjectData::new(
            "ArrayBuffer",
            Slots::ArrayBuffer { byte_length },
        ))
    }

    /// Creates a typed view of the given size.
    #[must_use]
    pub fn view(kind: ViewKind, byte_length: usize) -> Self {
        Self::new(ObjectData::new(
            kind.name(),
            Slots::View { kind, byte_length },
        ))
    }

    /// Creates an error of class `Error`.
    #[must_use]
    pub fn error(slots: ErrorSlots) -> Self {
        Self::error_with_class("Error", slots)
    }

    /// Creates an error with a custom class name, such as a user-defined
    /// error subclass. Extra state goes into the fields.
    #[must_use]
    pub fn error_with_class(class: impl Into<Cow<'static, str>>, slots: ErrorSlots) -> Self {
        Self::new(ObjectData::new(class, Slots::Error(slots)))
    }

    /// Creates a global error event.
    #[must_use]
    pub fn error_event(slots: ErrorEventSlots) -> Self {
        Self::new(ObjectData::new("ErrorEvent", Slots::ErrorEvent(slots)))
    }

    /// Creates an unhandled rejection event.
    #[must_use]
    pub fn rejection_event(slots: RejectionEventSlots) -> Self {
        Self::new(ObjectData::new(
            "PromiseRejectionEvent",
            Slots::RejectionEvent(slots),
        ))
    }

    /// Returns the identity of this node.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.0.identity()
    }

    /// Returns `true` if both handles refer to the same node.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// Acquires shared access to the contents.
    pub fn read(&self) -> SharedReadGuard<'_, ObjectData> {
        self.0.read()
    }

    /// Acquires exclusive access to the contents.
    ///
    /// Must not be called while a read guard for the same node is alive on
    /// the current thread.
    pub fn write(&self) -> SharedWriteGuard<'_, ObjectData> {
        self.0.write()
    }

    /// Returns the class name.
    #[must_use]
    pub fn class(&self) -> Cow<'static, str> {
        self.read().class.clone()
    }

    /// Returns the own field keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.read().fields.keys().cloned().collect()
    }

    /// Returns a copy of the field value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().fields.get(key).cloned()
    }

    /// Sets a field, returning the previous value. An existing key keeps its
    /// position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let (key, value) = (key.into(), value.into());
        self.write().fields.insert(key, value)
    }

    /// Removes a field, preserving the order of the remaining ones.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().fields.shift_remove(key)
    }

    /// Appends an element to an array. Returns `false` if this object is not
    /// an array.
    pub fn push(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        match &mut self.write().slots {
            Slots::Array(items) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Inserts an entry into a map. Returns `false` if this object is not a
    /// map.
    pub fn map_insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> bool {
        let (key, value) = (key.into(), value.into());
        match &mut self.write().slots {
            Slots::Map(entries) => {
                match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
                true
            }
            _ => false,
        }
    }

    /// Adds an element to a set unless an equal one is present. Returns
    /// `false` if this object is not a set.
    pub fn set_add(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        match &mut self.write().slots {
            Slots::Set(items) => {
                if !items.iter().any(|item| item.same_value_zero(&value)) {
                    items.push(value);
                }
                true
            }
            _ => false,
        }
    }
}

/// Formats the shallow descriptor, so printing a cyclic graph terminates.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        write_shallow(&mut text, self);
        f.write_str(&text)
    }
}
