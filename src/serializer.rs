//! Cycle-safe rendering of values into a compact textual notation.
//!
//! There are two modes:
//!
//! - [`RenderMode::Deep`] walks the whole value graph and renders every
//!   composite through the [dispatch table](crate::handlers). When the walk
//!   reaches an object that is already being rendered further up the current
//!   path, it writes `CircularReference(<shallow descriptor>)` and does not
//!   descend again.
//! - [`RenderMode::Shallow`] never recurses. Arrays become
//!   `Array(length:N)`, other composites become
//!   `Object(class:<class> keys:<k1,k2>)`, and primitives use their plain
//!   text.
//!
//! ```
//! use errscribe::{
//!     object,
//!     serializer::{RenderMode, render},
//!     value::Value,
//! };
//!
//! let node = object! { "name" => "root" };
//! node.insert("parent", node.clone());
//! let value = Value::from(node.clone());
//!
//! assert_eq!(
//!     render(&value, RenderMode::Deep, true),
//!     r#"{name:"root",parent:CircularReference(Object(class:Object keys:name,parent))}"#
//! );
//! assert_eq!(
//!     render(&value, RenderMode::Shallow, true),
//!     "Object(class:Object keys:name,parent)"
//! );
//! node.remove("parent");
//! ```

use alloc::string::String;
use core::fmt::{self, Write};

use hashbrown::HashSet;
use rustc_hash::FxBuildHasher;

use crate::{
    handlers::{Subject, resolve},
    value::{Identity, Object, Slots, Value, write_number},
};

/// Whether rendering descends into composite values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// One-line, non-recursive description.
    Shallow,
    /// Full structural rendering with cycle protection.
    #[default]
    Deep,
}

/// Options for a [`Serializer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct RenderOptions {
    /// The rendering mode.
    pub mode: RenderMode,
    /// Whether text values are wrapped in double quotes. Applies to nested
    /// text as well as the top-level value.
    pub quote_strings: bool,
    /// The number of nested composites the serializer may enter before it
    /// writes `Truncated(<shallow descriptor>)` instead. `None` means no
    /// limit.
    pub max_depth: Option<usize>,
}

impl RenderOptions {
    /// Deep rendering with quoted strings and no depth limit.
    pub const DEFAULT: Self = Self {
        mode: RenderMode::Deep,
        quote_strings: true,
        max_depth: None,
    };

    /// Deep rendering without quoting, used for stack text.
    pub const UNQUOTED: Self = Self {
        mode: RenderMode::Deep,
        quote_strings: false,
        max_depth: None,
    };

    /// Sets the rendering mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets whether text values are quoted.
    #[must_use]
    pub const fn with_quote_strings(mut self, quote_strings: bool) -> Self {
        self.quote_strings = quote_strings;
        self
    }

    /// Sets the depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Renders a value with the given mode and quoting.
///
/// This never fails and always terminates, including on cyclic graphs.
#[must_use]
pub fn render(value: &Value, mode: RenderMode, quote_strings: bool) -> String {
    let options = RenderOptions::DEFAULT
        .with_mode(mode)
        .with_quote_strings(quote_strings);
    Serializer::new(options).render(value)
}

/// A reusable renderer.
///
/// Each call to [`Serializer::render`] starts with an empty identity set and
/// leaves it empty again, so one serializer can render many values.
///
/// ```
/// use errscribe::{
///     array,
///     serializer::{RenderOptions, Serializer},
///     value::Value,
/// };
///
/// let nested = Value::from(array![array![array!["deep"]]]);
/// let mut serializer = Serializer::new(RenderOptions::DEFAULT.with_max_depth(Some(2)));
/// assert_eq!(serializer.render(&nested), "[[Truncated(Array(length:1))]]");
/// ```
#[derive(Debug)]
pub struct Serializer {
    options: RenderOptions,
    out: String,
    /// Objects on the path from the root to the node being rendered.
    path: HashSet<Identity, FxBuildHasher>,
}

impl Serializer {
    /// Creates a serializer with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            out: String::new(),
            path: HashSet::default(),
        }
    }

    /// Returns the options of this serializer.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders a value.
    pub fn render(&mut self, value: &Value) -> String {
        self.out.clear();
        match self.options.mode {
            RenderMode::Shallow => self.write_plain(value),
            RenderMode::Deep => self.write_value(value),
        }
        debug_assert!(self.path.is_empty());
        core::mem::take(&mut self.out)
    }

    pub(crate) fn write_value(&mut self, value: &Value) {
        match value {
            Value::Object(object) => self.write_object(object),
            primitive => {
                let subject = Subject::Primitive(primitive);
                resolve(&subject).render(self, &subject);
            }
        }
    }

    fn write_object(&mut self, object: &Object) {
        let identity = object.identity();
        if self.path.contains(&identity) {
            self.push_str("CircularReference(");
            write_shallow(&mut self.out, object);
            self.push(')');
            return;
        }
        if let Some(max_depth) = self.options.max_depth
            && self.path.len() >= max_depth
        {
            tracing::trace!(max_depth, ?identity, "value rendering truncated");
            self.push_str("Truncated(");
            write_shallow(&mut self.out, object);
            self.push(')');
            return;
        }

        self.path.insert(identity);
        {
            let data = object.read();
            let subject = Subject::Composite(&data);
            resolve(&subject).render(self, &subject);
        }
        self.path.remove(&identity);
    }

    /// Writes a text value, quoted or not depending on the options.
    pub(crate) fn write_text(&mut self, text: &str) {
        if self.options.quote_strings {
            self.push('"');
            self.push_str(text);
            self.push('"');
        } else {
            self.push_str(text);
        }
    }

    /// Writes the default textual conversion of a value.
    pub(crate) fn write_plain(&mut self, value: &Value) {
        write_plain(&mut self.out, value);
    }

    pub(crate) fn write_joined<I, T>(&mut self, items: I, mut write: impl FnMut(&mut Self, T))
    where
        I: IntoIterator<Item = T>,
    {
        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                self.push(',');
            }
            write(self, item);
        }
    }

    pub(crate) fn push(&mut self, c: char) {
        self.out.push(c);
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    pub(crate) fn push_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
    }
}

/// Writes the shallow descriptor of an object.
pub(crate) fn write_shallow(out: &mut String, object: &Object) {
    let data = object.read();
    if let Slots::Array(items) = &data.slots {
        let _ = write!(out, "Array(length:{})", items.len());
        return;
    }
    let _ = write!(out, "Object(class:{} keys:", data.class);
    for (index, key) in data.fields.keys().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(key);
    }
    out.push(')');
}

fn write_plain(out: &mut String, value: &Value) {
    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, *n),
        Value::BigInt(big) => {
            let _ = write!(out, "{big}");
        }
        Value::String(text) => out.push_str(text),
        Value::Symbol(description) => {
            let _ = write!(out, "Symbol({})", description.as_deref().unwrap_or(""));
        }
        Value::Function(callable) => {
            let _ = write!(out, "function {}() {{}}", callable.name());
        }
        Value::Object(object) => write_shallow(out, object),
    }
}
