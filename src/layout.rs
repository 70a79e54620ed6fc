//! Re-indenting the compact notation into a readable multi-line layout.
//!
//! [`reformat`] makes a single pass over its input. Outside string literals
//! it breaks lines after `{`, `[` and `,`, before `}` and `]`, and puts a
//! space after `:`. Inside a literal opened by `"`, `'` or `` ` `` every
//! character is copied unchanged until the matching unescaped quote.
//!
//! ```
//! use errscribe::layout::{FormatOptions, reformat};
//!
//! assert_eq!(
//!     reformat("{a:1,b:[1,2]}", &FormatOptions::DEFAULT),
//!     "{\n  a: 1,\n  b: [\n    1,\n    2\n  ]\n}"
//! );
//! ```

use alloc::{borrow::Cow, string::String};

/// The text written once per indentation level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Indent {
    /// A number of space characters.
    Spaces(usize),
    /// A literal string, such as `"\t"`.
    Literal(Cow<'static, str>),
}

impl Indent {
    fn write_to(&self, out: &mut String, level: usize) {
        for _ in 0..level {
            match self {
                Indent::Spaces(count) => out.extend(core::iter::repeat_n(' ', *count)),
                Indent::Literal(unit) => out.push_str(unit),
            }
        }
    }
}

impl From<usize> for Indent {
    fn from(count: usize) -> Self {
        Indent::Spaces(count)
    }
}

impl From<&'static str> for Indent {
    fn from(unit: &'static str) -> Self {
        Indent::Literal(Cow::Borrowed(unit))
    }
}

impl From<String> for Indent {
    fn from(unit: String) -> Self {
        Indent::Literal(Cow::Owned(unit))
    }
}

/// Layout options for [`reformat`] and the record formatter.
///
/// Options are supplied per call and never stored by the crate.
///
/// ```
/// use errscribe::layout::{FormatOptions, reformat};
///
/// let options = FormatOptions::DEFAULT.with_indent("\t").with_newline("\r\n");
/// assert_eq!(reformat("[1]", &options), "[\r\n\t1\r\n]");
/// assert_eq!(reformat("{a:1}", &FormatOptions::COMPACT), "{\n  a:1\n}");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormatOptions {
    /// The indentation unit.
    pub indent: Indent,
    /// The line break token.
    pub newline: Cow<'static, str>,
    /// Whether a space is put after colons.
    pub colon_space: bool,
}

impl FormatOptions {
    /// Two spaces, `"\n"`, and a space after colons.
    pub const DEFAULT: Self = Self {
        indent: Indent::Spaces(2),
        newline: Cow::Borrowed("\n"),
        colon_space: true,
    };

    /// Like [`FormatOptions::DEFAULT`] but without spaces after colons.
    pub const COMPACT: Self = Self {
        indent: Indent::Spaces(2),
        newline: Cow::Borrowed("\n"),
        colon_space: false,
    };

    /// Like [`FormatOptions::DEFAULT`] but with `"\r\n"` line breaks.
    pub const CRLF: Self = Self {
        indent: Indent::Spaces(2),
        newline: Cow::Borrowed("\r\n"),
        colon_space: true,
    };

    /// Like [`FormatOptions::DEFAULT`] but indenting with tabs.
    pub const TABS: Self = Self {
        indent: Indent::Literal(Cow::Borrowed("\t")),
        newline: Cow::Borrowed("\n"),
        colon_space: true,
    };

    /// Sets the indentation unit.
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<Indent>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the line break token.
    #[must_use]
    pub fn with_newline(mut self, newline: impl Into<Cow<'static, str>>) -> Self {
        self.newline = newline.into();
        self
    }

    /// Sets whether a space is put after colons.
    #[must_use]
    pub fn with_colon_space(mut self, colon_space: bool) -> Self {
        self.colon_space = colon_space;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Re-indents raw notation.
///
/// The scan never fails. Closers without a matching opener leave the
/// indentation at zero. A colon between two ASCII digits, as in `12:30:05`,
/// is left alone, and spaces directly after a colon in the input are
/// replaced by the single inserted one.
///
/// ```
/// use errscribe::layout::{FormatOptions, reformat};
///
/// // Nothing inside a literal is touched, escaped quotes included.
/// assert_eq!(
///     reformat(r#"["a\"b,{c}"]"#, &FormatOptions::DEFAULT),
///     "[\n  \"a\\\"b,{c}\"\n]"
/// );
/// ```
#[must_use]
pub fn reformat(raw: &str, options: &FormatOptions) -> String {
    let mut out = String::with_capacity(raw.len() * 2);
    let mut level = 0_usize;
    let mut literal: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    let mut chars = raw.chars().peekable();

    let line_break = |out: &mut String, level: usize| {
        out.push_str(&options.newline);
        options.indent.write_to(out, level);
    };

    while let Some(c) = chars.next() {
        if let Some(quote) = literal {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                literal = None;
            }
            prev = Some(c);
            continue;
        }

        match c {
            '"' | '\'' | '`' => {
                literal = Some(c);
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                level += 1;
                line_break(&mut out, level);
            }
            '}' | ']' => {
                level = level.saturating_sub(1);
                let kept = out.trim_end_matches([' ', '\t']).len();
                out.truncate(kept);
                line_break(&mut out, level);
                out.push(c);
            }
            ',' => {
                out.push(c);
                line_break(&mut out, level);
            }
            ':' if options.colon_space && !between_digits(prev, chars.peek().copied()) => {
                out.push_str(": ");
                prev = Some(c);
                while let Some(space) = chars.next_if_eq(&' ') {
                    prev = Some(space);
                }
                continue;
            }
            _ => out.push(c),
        }
        prev = Some(c);
    }
    out
}

fn between_digits(before: Option<char>, after: Option<char>) -> bool {
    before.is_some_and(|c| c.is_ascii_digit()) && after.is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(raw: &str) -> String {
        reformat(raw, &FormatOptions::DEFAULT)
    }

    #[test]
    fn test_nested_layout() {
        assert_eq!(
            layout("{a:1,b:[1,2]}"),
            "{\n  a: 1,\n  b: [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn test_escaped_quote_stays_inside_literal() {
        let out = layout(r#""a\"b""#);
        assert_eq!(out, r#""a\"b""#);
    }

    #[test]
    fn test_each_quote_kind_opens_a_literal() {
        assert_eq!(layout("'a,b'"), "'a,b'");
        assert_eq!(layout("`{x}`"), "`{x}`");
        assert_eq!(layout(r#""it's""#), r#""it's""#);
    }

    #[test]
    fn test_colon_between_digits() {
        assert_eq!(layout("12:30:05"), "12:30:05");
        assert_eq!(layout("a:1"), "a: 1");
        assert_eq!(layout("1:a"), "1: a");
    }

    #[test]
    fn test_colon_swallows_following_spaces() {
        assert_eq!(layout("a:   b"), "a: b");
        assert_eq!(layout("a:\tb"), "a: \tb");
    }

    #[test]
    fn test_skipped_space_counts_as_previous_char() {
        // After `a: ` the previous raw char is a space, so `5:6` later still
        // sees its own neighbours.
        assert_eq!(layout("t: 5:6"), "t: 5:6");
    }

    #[test]
    fn test_excess_closers_are_clamped() {
        assert_eq!(layout("]]x"), "\n]\n]x");
    }

    #[test]
    fn test_closer_strips_trailing_indent() {
        assert_eq!(layout("{}"), "{\n\n}");
        assert_eq!(layout("[a  ]"), "[\n  a\n]");
    }

    #[test]
    fn test_colon_space_disabled() {
        assert_eq!(reformat("{a:1}", &FormatOptions::COMPACT), "{\n  a:1\n}");
    }

    #[test]
    fn test_literal_indent_and_newline() {
        let options = FormatOptions::TABS.with_newline("\r\n");
        assert_eq!(reformat("{a:[1]}", &options), "{\r\n\ta: [\r\n\t\t1\r\n\t]\r\n}");
        assert_eq!(
            reformat("[1]", &FormatOptions::DEFAULT.with_indent(0_usize)),
            "[\n1\n]"
        );
    }

    #[test]
    fn test_options_send_sync() {
        static_assertions::assert_impl_all!(FormatOptions: Send, Sync, Clone, Default);
    }
}
