//! Capturing stack text for records that arrive without one.
//!
//! Frames are resolved with the [`backtrace`] crate. Frames from the capture
//! machinery at the top and from the runtime at the bottom are dropped, so
//! the text starts at the code that reported the error.
//!
//! ```
//! use errscribe::stack::{StackFilter, capture_stack};
//!
//! let stack = capture_stack(&StackFilter {
//!     max_entry_count: 5,
//!     ..StackFilter::DEFAULT
//! });
//! assert!(stack.lines().count() <= 5);
//! ```

use alloc::{borrow::Cow, format, string::String, vec::Vec};
use core::fmt::Write;
use std::sync::OnceLock;

use backtrace::BytesOrWideString;

/// Which frames end up in a captured stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StackFilter {
    /// Crates whose frames are skipped at the top of the stack, until the
    /// first frame from another crate.
    pub skipped_initial_crates: &'static [&'static str],
    /// Crates whose frames are skipped at the bottom of the stack.
    pub skipped_final_crates: &'static [&'static str],
    /// The maximum number of frames written.
    pub max_entry_count: usize,
}

impl StackFilter {
    /// Skips the capture machinery and the runtime, keeping 20 frames.
    pub const DEFAULT: Self = Self {
        skipped_initial_crates: &["backtrace", "errscribe"],
        skipped_final_crates: &["std", "core", "alloc"],
        max_entry_count: 20,
    };

    /// Keeps every frame.
    pub const UNFILTERED: Self = Self {
        skipped_initial_crates: &[],
        skipped_final_crates: &[],
        max_entry_count: usize::MAX,
    };
}

impl Default for StackFilter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

struct Frame {
    symbol: String,
    path: String,
    lineno: Option<u32>,
    crate_name: Option<Cow<'static, str>>,
}

/// Captures the stack of the current thread as text, one frame per line,
/// most recent first.
///
/// Each line reads `at <symbol> (<path>:<line>)`. Returns an empty string
/// when no frame could be resolved.
#[must_use]
pub fn capture_stack(filter: &StackFilter) -> String {
    let mut initial_filtering = !filter.skipped_initial_crates.is_empty();
    let mut frames: Vec<Frame> = Vec::new();

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            let (Some(name), Some(filename)) = (symbol.name(), symbol.filename_raw()) else {
                return;
            };
            if frames.len() >= filter.max_entry_count {
                return;
            }

            let symbol_text = format!("{name:#}");
            let crate_name = crate_of(&symbol_text, &filename);

            if initial_filtering {
                if let Some(crate_name) = &crate_name
                    && filter.skipped_initial_crates.contains(&&**crate_name)
                {
                    return;
                }
                initial_filtering = false;
            }

            frames.push(Frame {
                symbol: symbol_text,
                path: filename.to_str_lossy().into_owned(),
                lineno: symbol.lineno(),
                crate_name,
            });
        });
        frames.len() < filter.max_entry_count
    });

    while let Some(last) = frames.last() {
        let runtime_frame = last
            .crate_name
            .as_deref()
            .is_some_and(|name| filter.skipped_final_crates.contains(&name))
            || last.symbol == "__libc_start_call_main"
            || last.symbol == "__libc_start_main_impl";
        if !runtime_frame {
            break;
        }
        frames.pop();
    }

    let mut out = String::new();
    for (index, frame) in frames.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = write!(out, "at {} ({}", frame.symbol, frame.path);
        if let Some(lineno) = frame.lineno {
            let _ = write!(out, ":{lineno}");
        }
        out.push(')');
    }
    out
}

/// Finds the crate a frame belongs to, from its source path or, for this
/// crate, from its symbol.
fn crate_of(symbol: &str, path: &BytesOrWideString<'_>) -> Option<Cow<'static, str>> {
    static REGEXES: OnceLock<Option<[regex::Regex; 2]>> = OnceLock::new();

    if symbol.starts_with("errscribe::") || symbol.starts_with("<errscribe::") {
        return Some(Cow::Borrowed("errscribe"));
    }

    let [std_regex, registry_regex] = REGEXES
        .get_or_init(|| {
            Some([
                // /lib/rustlib/src/rust/library/{std|core|alloc}/src/...
                // /rustc/{hash}/library/{std|core|alloc}/src/...
                regex::Regex::new(
                    r"(?:/lib/rustlib/src/rust|^/rustc/[0-9a-f]{40})/library/(std|core|alloc)/src/.*$",
                )
                .ok()?,
                // /.cargo/registry/src/{index}-{hash}/{crate}-{version}/src/...
                regex::Regex::new(
                    r"/\.cargo/registry/src/[^/]+-[0-9a-f]{16}/([^./]+)-[0-9]+\.[^/]*/src/.*$",
                )
                .ok()?,
            ])
        })
        .as_ref()?;

    let path = path.to_str_lossy();
    std_regex
        .captures(&path)
        .or_else(|| registry_regex.captures(&path))
        .and_then(|captures| captures.get(1))
        .map(|name| Cow::Owned(String::from(name.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline(never)]
    fn capture_here() -> String {
        capture_stack(&StackFilter::UNFILTERED)
    }

    #[test]
    fn test_every_line_is_a_frame() {
        let stack = capture_here();
        assert!(stack.lines().all(|line| line.starts_with("at ")));
    }

    #[test]
    fn test_max_entry_count() {
        let stack = capture_stack(&StackFilter {
            max_entry_count: 1,
            ..StackFilter::UNFILTERED
        });
        assert!(stack.lines().count() <= 1);
    }

    #[test]
    fn test_own_frames_detected_by_symbol() {
        let path = BytesOrWideString::Bytes(b"/tmp/src/lib.rs");
        assert_eq!(
            crate_of("errscribe::collector::Collector::add", &path).as_deref(),
            Some("errscribe")
        );
        assert_eq!(crate_of("main", &path), None);
    }

    #[test]
    fn test_registry_path() {
        let path = BytesOrWideString::Bytes(
            b"/home/u/.cargo/registry/src/index.crates.io-1949cf8c6b5b557f/tokio-1.40.0/src/lib.rs",
        );
        assert_eq!(crate_of("tokio::run", &path).as_deref(), Some("tokio"));
    }
}
