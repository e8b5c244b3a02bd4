//! Message emojis and output re-exports for terminal messages.
//!
//! Use `cformat!` with HTML-like tags for user-facing messages:
//!
//! ```rust,ignore
//! use color_print::cformat;
//!
//! cformat!("{ERROR_EMOJI} <red>File not found: <bold>{path}</></>")
//! ```
//!
//! Diagnostics and progress go to stderr; stdout is reserved for trace JSON.

// Re-exports from anstream (strips styling when the stream is not a terminal)
pub use anstream::{eprintln, println};

/// Success emoji: `cformat!("{SUCCESS_EMOJI} <green>message</>")`
pub const SUCCESS_EMOJI: &str = "✅";

/// Error emoji: `cformat!("{ERROR_EMOJI} <red>message</>")`
pub const ERROR_EMOJI: &str = "❌";

/// Hint emoji: `cformat!("{HINT_EMOJI} <dim>message</>")`
pub const HINT_EMOJI: &str = "💡";
