//! steptrace error types
//!
//! **`TraceError`** is a typed enum for everything that aborts a conversion.
//! Binaries convert it into `anyhow::Error` with `?`, and can still recover the
//! variant with `downcast_ref`. Display produces styled output for users.

use std::path::{Path, PathBuf};

use color_print::cwrite;

use crate::styling::{ERROR_EMOJI, HINT_EMOJI};
use crate::trace::Micros;

/// Fatal conversion errors.
///
/// There is no partial output: any of these aborts the whole run.
///
/// ```ignore
/// if let Some(TraceError::Inconsistent { path, .. }) = err.downcast_ref() {
///     println!("{} does not match the build log", path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub enum TraceError {
    /// A source or a snippet it references does not exist.
    NotFound { path: PathBuf },
    /// Data that does not parse, or lacks a required field.
    Malformed { path: PathBuf, message: String },
    /// A time-trace span that does not fit inside its build step.
    Inconsistent {
        path: PathBuf,
        step: String,
        span: String,
        span_end: Micros,
        step_dur: Micros,
    },
    /// Any other read or write failure.
    Io { path: PathBuf, message: String },
}

impl TraceError {
    /// Classify an I/O error, separating missing files and undecodable
    /// content from other failures.
    pub fn io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => TraceError::NotFound {
                path: path.to_path_buf(),
            },
            // `read_to_string` on bytes that aren't UTF-8
            std::io::ErrorKind::InvalidData => TraceError::malformed(path, error),
            _ => TraceError::Io {
                path: path.to_path_buf(),
                message: error.to_string(),
            },
        }
    }

    pub fn malformed(path: &Path, message: impl std::fmt::Display) -> Self {
        TraceError::Malformed {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

impl std::error::Error for TraceError {}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceError::NotFound { path } => {
                let path = path.display();
                cwrite!(f, "{ERROR_EMOJI} <red>File not found: <bold>{path}</></>")
            }

            TraceError::Malformed { path, message } => {
                let path = path.display();
                cwrite!(
                    f,
                    "{ERROR_EMOJI} <red>Malformed input in <bold>{path}</>: {message}</>"
                )
            }

            TraceError::Inconsistent {
                path,
                step,
                span,
                span_end,
                step_dur,
            } => {
                let path = path.display();
                cwrite!(
                    f,
                    "{ERROR_EMOJI} <red>Inconsistent timing found in <bold>{path}</>: <bold>{span}</> ends {span_end} into <bold>{step}</>, which took {step_dur}</>\n\n{HINT_EMOJI} <dim>Ensure that timings are from consistent builds</>"
                )
            }

            TraceError::Io { path, message } => {
                let path = path.display();
                cwrite!(f, "{ERROR_EMOJI} <red>Failed to access <bold>{path}</>: {message}</>")
            }
        }
    }
}
