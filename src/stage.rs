//! Post-build instrumentation hook.
//!
//! Build systems delete old instrumentation data as new builds arrive, so the
//! hook copies an index and every snippet it lists into
//! `<buildDir>/instrumentation/<indexName>/`, then writes a converted
//! `trace.json` alongside them.

use std::path::{Component, Path, PathBuf};

use crate::error::TraceError;
use crate::trace::{ConvertOptions, convert, read_index, write_trace};

/// File name of the converted trace inside the staging directory.
pub const TRACE_FILE_NAME: &str = "trace.json";

/// Result of staging one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedIndex {
    /// `<buildDir>/instrumentation/<indexName>`
    pub index_dir: PathBuf,
    pub trace_path: PathBuf,
    /// Number of snippets copied.
    pub snippets: usize,
}

/// The index's name up to its first `.`: `index-1.2.json` stages as `index-1`.
fn index_name(index: &Path) -> Result<&str, TraceError> {
    index
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| TraceError::malformed(index, "index path has no usable file name"))
}

/// Snippet paths must stay inside the data and staging directories.
fn check_snippet_path(index: &Path, snippet: &Path) -> Result<(), TraceError> {
    let escapes = snippet
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || snippet.as_os_str().is_empty() {
        return Err(TraceError::malformed(
            index,
            format!(
                "snippet path `{}` must be relative and stay below `dataDir`",
                snippet.display()
            ),
        ));
    }
    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<(), TraceError> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TraceError::Io {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    reflink_copy::reflink_or_copy(from, to).map_err(|e| TraceError::io(from, e))?;
    Ok(())
}

/// Copy `index` and its snippets into the build tree and convert it.
///
/// The conversion reads the original index, not the copy.
pub fn stage_index(
    index: &Path,
    options: &ConvertOptions,
    pretty: bool,
) -> Result<StagedIndex, TraceError> {
    let parsed = read_index(index)?;
    let build_dir = parsed
        .build_dir
        .ok_or_else(|| TraceError::malformed(index, "missing `buildDir`"))?;
    let data_dir = parsed
        .data_dir
        .ok_or_else(|| TraceError::malformed(index, "missing `dataDir`"))?;

    for snippet in &parsed.snippets {
        check_snippet_path(index, snippet)?;
    }

    let index_dir = build_dir.join("instrumentation").join(index_name(index)?);
    log::debug!("Staging {} into {}", index.display(), index_dir.display());

    for snippet in &parsed.snippets {
        copy_file(&data_dir.join(snippet), &index_dir.join(snippet))?;
    }
    if let Some(file_name) = index.file_name() {
        copy_file(index, &index_dir.join(file_name))?;
    }

    let events = convert(&[index.to_path_buf()], options)?;
    let trace_path = index_dir.join(TRACE_FILE_NAME);
    write_trace(&events, Some(trace_path.as_path()), pretty)?;

    Ok(StagedIndex {
        index_dir,
        trace_path,
        snippets: parsed.snippets.len(),
    })
}
