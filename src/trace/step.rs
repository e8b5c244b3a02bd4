//! Read build steps from an instrumentation index, a record list, or a ninja log.
//!
//! Three source formats are accepted, detected from the content:
//!
//! An **index** references one JSON record per step. Snippet paths are relative
//! to the directory above the index (the index lives in `data/index/`, the
//! snippets under `data/`):
//! ```text
//! {"buildDir": "/src/build", "dataDir": "/src/build/.cmake/instrumentation/v1/data",
//!  "snippets": ["compile-0001.json", "link-0002.json"]}
//! ```
//!
//! A **record list** inlines the same records:
//! ```text
//! [{"command": "c++ -c foo.cpp", "timeStart": 1000, "duration": 250, "outputs": ["CMakeFiles/foo.dir/foo.cpp.o"]},
//!  {"command": "ctest -R smoke", "timeStart": 1300, "duration": 90, "testName": "smoke"}]
//! ```
//!
//! A **ninja log** is tab-separated `start end mtime output cmdhash`, in milliseconds:
//! ```text
//! # ninja log v5
//! 12	340	1700000000	obj/foo.o	5c2f2d7b1ad9e3f1
//! ```
//!
//! Records with the same command and start time describe one invocation that
//! produced several outputs, and are merged into a single [`Step`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::Millis;
use crate::error::TraceError;

const NINJA_LOG_HEADER: &str = "# ninja log v";

/// Oldest ninja log version that records a command hash.
const MIN_NINJA_LOG_VERSION: u32 = 5;

/// One build step, possibly standing for several outputs of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub start: Millis,
    pub end: Millis,
    /// Display names of what the step produced, in the order they were read.
    pub labels: Vec<String>,
}

impl Step {
    pub fn duration(&self) -> Millis {
        self.end - self.start
    }

    /// Name shown for the step's trace event.
    pub fn display_name(&self) -> String {
        self.labels.join(", ")
    }
}

/// Identity of a build step: the command that ran and when it started.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepKey {
    pub command: String,
    pub start: Millis,
}

/// How to treat a source that contains more than one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trim {
    /// Keep only the most recent (possibly incremental) build.
    #[default]
    LatestBuild,
    /// Keep every step in the source.
    ShowAll,
}

/// A single step record, as stored in an index snippet or a record list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub command: String,
    pub time_start: Millis,
    pub duration: Millis,
    #[serde(default)]
    pub outputs: Option<Vec<String>>,
    #[serde(default)]
    pub test_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl StepRecord {
    /// The base name of the first output, else the test name, else the role.
    pub fn label(&self) -> Option<String> {
        if let Some(first) = self.outputs.as_deref().and_then(<[String]>::first) {
            let name = Path::new(first)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| first.clone());
            return Some(name);
        }
        self.test_name.clone().or_else(|| self.role.clone())
    }

    pub fn end(&self) -> Millis {
        self.time_start + self.duration
    }
}

/// An instrumentation index.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    #[serde(default)]
    pub build_dir: Option<PathBuf>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    pub snippets: Vec<PathBuf>,
}

/// Accumulates steps, merging duplicates and restarting on a new build.
#[derive(Debug)]
pub struct StepCollector {
    trim: Trim,
    steps: IndexMap<StepKey, Step>,
    latest_end: Option<Millis>,
}

impl StepCollector {
    pub fn new(trim: Trim) -> Self {
        Self {
            trim,
            steps: IndexMap::new(),
            latest_end: None,
        }
    }

    /// Add one record's worth of step data.
    ///
    /// With [`Trim::LatestBuild`], a step that ends before the latest end seen
    /// so far marks the start of a newer build: everything collected until now
    /// is dropped and collection restarts from this step.
    pub fn push(&mut self, key: StepKey, end: Millis, label: String) {
        if self.trim == Trim::LatestBuild
            && let Some(latest) = self.latest_end
            && end < latest
        {
            log::debug!(
                "Step ending at {} precedes {}; discarding {} earlier steps",
                end,
                latest,
                self.steps.len()
            );
            self.steps.clear();
            self.latest_end = None;
        }
        self.latest_end = Some(self.latest_end.map_or(end, |latest| latest.max(end)));

        let start = key.start;
        self.steps
            .entry(key)
            .or_insert_with(|| Step {
                start,
                end,
                labels: Vec::new(),
            })
            .labels
            .push(label);
    }

    fn push_record(&mut self, path: &Path, record: StepRecord) -> Result<(), TraceError> {
        let label = record.label().ok_or_else(|| {
            TraceError::malformed(
                path,
                format!(
                    "record for `{}` needs `outputs`, `testName` or `role`",
                    record.command
                ),
            )
        })?;
        let end = record.end();
        self.push(
            StepKey {
                command: record.command,
                start: record.time_start,
            },
            end,
            label,
        );
        Ok(())
    }

    /// Collected steps, latest end first.
    pub fn finish(self) -> Vec<Step> {
        let mut steps: Vec<Step> = self.steps.into_values().collect();
        steps.sort_by(|a, b| b.end.cmp(&a.end));
        steps
    }
}

/// Read and normalize all steps from `path`.
pub fn read_steps(path: &Path, trim: Trim) -> Result<Vec<Step>, TraceError> {
    let content = std::fs::read_to_string(path).map_err(|e| TraceError::io(path, e))?;
    let mut collector = StepCollector::new(trim);

    if content.trim_start().starts_with(NINJA_LOG_HEADER) {
        log::debug!("Reading {} as a ninja log", path.display());
        parse_ninja_log(path, &content, &mut collector)?;
        return Ok(collector.finish());
    }

    let value: Value = serde_json::from_str(&content).map_err(|e| TraceError::malformed(path, e))?;
    match value {
        Value::Array(_) => {
            let records: Vec<StepRecord> =
                serde_json::from_value(value).map_err(|e| TraceError::malformed(path, e))?;
            log::debug!("Read {} step records from {}", records.len(), path.display());
            for record in records {
                collector.push_record(path, record)?;
            }
        }
        Value::Object(_) => {
            let index: Index =
                serde_json::from_value(value).map_err(|e| TraceError::malformed(path, e))?;
            log::debug!(
                "Reading {} snippets listed in {}",
                index.snippets.len(),
                path.display()
            );
            let root = snippet_root(path);
            for snippet in &index.snippets {
                let snippet_path = root.join(snippet);
                let record = read_record(&snippet_path)?;
                collector.push_record(&snippet_path, record)?;
            }
        }
        _ => {
            return Err(TraceError::malformed(
                path,
                "expected an index object or a list of step records",
            ));
        }
    }

    Ok(collector.finish())
}

/// Parse an instrumentation index without reading its snippets.
pub fn read_index(path: &Path) -> Result<Index, TraceError> {
    let content = std::fs::read_to_string(path).map_err(|e| TraceError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| TraceError::malformed(path, e))
}

fn read_record(path: &Path) -> Result<StepRecord, TraceError> {
    let content = std::fs::read_to_string(path).map_err(|e| TraceError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| TraceError::malformed(path, e))
}

/// Directory that snippet paths in `index` are relative to.
pub fn snippet_root(index: &Path) -> &Path {
    index
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""))
}

fn parse_ninja_log(
    path: &Path,
    content: &str,
    collector: &mut StepCollector,
) -> Result<(), TraceError> {
    let mut lines = content.lines().skip_while(|line| line.trim().is_empty());

    let header = lines.next().unwrap_or_default();
    let version: u32 = header
        .trim()
        .strip_prefix(NINJA_LOG_HEADER)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| TraceError::malformed(path, format!("bad ninja log header `{header}`")))?;
    if version < MIN_NINJA_LOG_VERSION {
        return Err(TraceError::malformed(
            path,
            format!("unsupported ninja log version {version}"),
        ));
    }

    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        // Header is line 1
        let lineno = lineno + 2;

        let fields: Vec<&str> = line.split('\t').collect();
        let [start, end, _mtime, output, cmdhash, ..] = fields.as_slice() else {
            return Err(TraceError::malformed(
                path,
                format!("line {lineno}: expected 5 tab-separated fields"),
            ));
        };
        let parse_ms = |field: &str, what: &str| {
            field.trim().parse().map(Millis).map_err(|_| {
                TraceError::malformed(path, format!("line {lineno}: bad {what} `{field}`"))
            })
        };
        let start = parse_ms(*start, "start time")?;
        let end = parse_ms(*end, "end time")?;
        if end < start {
            return Err(TraceError::malformed(
                path,
                format!("line {lineno}: step ends before it starts"),
            ));
        }

        collector.push(
            StepKey {
                command: cmdhash.to_string(),
                start,
            },
            end,
            output.to_string(),
        );
    }

    Ok(())
}
