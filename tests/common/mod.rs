//! # Test Utilities for steptrace
//!
//! ## TestBuild
//!
//! `TestBuild` lays out build instrumentation in a temporary directory: step
//! record lists, indexes with their snippets, ninja logs and time traces. Each
//! test gets a fresh tree that is removed when the test ends.
//!
//! ## Environment Isolation
//!
//! Commands built by [`TestBuild::command`] point `STEPTRACE_CONFIG_PATH` into
//! the temp tree and drop any inherited `STEPTRACE_*` or `RUST_LOG` variables,
//! so the user's own config never leaks into a test.
//!
//! ## Path Canonicalization
//!
//! The temp root is canonicalized (macOS symlinks `/var` to `/private/var`) so
//! paths in error output match the paths tests build.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use insta_cmd::get_cargo_bin;
use serde_json::{Value, json};
use tempfile::TempDir;

pub struct TestBuild {
    _temp_dir: TempDir, // Must keep to ensure cleanup on drop
    root: PathBuf,
}

impl TestBuild {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp path");
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where commands look for a config file. Not created unless a test writes it.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// A JSON list of step records.
    pub fn write_records(&self, rel: &str, records: &[Value]) -> PathBuf {
        self.write(rel, &Value::Array(records.to_vec()).to_string())
    }

    /// An index at `data/index/<name>` listing one snippet per record.
    ///
    /// Snippets land under `data/target/`; `buildDir` is `<root>/build`.
    pub fn write_index(&self, name: &str, records: &[Value]) -> PathBuf {
        let snippets: Vec<String> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let rel = format!("target/snippet-{i}.json");
                self.write(&format!("data/{rel}"), &record.to_string());
                rel
            })
            .collect();

        let index = json!({
            "version": 1,
            "buildDir": self.root.join("build"),
            "dataDir": self.root.join("data"),
            "snippets": snippets,
        });
        self.write(&format!("data/index/{name}"), &index.to_string())
    }

    /// A ninja log; each entry is `(start, end, output, cmdhash)`.
    pub fn write_ninja_log(&self, rel: &str, entries: &[(u64, u64, &str, &str)]) -> PathBuf {
        let mut log = String::from("# ninja log v5\n");
        for (start, end, output, hash) in entries {
            log.push_str(&format!("{start}\t{end}\t0\t{output}\t{hash}\n"));
        }
        self.write(rel, &log)
    }

    /// A clang `-ftime-trace` file of complete events `(name, ts, dur)`.
    pub fn write_time_trace(&self, rel: &str, spans: &[(&str, u64, u64)]) -> PathBuf {
        let events: Vec<Value> = spans
            .iter()
            .map(|(name, ts, dur)| json!({"ph": "X", "name": name, "ts": ts, "dur": dur, "pid": 1, "tid": 0}))
            .collect();
        self.write(rel, &json!({ "traceEvents": events }).to_string())
    }

    /// `steptrace` with an isolated environment.
    pub fn command(&self) -> Command {
        self.isolated(get_cargo_bin("steptrace"))
    }

    /// `steptrace-stage` with an isolated environment.
    pub fn stage_command(&self) -> Command {
        self.isolated(get_cargo_bin("steptrace-stage"))
    }

    fn isolated(&self, bin: PathBuf) -> Command {
        let mut cmd = Command::new(bin);
        for (key, _) in std::env::vars() {
            if key.starts_with("STEPTRACE_") || key == "RUST_LOG" {
                cmd.env_remove(&key);
            }
        }
        cmd.env("STEPTRACE_CONFIG_PATH", self.config_path());
        cmd.current_dir(&self.root);
        cmd
    }
}

/// One step record producing `output`.
pub fn record(command: &str, start: u64, duration: u64, output: &str) -> Value {
    json!({
        "version": 1,
        "command": command,
        "role": "compile",
        "timeStart": start,
        "duration": duration,
        "outputs": [output],
    })
}

/// Run `cmd`, asserting success, and parse stdout as a trace.
pub fn run_trace(cmd: &mut Command) -> Vec<Value> {
    let output = cmd.output().expect("Failed to run steptrace");
    assert_success(&output);
    parse_trace(&String::from_utf8_lossy(&output.stdout))
}

pub fn parse_trace(content: &str) -> Vec<Value> {
    let value: Value = serde_json::from_str(content).expect("Output should be valid JSON");
    value.as_array().expect("Trace should be a JSON array").clone()
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed ({}):\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// One line per event, for inline snapshots.
pub fn render_events(events: &[Value]) -> String {
    events
        .iter()
        .map(|e| {
            format!(
                "pid={} tid={} ts={} dur={} {} {}",
                e["pid"],
                e["tid"],
                e["ts"],
                e["dur"],
                e["cat"].as_str().unwrap_or("?"),
                e["name"].as_str().unwrap_or("?")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
