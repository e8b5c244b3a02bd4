//! Settings from the config file and `STEPTRACE_*` environment variables.

use crate::common::{TestBuild, record, run_trace};

fn build_with_trace() -> (TestBuild, std::path::PathBuf) {
    let build = TestBuild::new();
    let records = build.write_records(
        "records.json",
        &[record("clang++ -c foo.cpp", 0, 200, "foo.cpp.o")],
    );
    build.write_time_trace(
        "foo.cpp.json",
        &[("Frontend", 0, 120_000), ("Backend", 120_000, 30_000)],
    );
    (build, records)
}

#[test]
fn test_config_file_enables_embedding() {
    let (build, records) = build_with_trace();
    std::fs::write(
        build.config_path(),
        "embed-time-trace = true\ngranularity = 100000\n",
    )
    .unwrap();

    let events = run_trace(build.command().arg(&records));
    let names: Vec<&str> = events.iter().filter_map(|e| e["name"].as_str()).collect();
    assert_eq!(names, ["foo.cpp.o", "Frontend"]);
}

#[test]
fn test_flag_overrides_configured_granularity() {
    let (build, records) = build_with_trace();
    std::fs::write(build.config_path(), "granularity = 100000\n").unwrap();

    let events = run_trace(build.command().args(["-e", "-g", "10000"]).arg(&records));
    assert_eq!(events.len(), 3);
}

#[test]
fn test_environment_overrides_config_file() {
    let (build, records) = build_with_trace();
    std::fs::write(build.config_path(), "embed-time-trace = true\n").unwrap();

    let events = run_trace(
        build
            .command()
            .env("STEPTRACE_GRANULARITY", "200000")
            .arg(&records),
    );
    assert_eq!(events.len(), 1);
}

#[test]
fn test_configured_pretty_output() {
    let (build, records) = build_with_trace();
    std::fs::write(build.config_path(), "pretty = true\n").unwrap();

    let output = build.command().arg(&records).output().unwrap();
    crate::common::assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).lines().count() > 1);
}

#[test]
fn test_invalid_config_fails() {
    let (build, records) = build_with_trace();
    std::fs::write(build.config_path(), "granularity = 0\n").unwrap();

    let output = build.command().arg(&records).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "{stderr}");
    assert!(stderr.contains("granularity"), "{stderr}");
}
