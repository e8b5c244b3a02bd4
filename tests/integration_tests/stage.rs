//! The `steptrace-stage` instrumentation hook.

use crate::common::{TestBuild, assert_success, parse_trace, record, render_events};
use insta::assert_snapshot;

#[test]
fn test_stage_copies_index_and_writes_trace() {
    let build = TestBuild::new();
    let index = build.write_index(
        "index-3.json",
        &[
            record("cc -c a.c", 0, 40, "obj/a.o"),
            record("cc -c b.c", 10, 50, "obj/b.o"),
        ],
    );

    let output = build.stage_command().arg(&index).output().unwrap();
    assert_success(&output);

    let staged = build.root().join("build/instrumentation/index-3");
    assert!(staged.join("index-3.json").is_file());
    assert!(staged.join("target/snippet-0.json").is_file());
    assert!(staged.join("target/snippet-1.json").is_file());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Staged 2 snippets"));

    let events = parse_trace(&std::fs::read_to_string(staged.join("trace.json")).unwrap());
    assert_snapshot!(render_events(&events), @r"
    pid=0 tid=0 ts=10000 dur=50000 targets b.o
    pid=0 tid=1 ts=0 dur=40000 targets a.o
    ");
}

#[test]
fn test_stage_keeps_copies_independent_of_source() {
    let build = TestBuild::new();
    let index = build.write_index("index-1.json", &[record("cc -c a.c", 0, 40, "obj/a.o")]);

    assert_success(&build.stage_command().arg(&index).output().unwrap());
    std::fs::remove_dir_all(build.root().join("data")).unwrap();

    let staged = build.root().join("build/instrumentation/index-1");
    assert!(staged.join("target/snippet-0.json").is_file());
}

#[test]
fn test_stage_without_build_dir_fails() {
    let build = TestBuild::new();
    let index = build.write("data/index/index-1.json", r#"{"snippets": []}"#);

    let output = build.stage_command().arg(&index).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to stage"), "{stderr}");
    assert!(stderr.contains("buildDir"), "{stderr}");
}

#[test]
fn test_stage_missing_index_fails() {
    let build = TestBuild::new();

    let output = build
        .stage_command()
        .arg(build.root().join("index.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
}
