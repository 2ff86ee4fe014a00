#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DOC: &str = "\
tags:
  - tag: Video
    attrs:
      name: clip
      value: $video
      width: 640
  - tag: TreeSelect
    attrs:
      name: category
      toName: clip
";

fn annotag_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("annotag"));
    cmd.current_dir(dir)
        .env("ANNOTAG_CONFIG_DIR", dir.join("global"))
        .env_remove("ANNOTAG_LOG");
    cmd
}

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("doc.yaml"), DOC).unwrap();
    fs::write(
        temp.path().join("task.json"),
        r#"{"video": "http://x/v.mp4"}"#,
    )
    .unwrap();
    temp
}

#[test]
fn test_tags_lists_builtin_tags() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args(["tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("treeselect"))
        .stdout(predicate::str::contains("video"));
}

#[test]
fn test_tags_describes_one_tag_as_json() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args(["tags", "Video", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"onHotKey\""))
        .stdout(predicate::str::contains("\"resolved_value\""));
}

#[test]
fn test_unknown_tag_fails() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args(["tags", "audio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tag: audio"));
}

#[test]
fn test_render_resolves_task_data() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args(["render", "doc.yaml", "--task", "task.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src=http://x/v.mp4"))
        .stdout(predicate::str::contains("width=640"))
        .stdout(predicate::str::contains("tree-select"));
}

#[test]
fn test_render_without_task_shows_nothing_for_video() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args(["render", "doc.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(nothing to render)"));
}

#[test]
fn test_act_then_reload_annotation() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args([
            "act",
            "doc.yaml",
            "--target",
            "category",
            "--action",
            "onChange",
            "--args",
            r#"["0-1-0", "0-1-1"]"#,
            "--save",
            "annotation.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"))
        .stdout(predicate::str::contains("Saved annotation to annotation.json"));

    let saved = fs::read_to_string(temp.path().join("annotation.json")).unwrap();
    assert!(saved.contains("\"choices\""));
    assert!(saved.contains("0-1-1"));

    annotag_cmd(temp.path())
        .args([
            "state",
            "doc.yaml",
            "--annotation",
            "annotation.json",
            "--output",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"0-1-0\""))
        .stdout(predicate::str::contains("\"0-1-1\""));
}

#[test]
fn test_act_reports_structured_change() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args([
            "act", "doc.yaml", "-t", "clip", "-a", "onHotKey", "-o", "yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("change:"))
        .stdout(predicate::str::contains("- playing"));
}

#[test]
fn test_act_rejects_bad_input() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args(["act", "doc.yaml", "-t", "category", "-a", "onChange", "--args", "[oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--args must be valid JSON"));

    annotag_cmd(temp.path())
        .args(["act", "doc.yaml", "-t", "category", "-a", "explode"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown action 'explode'"));

    annotag_cmd(temp.path())
        .args(["act", "doc.yaml", "-t", "nobody", "-a", "clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nobody"));
}

#[test]
fn test_config_reads_working_directory_file() {
    let temp = workspace();
    fs::write(
        temp.path().join("annotag.toml"),
        "template_sigil = \"@\"\n",
    )
    .unwrap();
    annotag_cmd(temp.path())
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("template_sigil = @"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let temp = workspace();
    annotag_cmd(temp.path())
        .args(["render", "doc.yaml", "-v"])
        .assert()
        .success()
        .stderr(predicate::str::contains("opened document"));
}
