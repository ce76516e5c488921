use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const PAGE_TWO_STROKE: &str = r#"[
    { "op": "goto", "page": 2 },
    { "op": "down", "x": 10, "y": 10 },
    { "op": "move", "x": 20, "y": 10 },
    { "op": "move", "x": 30, "y": 15 },
    { "op": "up" }
]"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("script should be written");
    path
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout should contain valid json")
}

#[test]
fn replay_emits_stable_json_contract() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let script = write_script(temp.path(), "stroke.json", PAGE_TWO_STROKE);

    let output = cargo_bin_cmd!("markup-cli")
        .arg("replay")
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("stdout should be utf-8");

    insta::assert_snapshot!(stdout, @r##"
    {
      "page": {
        "current": 2,
        "total": 5
      },
      "steps": 5,
      "ignored_navigations": 0,
      "failed_renders": 0,
      "annotations": [
        {
          "pageIndex": 2,
          "start": {
            "x": 10.0,
            "y": 10.0
          },
          "end": {
            "x": 20.0,
            "y": 10.0
          },
          "color": "#000000",
          "width": 2.0
        },
        {
          "pageIndex": 2,
          "start": {
            "x": 20.0,
            "y": 10.0
          },
          "end": {
            "x": 30.0,
            "y": 15.0
          },
          "color": "#000000",
          "width": 2.0
        }
      ]
    }
    "##);
}

#[test]
fn replay_reports_ignored_navigation() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let script = write_script(
        temp.path(),
        "nav.json",
        r#"[{ "op": "prev" }, { "op": "goto", "page": 4 }, { "op": "next" }]"#,
    );

    let output = cargo_bin_cmd!("markup-cli")
        .args(["replay", "--pages", "4", "--script"])
        .arg(&script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = stdout_json(&output);
    assert_eq!(value["ignored_navigations"], 2);
    assert_eq!(value["page"]["current"], 4);
    assert_eq!(value["page"]["total"], 4);
}

#[test]
fn replay_appends_to_stored_submission() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let store = temp.path().join("store");
    let pen = write_script(temp.path(), "pen.json", PAGE_TWO_STROKE);
    let eraser = write_script(
        temp.path(),
        "eraser.json",
        r#"[
            { "op": "goto", "page": 2 },
            { "op": "tool", "tool": "eraser" },
            { "op": "down", "x": 10, "y": 10 },
            { "op": "move", "x": 30, "y": 15 },
            { "op": "leave" }
        ]"#,
    );

    for script in [&pen, &eraser] {
        cargo_bin_cmd!("markup-cli")
            .args(["replay", "--submission", "essay-1", "--store"])
            .arg(&store)
            .arg("--script")
            .arg(script)
            .assert()
            .success();
    }

    let output = cargo_bin_cmd!("markup-cli")
        .args(["show", "--submission", "essay-1", "--store"])
        .arg(&store)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let segments = stdout_json(&output);
    let segments = segments.as_array().expect("annotations should be an array");
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0]["color"], "#000000");
    assert_eq!(segments[2]["color"], "#ffffff");
    assert_eq!(segments[2]["width"], 20.0);

    cargo_bin_cmd!("markup-cli")
        .args(["list", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::diff("essay-1\n"));
}

#[test]
fn read_only_replay_records_nothing() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let script = write_script(temp.path(), "stroke.json", PAGE_TWO_STROKE);

    let output = cargo_bin_cmd!("markup-cli")
        .args(["replay", "--read-only", "--script"])
        .arg(&script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = stdout_json(&output);
    assert_eq!(value["annotations"], Value::Array(Vec::new()));
    assert_eq!(value["page"]["current"], 2);
}

#[test]
fn render_writes_page_with_annotations() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let store = temp.path().join("store");
    let script = write_script(temp.path(), "stroke.json", PAGE_TWO_STROKE);
    let output_path = temp.path().join("out").join("page-2.png");

    cargo_bin_cmd!("markup-cli")
        .args(["replay", "--submission", "essay-2", "--store"])
        .arg(&store)
        .arg("--script")
        .arg(&script)
        .assert()
        .success();

    cargo_bin_cmd!("markup-cli")
        .args(["render", "--page", "2", "--submission", "essay-2", "--store"])
        .arg(&store)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("page-2.png"));

    let image = image::open(&output_path).expect("render should be readable image").to_rgba8();
    assert_eq!(image.dimensions(), (800, 1100));
    let [r, g, b, a] = image.get_pixel(15, 10).0;
    assert!(r < 16 && g < 16 && b < 16, "stroke pixel {:?}", [r, g, b]);
    assert_eq!(a, 255);
    assert_eq!(image.get_pixel(400, 600).0, [255, 255, 255, 255]);
}

#[test]
fn render_fails_for_out_of_range_page() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    cargo_bin_cmd!("markup-cli")
        .args(["render", "--pages", "3", "--page", "9", "--output"])
        .arg(temp.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("page 9 out of range (page_count=3)"));
}

#[test]
fn replay_fails_for_missing_script() {
    cargo_bin_cmd!("markup-cli")
        .args(["replay", "--script", "/nonexistent/script.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read script"));
}

#[test]
fn show_rejects_path_like_submission() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    cargo_bin_cmd!("markup-cli")
        .args(["show", "--submission", "../escape", "--store"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid submission id"));
}

#[test]
fn version_prints_package_version() {
    cargo_bin_cmd!("markup-cli")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", env!("CARGO_PKG_VERSION"))));
}
