use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn annotex(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("annotex").unwrap();
    // Keep tests away from the user's real config file
    cmd.env("ANNOTEX_CONFIG", home.join("config.json"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn encode_writes_single_json_line() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("car.txt");
    let values = dir.path().join("values.json");
    fs::write(&text, "Make: \"Ford\"\nPrice: 12 500,00\n").unwrap();
    fs::write(&values, r#"{"make": "Ford", "price": 12500, "trim": null}"#).unwrap();

    let output = annotex(dir.path())
        .args(["encode", "--text"])
        .arg(&text)
        .arg("--values")
        .arg(&values)
        .args(["-m", "make=exact", "-m", "price=numeric"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);

    let record: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(record["text_snippet"]["content"], "Make: Ford\nPrice: 12 500,00\n");
    assert_eq!(record["annotations"][0]["display_name"], "make");
    assert_eq!(record["annotations"][0]["text_extraction"]["text_segment"]["start_offset"], 6);
    assert_eq!(record["annotations"][1]["display_name"], "price");
    assert_eq!(record["annotations"][1]["text_extraction"]["text_segment"]["start_offset"], 18);
    assert_eq!(record["annotations"][1]["text_extraction"]["text_segment"]["end_offset"], 27);
}

#[test]
fn encode_fails_without_matcher() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("car.txt");
    let values = dir.path().join("values.json");
    fs::write(&text, "Ford").unwrap();
    fs::write(&values, r#"{"make": "Ford"}"#).unwrap();

    annotex(dir.path())
        .args(["encode", "--text"])
        .arg(&text)
        .arg("--values")
        .arg(&values)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no matcher registered for field \"make\""));
}

#[test]
fn decode_picks_highest_score() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("car.txt");
    let predictions = dir.path().join("predictions.json");
    fs::write(&text, "Ford Tesla").unwrap();
    fs::write(
        &predictions,
        r#"{"payload": [
            {"display_name": "make", "text_extraction": {"score": 0.6, "text_segment": {"start_offset": "0", "end_offset": "4"}}},
            {"display_name": "make", "text_extraction": {"score": 0.9, "text_segment": {"start_offset": "5", "end_offset": "10"}}}
        ]}"#,
    )
    .unwrap();

    annotex(dir.path())
        .args(["decode", "--text"])
        .arg(&text)
        .arg("--predictions")
        .arg(&predictions)
        .args(["--field", "make"])
        .assert()
        .success()
        .stdout("Tesla\n");

    annotex(dir.path())
        .args(["decode", "--text"])
        .arg(&text)
        .arg("--predictions")
        .arg(&predictions)
        .args(["--field", "model", "--default", "None"])
        .assert()
        .success()
        .stdout("None\n");

    annotex(dir.path())
        .args(["decode", "--text"])
        .arg(&text)
        .arg("--predictions")
        .arg(&predictions)
        .args(["--field", "model"])
        .assert()
        .failure();

    annotex(dir.path())
        .args(["decode", "--text"])
        .arg(&text)
        .arg("--predictions")
        .arg(&predictions)
        .args(["--all", "--default", "None"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn batch_writes_records_and_manifest() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let out = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("a.txt"), "Ford Focus").unwrap();
    fs::write(input.join("b.txt"), "Tesla Model 3").unwrap();
    fs::write(input.join("c.txt"), "no values for this one").unwrap();

    let values = dir.path().join("values.json");
    fs::write(
        &values,
        r#"{"a": {"make": "Ford"}, "b": {"make": "Tesla"}}"#,
    )
    .unwrap();

    annotex(dir.path())
        .arg("batch")
        .arg(input.join("*.txt").to_str().unwrap())
        .arg("--values")
        .arg(&values)
        .arg("--output-dir")
        .arg(&out)
        .args(["--fallback", "normalized", "--test", "0.5"])
        .args(["--uri-prefix", "gs://bucket/ner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Records written: 2"));

    let manifest = fs::read_to_string(out.join("import.csv")).unwrap();
    assert_eq!(
        manifest,
        "TRAIN,gs://bucket/ner/a.jsonl\nTEST,gs://bucket/ner/b.jsonl\n"
    );
    assert!(out.join("a.jsonl").exists());
    assert!(!out.join("c.jsonl").exists());
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();

    annotex(dir.path())
        .args(["config", "set", "matchers.fields.price", "numeric"])
        .assert()
        .success();

    annotex(dir.path())
        .args(["config", "get", "matchers.fields.price"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"numeric\""));

    annotex(dir.path())
        .args(["config", "set", "dataset.test_fraction", "2.0"])
        .assert()
        .failure();
}

#[test]
fn config_follows_global_config_flag() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("custom.json");

    annotex(dir.path())
        .arg("-c")
        .arg(&custom)
        .args(["config", "set", "decode.default_value", "None"])
        .assert()
        .success();

    assert!(custom.exists());
    assert!(!dir.path().join("config.json").exists());

    annotex(dir.path())
        .args(["config", "get", "decode.default_value"])
        .assert()
        .success()
        .stdout("null\n");

    annotex(dir.path())
        .arg("-c")
        .arg(&custom)
        .args(["config", "get", "decode.default_value"])
        .assert()
        .success()
        .stdout("\"None\"\n");
}
