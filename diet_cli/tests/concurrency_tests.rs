//! Concurrency tests for the nutri binary.
//!
//! Several processes appending to the same journals must never interleave
//! partial lines.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::thread;

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nutri"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn count_valid_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| serde_json::from_str::<serde_json::Value>(line).is_ok())
        .count()
}

#[test]
fn test_concurrent_weigh_appends() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir: PathBuf = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                cli(&data_dir)
                    .args(["weigh", &format!("{}", 70 + i)])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(count_valid_lines(&data_dir.join("weights.jsonl")), 8);
}

#[test]
fn test_concurrent_food_adds() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir: PathBuf = temp_dir.path().to_path_buf();

    let handles: Vec<_> = ["oats", "banana", "almonds", "tofu", "avocado", "lentils"]
        .into_iter()
        .map(|food| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                cli(&data_dir)
                    .args(["food", "add", "--lookup", food])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(count_valid_lines(&data_dir.join("food_log.jsonl")), 6);
}

fn add_food(data_dir: &Path, food: &str) -> String {
    let output = cli(data_dir)
        .args(["food", "add", "--lookup", food])
        .output()
        .unwrap();
    assert!(output.status.success());

    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .find_map(|line| line.trim().strip_prefix("id: ").map(str::to_string))
        .expect("entry id printed")
}

#[test]
fn test_concurrent_remove_and_add() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir: PathBuf = temp_dir.path().to_path_buf();

    let doomed: Vec<String> = ["oats", "banana", "almonds", "tofu"]
        .into_iter()
        .map(|food| add_food(&data_dir, food))
        .collect();

    let removers = doomed.clone().into_iter().map(|id| {
        let data_dir = data_dir.clone();
        thread::spawn(move || {
            cli(&data_dir)
                .args(["food", "remove", &id])
                .assert()
                .success();
        })
    });
    let adders = ["apple", "avocado", "lentils", "eggs"].into_iter().map(|food| {
        let data_dir = data_dir.clone();
        thread::spawn(move || {
            cli(&data_dir)
                .args(["food", "add", "--lookup", food])
                .assert()
                .success();
        })
    });
    let handles: Vec<_> = removers.chain(adders).collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let log = std::fs::read_to_string(data_dir.join("food_log.jsonl")).unwrap();
    assert_eq!(count_valid_lines(&data_dir.join("food_log.jsonl")), 4);
    for id in &doomed {
        assert!(!log.contains(id.as_str()));
    }
}
