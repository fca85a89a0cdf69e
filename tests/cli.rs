use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// A fresh directory for one test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("plz-cli-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn plz(dir: &PathBuf, args: &[&str]) -> i32 {
    let status = Command::new(env!("CARGO_BIN_EXE_plz"))
        .current_dir(dir)
        .args(args)
        .status()
        .unwrap();
    status.code().unwrap()
}

#[test]
fn test_round_trip_through_files() {
    let dir = scratch_dir("round-trip");
    let input = b"the quick brown fox, the quick brown dog".to_vec();
    fs::write(dir.join("data"), &input).unwrap();

    assert_eq!(plz(&dir, &["--check", "data"]), 0);
    assert!(dir.join("data.plz").exists());

    fs::rename(dir.join("data.plz"), dir.join("copy.plz")).unwrap();
    assert_eq!(plz(&dir, &["-d", "copy.plz"]), 0);
    assert_eq!(fs::read(dir.join("copy")).unwrap(), input);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_failed_decompression_removes_output() {
    let dir = scratch_dir("truncated");
    fs::write(dir.join("data"), b"abracadabra, abracadabra!").unwrap();
    assert_eq!(plz(&dir, &["data"]), 0);

    let mut compressed = fs::read(dir.join("data.plz")).unwrap();
    compressed.pop();
    fs::write(dir.join("bad.plz"), compressed).unwrap();

    assert_eq!(plz(&dir, &["-d", "bad.plz"]), 1);
    assert!(!dir.join("bad").exists());
    // Nothing is left behind to block a second attempt.
    assert_eq!(plz(&dir, &["-d", "bad.plz"]), 1);
    assert!(!dir.join("bad").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_existing_output_is_kept() {
    let dir = scratch_dir("existing");
    fs::write(dir.join("data"), b"payload").unwrap();
    fs::write(dir.join("data.plz"), b"keep me").unwrap();

    assert_eq!(plz(&dir, &["data"]), 2);
    assert_eq!(fs::read(dir.join("data.plz")).unwrap(), b"keep me");
    let _ = fs::remove_dir_all(&dir);
}
