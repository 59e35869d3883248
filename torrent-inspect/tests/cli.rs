use assert_cmd::Command;
use assert_fs::{TempDir, prelude::*};

const TORRENT: &[u8] = b"d8:announce9:http://t/4:infod6:lengthi3e4:name5:a.txt\
    12:piece lengthi16e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";

const TORRENT_INFO_HASH: &str = "29e76e00fe5abc6c6e5ec1f2d0e2d83cee38b78b";

fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).expect("Must be able to find torrent-inspect binary")
}

#[test]
fn basic_stdin_test() {
    cmd()
        .write_stdin(b"li1ei2ee")
        .assert()
        .success()
        .stdout("l\n\ti1e\n\ti2e\ne\n");
}

#[test]
fn basic_file_test() {
    let tmpdir = TempDir::new().expect("Must be able to create temp dir");
    let f1 = tmpdir.child("f1.bencode");
    f1.write_binary(b"li1ei2ee")
        .expect("Must be able to create temp file");
    let f1p = f1.to_str().expect("Temp file path was not valid unicode");

    cmd()
        .arg(f1p)
        .assert()
        .success()
        .stdout("l\n\ti1e\n\ti2e\ne\n");

    let f2 = tmpdir.child("f2.bencode");
    f2.write_binary(b"d3:aaali123eee")
        .expect("Must be able to create temp file");
    let f2p = f2.to_str().expect("Temp file path was not valid unicode");

    cmd()
        .arg(f2p)
        .assert()
        .success()
        .stdout("d\n\t3:aaa\n\tl\n\t\ti123e\n\te\ne\n");

    cmd()
        .arg(f1p)
        .arg(f2p)
        .assert()
        .success()
        .stdout("l\n\ti1e\n\ti2e\ne\nd\n\t3:aaa\n\tl\n\t\ti123e\n\te\ne\n");
}

#[test]
fn string_literal_test() {
    cmd()
        .arg("--string-literal")
        .write_stdin(b"li1ee")
        .assert()
        .success()
        .stdout("let pretty_bencode = b\"\\\nl\\\n\ti1e\\\ne\\\n\"\n");
}

#[test]
fn metainfo_summary_test() {
    let expected = format!(
        "name: a.txt\nannounce: http://t/\ninfo-hash: {TORRENT_INFO_HASH}\n\
         piece length: 16\npieces: 1\ntotal length: 3\nprivate: false\n\
         files:\n\ta.txt (3 bytes)\n"
    );
    cmd()
        .arg("--metainfo")
        .write_stdin(TORRENT)
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn metainfo_json_test() {
    let output = cmd()
        .arg("--json")
        .write_stdin(TORRENT)
        .output()
        .expect("Must be able to run torrent-inspect");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output must be JSON");
    assert_eq!(summary["source"], "stdin");
    assert_eq!(summary["name"], "a.txt");
    assert_eq!(summary["info_hash"], TORRENT_INFO_HASH);
    assert_eq!(summary["piece_count"], 1);
    assert_eq!(summary["total_length"], 3);
    assert_eq!(summary["trackers"], serde_json::json!(["http://t/"]));
    assert_eq!(
        summary["files"],
        serde_json::json!([{ "path": "a.txt", "length": 3 }])
    );
    assert!(summary.get("comment").is_none());
}

#[test]
fn invalid_input_fails() {
    cmd().write_stdin(b"i1").assert().failure();
    cmd().arg("--metainfo").write_stdin(b"de").assert().failure();
    cmd()
        .arg("does/not/exist.torrent")
        .assert()
        .failure();
}

#[test]
fn trailing_data_policy() {
    cmd().write_stdin(b"i1eXX").assert().failure();
    cmd()
        .arg("--allow-trailing")
        .write_stdin(b"i1eXX")
        .assert()
        .success()
        .stdout("i1e\n");
}

#[test]
fn max_depth_flag() {
    cmd()
        .args(["--max-depth", "1"])
        .write_stdin(b"llee")
        .assert()
        .failure();
    cmd()
        .args(["--max-depth", "2"])
        .write_stdin(b"llee")
        .assert()
        .success();
}

#[test]
fn unbounded_max_depth_survives_deep_input() {
    let mut input = vec![b'l'; 200_000];
    input.extend(vec![b'e'; 200_000]);
    let assert = cmd()
        .args(["--max-depth", &usize::MAX.to_string(), "--metainfo"])
        .write_stdin(input)
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("is not a torrent file"), "{stderr}");
}
