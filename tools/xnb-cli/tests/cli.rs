//! End-to-end runs of the `xnb` binary

use std::path::Path;
use std::process::{Command, Output};

use xnb_extract::{ContainerCodec, Fields, JsonContainer, Value};

fn xnb(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xnb"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run xnb")
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn tile() -> Value {
    Value::tagged(
        "Texture2D",
        Value::Map(Fields::from_iter([
            ("format", Value::Int(0)),
            ("width", Value::Int(2)),
            ("height", Value::Int(2)),
            ("data", Value::Bytes((0..16).collect())),
        ])),
    )
}

#[test]
fn test_unpack_then_pack() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Tile.xnbj");
    std::fs::write(&input, JsonContainer.encode(&tile()).unwrap()).unwrap();

    let out = xnb(&["unpack", arg(&input)]);
    assert!(out.status.success(), "unpack failed: {:?}", out);
    assert!(dir.path().join("Tile.json").is_file());
    assert!(dir.path().join("Tile.png").is_file());

    let text = dir.path().join("Tile.json");
    let repacked = dir.path().join("repacked/Tile.xnbj");
    let out = xnb(&["pack", arg(&text), arg(&repacked)]);
    assert!(out.status.success(), "pack failed: {:?}", out);

    let value = JsonContainer
        .decode(&std::fs::read(&repacked).unwrap())
        .unwrap();
    assert_eq!(value, tile());
}

#[test]
fn test_config_and_indent_flag() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Tile.xnbj");
    std::fs::write(&input, JsonContainer.encode(&tile()).unwrap()).unwrap();
    let config = dir.path().join("xnb.toml");
    std::fs::write(&config, "[convert]\nindent = 0\n").unwrap();

    let out = xnb(&["unpack", arg(&input), "--config", arg(&config)]);
    assert!(out.status.success(), "unpack failed: {:?}", out);
    let text = std::fs::read_to_string(dir.path().join("Tile.json")).unwrap();
    assert!(!text.contains('\n'));

    // Explicit flags win over the config file
    let out = xnb(&[
        "unpack",
        arg(&input),
        "--config",
        arg(&config),
        "--indent",
        "2",
    ]);
    assert!(out.status.success(), "unpack failed: {:?}", out);
    let text = std::fs::read_to_string(dir.path().join("Tile.json")).unwrap();
    assert!(text.starts_with("{\n  \"content\""));
}

#[test]
fn test_failures_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let content = dir.path().join("Content");
    std::fs::create_dir_all(&content).unwrap();
    std::fs::write(
        content.join("Good.xnbj"),
        JsonContainer.encode(&tile()).unwrap(),
    )
    .unwrap();
    std::fs::write(content.join("Bad.xnbj"), b"\xff\xfe").unwrap();

    let out = xnb(&["unpack", arg(&content)]);
    assert!(!out.status.success());
    assert!(content.join("Good.json").is_file());
    assert!(!content.join("Bad.json").exists());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("1 of 2 files failed"), "stderr: {stderr}");
}

#[test]
fn test_missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nothing.json");
    let out = xnb(&["pack", arg(&missing)]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Input not found"), "stderr: {stderr}");
}
