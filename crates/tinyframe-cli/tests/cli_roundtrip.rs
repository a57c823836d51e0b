use std::process::{Command, Output};

fn tf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tf"))
        .args(args)
        .output()
        .expect("tf should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let text = String::from_utf8(output.stdout.clone()).expect("stdout should be UTF-8");
    serde_json::from_str(text.trim()).expect("stdout should be one JSON object")
}

#[test]
fn encode_emits_the_documented_wire_bytes() {
    let output = tf(&[
        "encode", "--type", "0x22", "--format", "json",
    ]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["frame_id"], 0x80);
    assert_eq!(json["frame_type"], 0x22);
    assert_eq!(json["payload_size"], 0);
    // SOF, ID, LEN, TYPE prefix of the default master configuration.
    let wire = json["wire"].as_str().expect("wire should be a hex string");
    assert!(wire.starts_with("0180000022"));
}

#[test]
fn encode_then_decode_roundtrips() {
    let encoded = tf(&[
        "encode", "--type", "0x33", "--data", "hello", "--format", "json",
    ]);
    assert!(encoded.status.success());
    let wire = stdout_json(&encoded)["wire"]
        .as_str()
        .expect("wire should be present")
        .to_string();

    let decoded = tf(&["decode", "--format", "json", &wire]);
    assert!(decoded.status.success());

    let json = stdout_json(&decoded);
    assert_eq!(json["frame_type"], 0x33);
    assert_eq!(json["payload"], "hello");
    assert_eq!(json["payload_size"], 5);
}

#[test]
fn decode_rejects_a_corrupted_frame() {
    let encoded = tf(&[
        "encode", "--type", "0x33", "--data", "abc", "--format", "json",
    ]);
    let mut wire = stdout_json(&encoded)["wire"]
        .as_str()
        .expect("wire should be present")
        .to_string();

    // Flip a payload nibble.
    let flipped = if wire.ends_with('0') { '1' } else { '0' };
    wire.replace_range(wire.len() - 1.., &flipped.to_string());

    let decoded = tf(&["decode", "--format", "json", &wire]);
    assert!(!decoded.status.success());
    assert_eq!(decoded.status.code(), Some(60));
}

#[test]
fn decode_honors_wire_overrides() {
    let encoded = tf(&[
        "encode", "--type", "7", "--data", "x", "--cksum", "xor8", "--no-sof",
        "--id-bytes", "2", "--format", "json",
    ]);
    assert!(encoded.status.success());
    let wire = stdout_json(&encoded)["wire"]
        .as_str()
        .expect("wire should be present")
        .to_string();

    // Decoding with the same overrides works...
    let decoded = tf(&[
        "decode", "--cksum", "xor8", "--no-sof", "--id-bytes", "2", "--format", "json", &wire,
    ]);
    assert!(decoded.status.success());
    assert_eq!(stdout_json(&decoded)["frame_type"], 7);

    // ...and with the default configuration it fails.
    let mismatched = tf(&["decode", "--format", "json", &wire]);
    assert!(!mismatched.status.success());
}

#[test]
fn response_frames_keep_the_given_id() {
    let output = tf(&[
        "encode", "--type", "1", "--response", "--id", "0x05", "--format", "json",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["frame_id"], 5);
}

#[test]
fn rejects_invalid_wire_configuration() {
    let output = tf(&["encode", "--type", "1", "--id-bytes", "3"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_the_package_version() {
    let output = tf(&["version"]);
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}
