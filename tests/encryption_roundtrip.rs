use std::fs;

use filecrypt::{FileCryptError, NonceMode, Settings, logging::MemorySink};
use tempfile::tempdir;

#[test]
fn encrypt_decrypt_roundtrip_from_empty_state() {
    // 全新目录：加密会生成 key / nonce，解密能恢复原始内容。
    let temp_dir = tempdir().expect("create temp dir");
    let settings = Settings::in_dir(temp_dir.path());
    let input_path = temp_dir.path().join("hello");
    fs::write(&input_path, b"hello").expect("write plaintext");

    let encrypted_path = filecrypt::encrypt(&input_path, &settings).expect("encrypt file");
    assert_eq!(encrypted_path, temp_dir.path().join("hello.enc"));

    assert_eq!(fs::read(temp_dir.path().join("key")).unwrap().len(), 32);
    assert_eq!(fs::read(temp_dir.path().join("nonce")).unwrap().len(), 12);
    assert_eq!(fs::read(&encrypted_path).unwrap().len(), 5 + 16);

    fs::remove_file(&input_path).expect("remove plaintext");

    let decrypted_path = filecrypt::decrypt(&encrypted_path, &settings).expect("decrypt file");
    assert_eq!(decrypted_path, input_path);
    assert_eq!(fs::read(&decrypted_path).expect("read decrypted"), b"hello");
}

#[test]
fn decrypt_without_enc_suffix_writes_dec() {
    let temp_dir = tempdir().expect("create temp dir");
    let settings = Settings::in_dir(temp_dir.path());
    let input_path = temp_dir.path().join("b.txt");
    fs::write(&input_path, b"payload").expect("write plaintext");

    let encrypted_path = filecrypt::encrypt(&input_path, &settings).expect("encrypt file");
    let renamed = temp_dir.path().join("b.bin");
    fs::rename(&encrypted_path, &renamed).expect("rename ciphertext");

    let decrypted_path = filecrypt::decrypt(&renamed, &settings).expect("decrypt file");
    assert_eq!(decrypted_path, temp_dir.path().join("b.bin.dec"));
    assert_eq!(fs::read(&decrypted_path).unwrap(), b"payload");
}

#[test]
fn encrypt_decrypt_roundtrip_with_random_nonce() {
    // Random 模式：不创建 nonce 文件，密文带 12 字节前缀。
    let temp_dir = tempdir().expect("create temp dir");
    let settings = Settings::in_dir(temp_dir.path()).with_nonce_mode(NonceMode::Random);
    let input_path = temp_dir.path().join("hello");
    fs::write(&input_path, b"hello").expect("write plaintext");

    let encrypted_path = filecrypt::encrypt(&input_path, &settings).expect("encrypt file");
    let first = fs::read(&encrypted_path).unwrap();
    assert_eq!(first.len(), 12 + 5 + 16);
    assert!(!temp_dir.path().join("nonce").exists());

    filecrypt::encrypt(&input_path, &settings).expect("encrypt again");
    assert_ne!(fs::read(&encrypted_path).unwrap(), first);

    fs::remove_file(&input_path).expect("remove plaintext");
    filecrypt::decrypt(&encrypted_path, &settings).expect("decrypt file");
    assert_eq!(fs::read(&input_path).unwrap(), b"hello");
}

#[test]
fn decrypt_with_wrong_key_fails_and_writes_nothing() {
    // 换了 key 之后必须认证失败，且不写出明文文件。
    let temp_dir = tempdir().expect("create temp dir");
    let settings = Settings::in_dir(temp_dir.path());
    let input_path = temp_dir.path().join("secret.txt");
    fs::write(&input_path, b"filecrypt auth fail").expect("write plaintext");

    let encrypted_path = filecrypt::encrypt(&input_path, &settings).expect("encrypt file");
    fs::remove_file(&input_path).expect("remove plaintext");
    fs::write(temp_dir.path().join("key"), [0x55u8; 32]).expect("replace key");

    let result = filecrypt::decrypt(&encrypted_path, &settings);
    assert!(matches!(result, Err(FileCryptError::Authentication)));
    assert!(!input_path.exists());
}

#[test]
fn tampered_file_fails_authentication() {
    let temp_dir = tempdir().expect("create temp dir");
    let settings = Settings::in_dir(temp_dir.path());
    let input_path = temp_dir.path().join("doc.txt");
    fs::write(&input_path, b"do not touch").expect("write plaintext");

    let encrypted_path = filecrypt::encrypt(&input_path, &settings).expect("encrypt file");
    let mut bytes = fs::read(&encrypted_path).unwrap();
    bytes[3] ^= 0x01;
    fs::write(&encrypted_path, &bytes).unwrap();

    assert!(matches!(
        filecrypt::decrypt(&encrypted_path, &settings),
        Err(FileCryptError::Authentication)
    ));
}

#[test]
fn wrong_key_length_fails_before_any_output() {
    let temp_dir = tempdir().expect("create temp dir");
    let settings = Settings::in_dir(temp_dir.path());
    let input_path = temp_dir.path().join("hello");
    fs::write(&input_path, b"hello").expect("write plaintext");
    fs::write(temp_dir.path().join("key"), [1u8; 16]).expect("write short key");

    let result = filecrypt::encrypt(&input_path, &settings);
    assert!(matches!(
        result,
        Err(FileCryptError::MaterialLength { name: "key", actual: 16, .. })
    ));
    assert!(!temp_dir.path().join("hello.enc").exists());
    assert!(!temp_dir.path().join("nonce").exists());
}

#[test]
fn missing_input_is_reported() {
    let temp_dir = tempdir().expect("create temp dir");
    let settings = Settings::in_dir(temp_dir.path());
    let missing = temp_dir.path().join("missing.txt");

    assert!(matches!(
        filecrypt::encrypt(&missing, &settings),
        Err(FileCryptError::InputNotFound(p)) if p == missing
    ));
}

#[test]
fn operations_emit_structured_logs() {
    // 日志记录是单行 JSON，包含字节数。
    let temp_dir = tempdir().expect("create temp dir");
    let settings = Settings::in_dir(temp_dir.path());
    let input_path = temp_dir.path().join("hello");
    fs::write(&input_path, b"hello").expect("write plaintext");

    let sink = MemorySink::new();
    let dispatch = filecrypt::logging::dispatch("info", sink.clone()).expect("build dispatch");

    tracing::dispatcher::with_default(&dispatch, || {
        filecrypt::encrypt(&input_path, &settings).expect("encrypt file");
    });

    let records: Vec<serde_json::Value> = sink
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .collect();

    let messages: Vec<&str> = records
        .iter()
        .filter_map(|r| r["message"].as_str())
        .collect();
    assert!(messages.contains(&"key saved"));
    assert!(messages.contains(&"nonce saved"));
    assert!(messages.contains(&"encrypted"));

    let encrypted = records
        .iter()
        .find(|r| r["message"] == "encrypted")
        .expect("encrypted record");
    assert_eq!(encrypted["level"], "INFO");
    assert_eq!(encrypted["plaintext_bytes"], 5);
    assert_eq!(encrypted["ciphertext_bytes"], 21);
}
