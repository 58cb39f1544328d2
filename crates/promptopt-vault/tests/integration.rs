//! Integration tests for the promptopt-vault crate.
//!
//! These tests exercise the full vault lifecycle against real files in
//! temporary directories: save, load, overwrite, and the fail-closed
//! behavior for missing and corrupted config files.

use promptopt_vault::{CredentialVault, VaultError};

fn vault_in(dir: &tempfile::TempDir) -> CredentialVault {
    CredentialVault::new(dir.path().join("config.json"))
}

// ═══════════════════════════════════════════════════════════════════════
//  Save / load lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn save_then_load_returns_plaintext() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    vault.save("ABC123").unwrap();
    assert_eq!(vault.load(), "ABC123");
}

#[test]
fn load_survives_process_boundary() {
    // A second vault instance over the same file must decrypt what the
    // first one wrote — the key is re-derived, never stored.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    CredentialVault::new(&path).save("AIzaSyTest").unwrap();
    assert_eq!(CredentialVault::new(&path).load(), "AIzaSyTest");
}

#[test]
fn save_overwrites_previous_credential() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    vault.save("old-key").unwrap();
    vault.save("new-key").unwrap();
    assert_eq!(vault.load(), "new-key");
}

#[test]
fn roundtrip_preserves_unusual_plaintexts() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    for plaintext in [
        "with spaces and\ttabs",
        "ключ-доступа-🔑",
        "quotes\"and\\backslashes",
    ] {
        vault.save(plaintext).unwrap();
        assert_eq!(vault.load(), plaintext);
    }
}

#[test]
fn empty_save_is_rejected_and_leaves_store_intact() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    vault.save("keep-me").unwrap();
    assert!(matches!(vault.save(" "), Err(VaultError::EmptyCredential)));
    assert_eq!(vault.load(), "keep-me");
}

// ═══════════════════════════════════════════════════════════════════════
//  Fail-closed loads
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn load_with_no_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(vault_in(&dir).load(), "");
}

#[test]
fn load_after_deleting_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    vault.save("ABC123").unwrap();
    std::fs::remove_file(vault.config_path()).unwrap();
    assert_eq!(vault.load(), "");
}

#[test]
fn load_with_malformed_json_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    std::fs::write(vault.config_path(), "{not json").unwrap();
    assert_eq!(vault.load(), "");
}

#[test]
fn load_with_missing_or_empty_token_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    std::fs::write(vault.config_path(), "{}").unwrap();
    assert_eq!(vault.load(), "");

    std::fs::write(vault.config_path(), r#"{"api_key": ""}"#).unwrap();
    assert_eq!(vault.load(), "");
}

#[test]
fn load_with_tampered_token_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    vault.save("ABC123").unwrap();

    // Corrupt the stored token while keeping the JSON valid.
    let raw = std::fs::read_to_string(vault.config_path()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let token = value["api_key"].as_str().unwrap();
    let mangled: String = token.chars().rev().collect();
    value["api_key"] = serde_json::Value::String(mangled);
    std::fs::write(vault.config_path(), value.to_string()).unwrap();

    assert_eq!(vault.load(), "");
}

#[test]
fn load_with_plaintext_masquerading_as_token_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_in(&dir);

    // Someone hand-edits their key into the file unencrypted.
    std::fs::write(vault.config_path(), r#"{"api_key": "AIzaSyRawKey"}"#).unwrap();
    assert_eq!(vault.load(), "");
}
