//! Configuration loading and validation tests

use std::path::PathBuf;

use serial_test::serial;
use smartplanner::config::{Config, LlmConfig};
use tempfile::TempDir;

const KEY_VAR: &str = "SMARTPLANNER_TEST_API_KEY";
const URL_VAR: &str = "SMARTPLANNER_TEST_API_URL";

fn set_env(name: &str, value: &str) {
    // SAFETY: tests touching the environment are #[serial]
    unsafe { std::env::set_var(name, value) }
}

fn remove_env(name: &str) {
    // SAFETY: tests touching the environment are #[serial]
    unsafe { std::env::remove_var(name) }
}

fn llm_with_test_vars() -> LlmConfig {
    LlmConfig {
        api_key_env: KEY_VAR.to_string(),
        base_url_env: Some(URL_VAR.to_string()),
        ..LlmConfig::default()
    }
}

#[test]
fn test_load_explicit_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("custom.yml");
    std::fs::write(
        &path,
        "llm:\n  model: gemini-1.5-pro\n  timeout-ms: 5000\nserver:\n  bind: 127.0.0.1:8123\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.llm.model, "gemini-1.5-pro");
    assert_eq!(config.llm.timeout_ms, 5000);
    assert_eq!(config.llm.provider, "gemini");
    assert_eq!(config.server.bind, "127.0.0.1:8123");
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let path = PathBuf::from("/nonexistent/smartplanner.yml");
    let err = Config::load(Some(&path)).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/smartplanner.yml"));
}

#[test]
fn test_load_invalid_yaml_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yml");
    std::fs::write(&path, "llm: [unclosed").unwrap();
    assert!(Config::load(Some(&path)).is_err());
}

#[test]
#[serial]
fn test_validate_requires_api_key() {
    remove_env(KEY_VAR);
    let config = Config {
        llm: llm_with_test_vars(),
        ..Config::default()
    };

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains(KEY_VAR));
}

#[test]
#[serial]
fn test_validate_rejects_empty_api_key() {
    set_env(KEY_VAR, "  ");
    let config = Config {
        llm: llm_with_test_vars(),
        ..Config::default()
    };

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("empty"));
    remove_env(KEY_VAR);
}

#[test]
#[serial]
fn test_validate_accepts_api_key() {
    set_env(KEY_VAR, "abc123");
    let config = Config {
        llm: llm_with_test_vars(),
        ..Config::default()
    };

    assert!(config.validate().is_ok());
    assert_eq!(config.llm.api_key().unwrap(), "abc123");
    remove_env(KEY_VAR);
}

#[test]
#[serial]
fn test_base_url_env_overrides_config() {
    let llm = LlmConfig {
        base_url: Some("https://configured.example.com".to_string()),
        ..llm_with_test_vars()
    };

    remove_env(URL_VAR);
    assert_eq!(llm.resolved_base_url(), "https://configured.example.com");

    set_env(URL_VAR, "http://127.0.0.1:9999/");
    assert_eq!(llm.resolved_base_url(), "http://127.0.0.1:9999");
    remove_env(URL_VAR);
}
