//! Env loading tests for EnvEmbeddingConfig.

use std::env;
use std::time::Duration;

use serial_test::serial;

use crate::{EmbeddingConfig, EnvEmbeddingConfig, DEFAULT_EMBEDDING_MODEL};

const VARS: &[&str] = &[
    "EMBEDDING_PROVIDER",
    "EMBEDDING_API_KEY",
    "OPENAI_API_KEY",
    "EMBEDDING_BASE_URL",
    "OPENAI_BASE_URL",
    "EMBEDDING_MODEL",
    "EMBEDDING_TIMEOUT_SECS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();
    let config = EnvEmbeddingConfig::from_env().unwrap();
    assert_eq!(config.provider(), "openai");
    assert!(config.api_key().is_empty());
    assert!(config.base_url().is_none());
    assert_eq!(config.model(), DEFAULT_EMBEDDING_MODEL);
    assert_eq!(config.timeout(), Duration::from_secs(30));
    assert!(config.is_enabled());
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn test_openai_key_fallback_and_overrides() {
    clear_env();
    env::set_var("OPENAI_API_KEY", "sk-shared");
    env::set_var("OPENAI_BASE_URL", "http://localhost:8080/v1");
    env::set_var("EMBEDDING_MODEL", "text-embedding-3-large");
    env::set_var("EMBEDDING_TIMEOUT_SECS", "5");

    let config = EnvEmbeddingConfig::from_env().unwrap();
    assert_eq!(config.api_key(), "sk-shared");
    assert_eq!(config.base_url(), Some("http://localhost:8080/v1"));
    assert_eq!(config.model(), "text-embedding-3-large");
    assert_eq!(config.timeout(), Duration::from_secs(5));
    assert!(config.validate().is_ok());

    env::set_var("EMBEDDING_API_KEY", "sk-embed");
    let config = EnvEmbeddingConfig::from_env().unwrap();
    assert_eq!(config.api_key(), "sk-embed");
    clear_env();
}

#[test]
#[serial]
fn test_provider_none_disables_and_unknown_fails() {
    clear_env();
    env::set_var("EMBEDDING_PROVIDER", "none");
    let config = EnvEmbeddingConfig::from_env().unwrap();
    assert!(!config.is_enabled());
    assert!(config.validate().is_ok());

    env::set_var("EMBEDDING_PROVIDER", "cohere");
    let config = EnvEmbeddingConfig::from_env().unwrap();
    assert!(config.validate().is_err());
    clear_env();
}
