//! Configuration Tests

use cq_domain::constants::DEFAULT_CACHE_TTL_SECS;
use cq_domain::error::Error;
use cq_infrastructure::config::loader::{to_toml, validate_app_config};
use cq_infrastructure::config::{
    AppConfig, CacheConfig, ConfigBuilder, ConfigLoader, LoggingConfig, RegistryConfig,
};
use cq_infrastructure::constants::{
    CACHE_DEFAULT_PROVIDER, CACHE_DISABLED_PROVIDER, DEFAULT_LOG_LEVEL,
};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_app_config_defaults() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert!(config.cache.enabled);
    assert_eq!(config.cache.provider, CACHE_DEFAULT_PROVIDER);
    assert_eq!(config.cache.default_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    assert!(config.registry.preload_on_activate);
    validate_app_config(&config).unwrap();
}

#[test]
fn test_disabled_cache_uses_null_provider() {
    let cache = CacheConfig {
        enabled: false,
        default_ttl_secs: 0,
        ..CacheConfig::default()
    };

    assert_eq!(cache.effective_provider(), CACHE_DISABLED_PROVIDER);
    assert_eq!(cache.provider_config().provider, CACHE_DISABLED_PROVIDER);
    ConfigBuilder::new().with_cache(cache).build().unwrap();
}

#[test]
fn test_entry_config_uses_ttl() {
    let cache = CacheConfig {
        default_ttl_secs: 42,
        ..CacheConfig::default()
    };
    assert_eq!(cache.entry_config().effective_ttl(), Duration::from_secs(42));
}

#[test]
fn test_validation_errors() {
    let zero_ttl = CacheConfig {
        default_ttl_secs: 0,
        ..CacheConfig::default()
    };
    assert!(matches!(
        ConfigBuilder::new().with_cache(zero_ttl).build(),
        Err(Error::Configuration { .. })
    ));

    let unknown = CacheConfig {
        provider: "memcached".to_string(),
        ..CacheConfig::default()
    };
    let err = ConfigBuilder::new().with_cache(unknown).build().unwrap_err();
    assert!(err.to_string().contains("memcached"));

    let redis_without_url = CacheConfig {
        provider: "redis".to_string(),
        ..CacheConfig::default()
    };
    assert!(ConfigBuilder::new()
        .with_cache(redis_without_url)
        .build()
        .is_err());

    let bad_level = LoggingConfig {
        level: "chatty".to_string(),
        ..LoggingConfig::default()
    };
    assert!(ConfigBuilder::new().with_logging(bad_level).build().is_err());
}

#[test]
fn test_builder_sections() {
    let config = ConfigBuilder::new()
        .with_registry(RegistryConfig {
            preload_on_activate: false,
        })
        .with_cache(CacheConfig {
            provider: "redis".to_string(),
            redis_url: Some("redis://127.0.0.1:6379".to_string()),
            ..CacheConfig::default()
        })
        .build()
        .unwrap();

    assert!(!config.registry.preload_on_activate);
    assert_eq!(
        config.cache.provider_config().uri.as_deref(),
        Some("redis://127.0.0.1:6379")
    );
}

#[test]
fn test_config_save_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("cq.toml");

    let original = ConfigBuilder::new()
        .with_cache(CacheConfig {
            default_ttl_secs: 90,
            max_entries: 500,
            ..CacheConfig::default()
        })
        .build()
        .unwrap();

    let loader = ConfigLoader::new();
    loader.save_to_file(&original, &config_path).unwrap();

    let loaded = ConfigLoader::new()
        .with_env_prefix("CQ_SAVE_LOAD_TEST")
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert_eq!(loaded, original);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("partial.toml");
    std::fs::write(&config_path, "[cache]\nprovider = \"null\"\n").unwrap();

    let loaded = ConfigLoader::new()
        .with_env_prefix("CQ_PARTIAL_TEST")
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert_eq!(loaded.cache.provider, "null");
    assert_eq!(loaded.cache.default_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    assert_eq!(loaded.logging.level, DEFAULT_LOG_LEVEL);
}

#[test]
fn test_invalid_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    std::fs::write(&config_path, "[cache]\ndefault_ttl_secs = 0\n").unwrap();

    let result = ConfigLoader::new()
        .with_env_prefix("CQ_INVALID_FILE_TEST")
        .with_config_path(&config_path)
        .load();

    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_missing_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::new()
        .with_config_path(temp_dir.path().join("absent.toml"))
        .load();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("env.toml");
    std::fs::write(&config_path, "[cache]\ndefault_ttl_secs = 90\n").unwrap();

    // Prefix is unique to this test
    unsafe {
        std::env::set_var("CQ_ENV_OVERRIDE_TEST__CACHE__DEFAULT_TTL_SECS", "15");
        std::env::set_var("CQ_ENV_OVERRIDE_TEST__LOGGING__LEVEL", "debug");
    }

    let loaded = ConfigLoader::new()
        .with_env_prefix("CQ_ENV_OVERRIDE_TEST")
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert_eq!(loaded.cache.default_ttl_secs, 15);
    assert_eq!(loaded.logging.level, "debug");
}

#[test]
fn test_to_toml_sections() {
    let rendered = to_toml(&AppConfig::default()).unwrap();

    assert!(rendered.contains("[logging]"));
    assert!(rendered.contains("[cache]"));
    assert!(rendered.contains("[registry]"));
    assert!(!rendered.contains("redis_url"));
}
