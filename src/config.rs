//! Configuration management for the trip planner.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is read with `dotenvy`, which does not write to stdout (stdout is
//! reserved for MCP traffic).

use crate::cache::CacheConfig;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::time::Duration;

/// Configuration for the trip planner.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ollama base URL (default: "http://localhost:11434")
    pub ollama_base_url: String,

    /// Model name passed to Ollama (default: "llama3.2")
    pub ollama_model: String,

    /// Sampling temperature (0.0-2.0, default: 0.5)
    pub llm_temperature: f32,

    /// Model request timeout in seconds (default: 120)
    pub llm_timeout: u64,

    /// Search API base URL (default: "https://api.duckduckgo.com")
    pub search_api_url: String,

    /// Search request timeout in seconds (default: 3)
    pub search_timeout: u64,

    /// Results requested per search (default: 2)
    pub max_search_results: usize,

    /// Search result TTL in seconds, 0 disables expiry (default: 3600)
    pub search_cache_ttl_secs: u64,

    /// Maximum cached searches (default: 256)
    pub search_cache_capacity: usize,

    /// Trip plan TTL in seconds, 0 disables expiry (default: 3600)
    pub plan_cache_ttl_secs: u64,

    /// Maximum cached trip plans (default: 10)
    pub plan_cache_capacity: usize,

    /// Run the critique stage after drafting (default: false)
    pub enable_critique: bool,

    /// Run the refinement stage after critique (default: false)
    pub enable_refinement: bool,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional:
    /// - `OLLAMA_BASE_URL`, `OLLAMA_MODEL`, `LLM_TEMPERATURE`, `LLM_TIMEOUT`
    /// - `SEARCH_API_URL`, `SEARCH_TIMEOUT`, `MAX_SEARCH_RESULTS`
    /// - `SEARCH_CACHE_TTL_SECS`, `SEARCH_CACHE_CAPACITY`
    /// - `PLAN_CACHE_TTL_SECS`, `PLAN_CACHE_CAPACITY`
    /// - `ENABLE_CRITIQUE`, `ENABLE_REFINEMENT`
    /// - `LOG_LEVEL`
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let ollama_base_url =
            env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| defaults.ollama_base_url.clone());
        Self::validate_url("OLLAMA_BASE_URL", &ollama_base_url)?;

        let ollama_model =
            env::var("OLLAMA_MODEL").unwrap_or_else(|_| defaults.ollama_model.clone());
        if ollama_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "OLLAMA_MODEL".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let llm_temperature = Self::parse_env_f32("LLM_TEMPERATURE", defaults.llm_temperature)?;
        if !(0.0..=2.0).contains(&llm_temperature) {
            return Err(ConfigError::InvalidValue {
                var: "LLM_TEMPERATURE".to_string(),
                reason: "Must be between 0.0 and 2.0".to_string(),
            });
        }

        let search_api_url =
            env::var("SEARCH_API_URL").unwrap_or_else(|_| defaults.search_api_url.clone());
        Self::validate_url("SEARCH_API_URL", &search_api_url)?;

        let llm_timeout = Self::parse_env_u64("LLM_TIMEOUT", defaults.llm_timeout)?;
        let search_timeout = Self::parse_env_u64("SEARCH_TIMEOUT", defaults.search_timeout)?;
        let max_search_results =
            Self::parse_env_nonzero("MAX_SEARCH_RESULTS", defaults.max_search_results)?;
        let search_cache_ttl_secs =
            Self::parse_env_u64("SEARCH_CACHE_TTL_SECS", defaults.search_cache_ttl_secs)?;
        let search_cache_capacity =
            Self::parse_env_nonzero("SEARCH_CACHE_CAPACITY", defaults.search_cache_capacity)?;
        let plan_cache_ttl_secs =
            Self::parse_env_u64("PLAN_CACHE_TTL_SECS", defaults.plan_cache_ttl_secs)?;
        let plan_cache_capacity =
            Self::parse_env_nonzero("PLAN_CACHE_CAPACITY", defaults.plan_cache_capacity)?;
        let enable_critique = Self::parse_env_bool("ENABLE_CRITIQUE", defaults.enable_critique)?;
        let enable_refinement =
            Self::parse_env_bool("ENABLE_REFINEMENT", defaults.enable_refinement)?;

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            ollama_base_url,
            ollama_model,
            llm_temperature,
            llm_timeout,
            search_api_url,
            search_timeout,
            max_search_results,
            search_cache_ttl_secs,
            search_cache_capacity,
            plan_cache_ttl_secs,
            plan_cache_capacity,
            enable_critique,
            enable_refinement,
            log_level,
        })
    }

    /// OpenAI-compatible chat completions endpoint exposed by Ollama.
    ///
    /// Accepts base URLs with or without a trailing `/` or `/v1`.
    pub fn chat_completions_url(&self) -> String {
        let base = self.ollama_base_url.trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base);
        format!("{}/v1/chat/completions", base)
    }

    /// Limits for the search result caches.
    pub fn search_cache(&self) -> CacheConfig {
        CacheConfig::from_secs(self.search_cache_capacity, self.search_cache_ttl_secs)
    }

    /// Limits for the trip plan cache.
    pub fn plan_cache(&self) -> CacheConfig {
        CacheConfig::from_secs(self.plan_cache_capacity, self.plan_cache_ttl_secs)
    }

    /// Time budget for one search call.
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout)
    }

    fn validate_url(var_name: &str, url: &str) -> ConfigResult<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }
        Ok(())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as a usize of at least 1.
    fn parse_env_nonzero(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => match val.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be a number of at least 1, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as f32 with a default value.
    fn parse_env_f32(var_name: &str, default: f32) -> ConfigResult<f32> {
        match env::var(var_name) {
            Ok(val) => val.parse::<f32>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a decimal number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as a boolean flag.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            llm_temperature: 0.5,
            llm_timeout: 120,
            search_api_url: "https://api.duckduckgo.com".to_string(),
            search_timeout: 3,
            max_search_results: 2,
            search_cache_ttl_secs: 3600,
            search_cache_capacity: 256,
            plan_cache_ttl_secs: 3600,
            plan_cache_capacity: 10,
            enable_critique: false,
            enable_refinement: false,
            log_level: "error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const ALL_VARS: &[&str] = &[
        "OLLAMA_BASE_URL",
        "OLLAMA_MODEL",
        "LLM_TEMPERATURE",
        "LLM_TIMEOUT",
        "SEARCH_API_URL",
        "SEARCH_TIMEOUT",
        "MAX_SEARCH_RESULTS",
        "SEARCH_CACHE_TTL_SECS",
        "SEARCH_CACHE_CAPACITY",
        "PLAN_CACHE_TTL_SECS",
        "PLAN_CACHE_CAPACITY",
        "ENABLE_CRITIQUE",
        "ENABLE_REFINEMENT",
        "LOG_LEVEL",
    ];

    // Helper to set and unset env vars for testing
    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            // A developer's .env must not leak into these tests.
            let _ = dotenvy::dotenv();
            for var in ALL_VARS {
                env::remove_var(var);
            }
            EnvGuard { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.vars.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ollama_model, "llama3.2");
        assert_eq!(config.max_search_results, 2);
        assert_eq!(config.plan_cache_capacity, 10);
        assert_eq!(config.search_cache_ttl_secs, 3600);
        assert!(!config.enable_critique);
        assert!(!config.enable_refinement);
    }

    #[test]
    fn test_chat_completions_url() {
        let mut config = Config::default();
        assert_eq!(
            config.chat_completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );

        config.ollama_base_url = "http://gpu-box:11434/v1/".to_string();
        assert_eq!(
            config.chat_completions_url(),
            "http://gpu-box:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_cache_configs() {
        let mut config = Config::default();
        let plan = config.plan_cache();
        assert_eq!(plan.capacity, Some(10));
        assert_eq!(plan.ttl, Some(Duration::from_secs(3600)));

        config.search_cache_ttl_secs = 0;
        assert_eq!(config.search_cache().ttl, None);
    }

    #[test]
    #[serial]
    fn test_config_from_env_uses_defaults() {
        let _guard = EnvGuard::new();

        let config = Config::from_env().unwrap();
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.plan_cache_capacity, 10);
    }

    #[test]
    #[serial]
    fn test_config_from_env_invalid_url() {
        let mut guard = EnvGuard::new();
        guard.set("OLLAMA_BASE_URL", "localhost:11434");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "OLLAMA_BASE_URL"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_valid() {
        let mut guard = EnvGuard::new();
        guard.set("OLLAMA_MODEL", "mistral");
        guard.set("PLAN_CACHE_CAPACITY", "2");
        guard.set("SEARCH_CACHE_TTL_SECS", "60");
        guard.set("ENABLE_CRITIQUE", "true");
        guard.set("ENABLE_REFINEMENT", "1");

        let config = Config::from_env().unwrap();
        assert_eq!(config.ollama_model, "mistral");
        assert_eq!(config.plan_cache_capacity, 2);
        assert_eq!(config.search_cache_ttl_secs, 60);
        assert!(config.enable_critique);
        assert!(config.enable_refinement);
    }

    #[test]
    #[serial]
    fn test_config_zero_capacity_rejected() {
        let mut guard = EnvGuard::new();
        guard.set("PLAN_CACHE_CAPACITY", "0");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "PLAN_CACHE_CAPACITY"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_temperature() {
        let mut guard = EnvGuard::new();
        guard.set("LLM_TEMPERATURE", "3.5");

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_parse_env_bool_invalid() {
        let mut guard = EnvGuard::new();
        guard.set("ENABLE_CRITIQUE", "maybe");

        let result = Config::parse_env_bool("ENABLE_CRITIQUE", false);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_parse_env_u64() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_U64", "42");

        assert_eq!(Config::parse_env_u64("TEST_U64", 10).unwrap(), 42);
        assert_eq!(Config::parse_env_u64("NONEXISTENT", 10).unwrap(), 10);
    }
}
