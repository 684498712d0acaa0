//! Rewrite backend configuration loaded from environment variables.

use std::time::Duration;

use telegram_bot::{env_first_non_empty, env_non_empty, env_parse};

use crate::retry::RetryPolicy;

/// Default model requested from the backend.
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo-16k";

/// Default endpoint order. The repeated first entry is a second chance after a routing hiccup.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://openrouter.ai/api/v1/chat/completions",
    "https://openrouter.co/v1/chat/completions",
    "https://openrouter.ai/api/v1/chat/completions",
];

/// Rewrite client settings. Sampling parameters are fixed per process, not per call.
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    /// REWRITE_API_KEY or OPENROUTER_API_KEY. Absent means every rewrite fails fast.
    pub api_key: Option<String>,
    /// APP_REFERRER_URL or APP_URL, sent as `HTTP-Referer`.
    pub referrer_url: Option<String>,
    /// APP_TITLE, sent as `X-Title`.
    pub app_title: String,
    pub model: String,
    /// REWRITE_ENDPOINTS, comma separated; duplicates are kept.
    pub endpoints: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub seed: i64,
    pub max_attempts: u32,
    pub backoff_secs: f64,
    pub max_backoff_secs: f64,
    pub timeout_secs: u64,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            referrer_url: None,
            app_title: "NewsBot".to_string(),
            model: DEFAULT_MODEL.to_string(),
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            temperature: 0.3,
            max_tokens: 400,
            seed: 7,
            max_attempts: 4,
            backoff_secs: 2.0,
            max_backoff_secs: 30.0,
            timeout_secs: 60,
        }
    }
}

impl RewriteConfig {
    /// Load from environment variables; unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let endpoints = env_non_empty("REWRITE_ENDPOINTS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.endpoints);

        Self {
            api_key: env_first_non_empty(&["REWRITE_API_KEY", "OPENROUTER_API_KEY"]),
            referrer_url: env_first_non_empty(&["APP_REFERRER_URL", "APP_URL"]),
            app_title: env_non_empty("APP_TITLE").unwrap_or(defaults.app_title),
            model: env_non_empty("REWRITE_MODEL").unwrap_or(defaults.model),
            endpoints,
            temperature: env_parse("REWRITE_TEMPERATURE", defaults.temperature),
            max_tokens: env_parse("REWRITE_MAX_TOKENS", defaults.max_tokens),
            seed: env_parse("REWRITE_SEED", defaults.seed),
            max_attempts: env_parse("REWRITE_MAX_ATTEMPTS", defaults.max_attempts),
            backoff_secs: env_parse("REWRITE_BACKOFF_SECS", defaults.backoff_secs),
            max_backoff_secs: env_parse("REWRITE_MAX_BACKOFF_SECS", defaults.max_backoff_secs),
            timeout_secs: env_parse("REWRITE_TIMEOUT_SECS", defaults.timeout_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let secs = |v: f64| Duration::from_secs_f64(if v.is_finite() { v.clamp(0.0, 3600.0) } else { 0.0 });
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            initial_backoff: secs(self.backoff_secs),
            max_backoff: secs(self.max_backoff_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: &[&str] = &[
        "REWRITE_API_KEY",
        "OPENROUTER_API_KEY",
        "APP_REFERRER_URL",
        "APP_URL",
        "APP_TITLE",
        "REWRITE_MODEL",
        "REWRITE_ENDPOINTS",
        "REWRITE_TEMPERATURE",
        "REWRITE_MAX_TOKENS",
        "REWRITE_SEED",
        "REWRITE_MAX_ATTEMPTS",
        "REWRITE_BACKOFF_SECS",
        "REWRITE_MAX_BACKOFF_SECS",
        "REWRITE_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = RewriteConfig::from_env();

        assert!(config.api_key.is_none());
        assert!(config.referrer_url.is_none());
        assert_eq!(config.app_title, "NewsBot");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoints.len(), 3);
        assert_eq!(config.endpoints[0], config.endpoints[2]);
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.max_tokens, 400);
        assert_eq!(config.seed, 7);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    #[serial]
    fn test_overrides_and_aliases() {
        clear_env();
        env::set_var("OPENROUTER_API_KEY", "legacy-key");
        env::set_var("APP_URL", "https://example.org");
        env::set_var("REWRITE_ENDPOINTS", "https://a.test/v1, ,https://b.test/v1");
        env::set_var("REWRITE_SEED", "42");
        env::set_var("REWRITE_MAX_ATTEMPTS", "not-a-number");

        let config = RewriteConfig::from_env();

        assert_eq!(config.api_key.as_deref(), Some("legacy-key"));
        assert_eq!(config.referrer_url.as_deref(), Some("https://example.org"));
        assert_eq!(config.endpoints, vec!["https://a.test/v1", "https://b.test/v1"]);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_attempts, 4);

        env::set_var("REWRITE_API_KEY", "primary-key");
        assert_eq!(RewriteConfig::from_env().api_key.as_deref(), Some("primary-key"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_key_counts_as_missing() {
        clear_env();
        env::set_var("REWRITE_API_KEY", "   ");
        assert!(RewriteConfig::from_env().api_key.is_none());
        clear_env();
    }
}
