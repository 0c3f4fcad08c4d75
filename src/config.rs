//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Credential Store
//!
//! API keys can be managed at runtime in Redis (see the `admin keys` command).
//! Redis is configured either with a full URL:
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! ```
//!
//! or with individual components:
//!
//! ```bash
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! Without either, keys come from the environment only.
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - Rate limit by `X-Forwarded-For` (default: `false`)
//! - `STRIPE_SECRET_KEY` - Stripe key; may instead live in the credential store
//! - `STRIPE_API_BASE` - Stripe REST endpoint (default: `https://api.stripe.com`)
//! - `CHECKOUT_SUCCESS_URL` - Post-payment redirect (default: `https://goodiex.vercel.app/payment-success`)
//! - `CHECKOUT_CANCEL_URL` - Cancelled-payment redirect (default: `https://api.theholylabs.com/error`)
//! - `OPENAI_API_KEY` - OpenAI key; may instead live in the credential store
//! - `OPENAI_API_BASE` - Chat completions endpoint (default: `https://api.openai.com/v1`)
//! - `OPENAI_MODEL` - Vision model (default: `gpt-4o`)
//! - `OPENAI_MAX_TOKENS` - Completion token limit (default: 1500)
//! - `CNAME_BASE_DOMAIN` - Parent domain of store CNAMEs (default: `goodiex.com`)

use crate::infrastructure::payments::DEFAULT_STRIPE_API_BASE;
use crate::infrastructure::vision::{DEFAULT_OPENAI_API_BASE, DEFAULT_OPENAI_MODEL};
use crate::utils::domain_name::is_valid_domain;
use crate::utils::secrets::{mask_connection_string, mask_secret};
use anyhow::{Context, Result};
use std::env;
use url::Url;

pub const DEFAULT_CHECKOUT_SUCCESS_URL: &str = "https://goodiex.vercel.app/payment-success";
pub const DEFAULT_CHECKOUT_CANCEL_URL: &str = "https://api.theholylabs.com/error";
pub const DEFAULT_CNAME_BASE_DOMAIN: &str = "goodiex.com";
pub const DEFAULT_OPENAI_MAX_TOKENS: u32 = 1500;

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    pub redis_url: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,

    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    /// Receives `order`, `email`, `total`, `name` and `currency` as query parameters.
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,

    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,

    pub cname_base_domain: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not a number.
    pub fn from_env() -> Result<Self> {
        let redis_url = Self::load_redis_url();

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let openai_max_tokens = match env::var("OPENAI_MAX_TOKENS") {
            Ok(v) => v
                .trim()
                .parse()
                .with_context(|| format!("OPENAI_MAX_TOKENS must be a number, got '{v}'"))?,
            Err(_) => DEFAULT_OPENAI_MAX_TOKENS,
        };

        Ok(Self {
            redis_url,
            listen_addr,
            log_level,
            log_format,
            behind_proxy,
            stripe_secret_key: secret_var("STRIPE_SECRET_KEY"),
            stripe_api_base: var_or("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
            checkout_success_url: var_or("CHECKOUT_SUCCESS_URL", DEFAULT_CHECKOUT_SUCCESS_URL),
            checkout_cancel_url: var_or("CHECKOUT_CANCEL_URL", DEFAULT_CHECKOUT_CANCEL_URL),
            openai_api_key: secret_var("OPENAI_API_KEY"),
            openai_api_base: var_or("OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE),
            openai_model: var_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            openai_max_tokens,
            cname_base_domain: var_or("CNAME_BASE_DOMAIN", DEFAULT_CNAME_BASE_DOMAIN),
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - a redirect URL or API base is not an absolute http(s) URL
    /// - `openai_max_tokens` is outside 1..=16384
    /// - `cname_base_domain` is not a valid domain
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        for (name, value) in [
            ("STRIPE_API_BASE", &self.stripe_api_base),
            ("CHECKOUT_SUCCESS_URL", &self.checkout_success_url),
            ("CHECKOUT_CANCEL_URL", &self.checkout_cancel_url),
            ("OPENAI_API_BASE", &self.openai_api_base),
        ] {
            validate_http_url(name, value)?;
        }

        if self.openai_max_tokens == 0 || self.openai_max_tokens > 16_384 {
            anyhow::bail!(
                "OPENAI_MAX_TOKENS must be between 1 and 16384, got {}",
                self.openai_max_tokens
            );
        }

        if self.openai_model.trim().is_empty() {
            anyhow::bail!("OPENAI_MODEL must not be empty");
        }

        if !is_valid_domain(&self.cname_base_domain) {
            anyhow::bail!(
                "CNAME_BASE_DOMAIN must be a valid domain, got '{}'",
                self.cname_base_domain
            );
        }

        Ok(())
    }

    /// Returns whether the Redis credential store is enabled.
    pub fn is_credential_store_enabled(&self) -> bool {
        self.redis_url.is_some()
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!(
                "  Credential store: {} (Redis)",
                mask_connection_string(redis_url)
            );
        } else {
            tracing::info!("  Credential store: disabled");
        }

        tracing::info!("  Stripe key: {}", describe_secret(&self.stripe_secret_key));
        tracing::info!("  Stripe API: {}", self.stripe_api_base);
        tracing::info!("  OpenAI key: {}", describe_secret(&self.openai_api_key));
        tracing::info!(
            "  OpenAI model: {} (max tokens {})",
            self.openai_model,
            self.openai_max_tokens
        );
        tracing::info!("  CNAME base domain: {}", self.cname_base_domain);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("redis_url", &self.redis_url.as_deref().map(mask_connection_string))
            .field("listen_addr", &self.listen_addr)
            .field("log_format", &self.log_format)
            .field("behind_proxy", &self.behind_proxy)
            .field("stripe_secret_key", &describe_secret(&self.stripe_secret_key))
            .field("openai_api_key", &describe_secret(&self.openai_api_key))
            .field("openai_model", &self.openai_model)
            .field("cname_base_domain", &self.cname_base_domain)
            .finish_non_exhaustive()
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn secret_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn describe_secret(secret: &Option<String>) -> String {
    match secret {
        Some(value) => mask_secret(value),
        None => "not set".to_string(),
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("{name} must be a valid URL, got '{value}'"))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("{name} must use http or https, got '{value}'");
    }

    Ok(())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 12] = [
        "STRIPE_SECRET_KEY",
        "STRIPE_API_BASE",
        "CHECKOUT_SUCCESS_URL",
        "CHECKOUT_CANCEL_URL",
        "OPENAI_API_KEY",
        "OPENAI_API_BASE",
        "OPENAI_MODEL",
        "OPENAI_MAX_TOKENS",
        "CNAME_BASE_DOMAIN",
        "LOG_FORMAT",
        "BEHIND_PROXY",
        "LISTEN",
    ];

    fn clear_vars() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            for name in VARS {
                env::remove_var(name);
            }
        }
    }

    fn config() -> Config {
        Config {
            redis_url: None,
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            stripe_secret_key: None,
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            checkout_success_url: DEFAULT_CHECKOUT_SUCCESS_URL.to_string(),
            checkout_cancel_url: DEFAULT_CHECKOUT_CANCEL_URL.to_string(),
            openai_api_key: None,
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_max_tokens: DEFAULT_OPENAI_MAX_TOKENS,
            cname_base_domain: DEFAULT_CNAME_BASE_DOMAIN.to_string(),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.checkout_success_url = "goodiex.vercel.app/payment-success".to_string();
        assert!(config.validate().is_err());
        config.checkout_success_url = DEFAULT_CHECKOUT_SUCCESS_URL.to_string();

        config.stripe_api_base = "ftp://api.stripe.com".to_string();
        assert!(config.validate().is_err());
        config.stripe_api_base = DEFAULT_STRIPE_API_BASE.to_string();

        config.openai_max_tokens = 0;
        assert!(config.validate().is_err());
        config.openai_max_tokens = DEFAULT_OPENAI_MAX_TOKENS;

        config.cname_base_domain = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_masks_secrets() {
        let mut config = config();
        config.stripe_secret_key = Some("sk_live_abcdefghijklmnop".to_string());
        config.redis_url = Some("redis://:hunter2@cache:6379/0".to_string());

        let debug = format!("{config:?}");
        assert!(!debug.contains("sk_live_abcdefghijklmnop"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_vars();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.stripe_api_base, "https://api.stripe.com");
        assert_eq!(config.checkout_success_url, DEFAULT_CHECKOUT_SUCCESS_URL);
        assert_eq!(config.checkout_cancel_url, DEFAULT_CHECKOUT_CANCEL_URL);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.openai_max_tokens, 1500);
        assert_eq!(config.cname_base_domain, "goodiex.com");
        assert!(config.stripe_secret_key.is_none());
        assert!(!config.behind_proxy);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_vars();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("STRIPE_SECRET_KEY", "sk_test_env");
            env::set_var("OPENAI_API_KEY", "   ");
            env::set_var("OPENAI_MAX_TOKENS", "800");
            env::set_var("CNAME_BASE_DOMAIN", "shops.example.com");
            env::set_var("BEHIND_PROXY", "1");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_env"));
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_max_tokens, 800);
        assert_eq!(config.cname_base_domain, "shops.example.com");
        assert!(config.behind_proxy);

        clear_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_max_tokens() {
        clear_vars();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("OPENAI_MAX_TOKENS", "lots");
        }

        assert!(Config::from_env().is_err());

        clear_vars();
    }

    #[test]
    #[serial]
    fn test_load_redis_url_from_components() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("REDIS_URL");
            env::set_var("REDIS_HOST", "redis-host");
            env::set_var("REDIS_PORT", "6380");
            env::set_var("REDIS_DB", "1");
        }

        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::set_var("REDIS_PASSWORD", "secret");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://:secret@redis-host:6380/1");

        // Empty password means no authentication
        unsafe {
            env::set_var("REDIS_PASSWORD", "");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::remove_var("REDIS_HOST");
            env::remove_var("REDIS_PORT");
            env::remove_var("REDIS_DB");
            env::remove_var("REDIS_PASSWORD");
        }
    }

    #[test]
    #[serial]
    fn test_redis_url_priority() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("REDIS_URL", "redis://from-url:6379/0");
            env::set_var("REDIS_HOST", "from-components");
        }

        let url = Config::load_redis_url().unwrap();

        assert!(url.contains("from-url"));
        assert!(!url.contains("from-components"));

        unsafe {
            env::remove_var("REDIS_URL");
            env::remove_var("REDIS_HOST");
        }
    }
}
