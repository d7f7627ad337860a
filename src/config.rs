//! Gateway configuration.
//!
//! Settings are read once per process from `STRIPER_*` environment variables and
//! resolved into a [`GatewayConfig`] that stays read-only for every charge and
//! capture.

use crate::error::{Result, StriperError};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_TITLE: &str = "Striper";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Raw merchant settings, one field per configuration option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub title: String,
    pub test_secret_key: String,
    pub live_secret_key: String,
    pub test_publishable_key: String,
    pub live_publishable_key: String,
    /// Use the sandbox keys.
    pub sandbox: bool,
    /// Always create a customer profile and attach the charge to it.
    pub enable_unique_profile: bool,
    /// Authorize at checkout, capture when the order is completed.
    pub auth_capture: bool,
    pub api_base: String,
    pub timeout_ms: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            test_secret_key: String::new(),
            live_secret_key: String::new(),
            test_publishable_key: String::new(),
            live_publishable_key: String::new(),
            sandbox: false,
            enable_unique_profile: false,
            auth_capture: false,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl GatewaySettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);
        let flag = |key: &str| lookup(key).is_some_and(|value| parse_flag(&value));

        let timeout_ms = match lookup("STRIPER_TIMEOUT_MS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                StriperError::ConfigError(format!(
                    "STRIPER_TIMEOUT_MS must be a whole number of milliseconds, got '{value}'"
                ))
            })?,
            None => defaults.timeout_ms,
        };

        Ok(Self {
            title: text("STRIPER_TITLE", defaults.title),
            test_secret_key: text("STRIPER_TEST_SECRET_KEY", defaults.test_secret_key),
            live_secret_key: text("STRIPER_LIVE_SECRET_KEY", defaults.live_secret_key),
            test_publishable_key: text("STRIPER_TEST_PUBLISHABLE_KEY", defaults.test_publishable_key),
            live_publishable_key: text("STRIPER_LIVE_PUBLISHABLE_KEY", defaults.live_publishable_key),
            sandbox: flag("STRIPER_SANDBOX"),
            enable_unique_profile: flag("STRIPER_ENABLE_UNIQUE_PROFILE"),
            auth_capture: flag("STRIPER_AUTH_CAPTURE"),
            api_base: text("STRIPER_API_BASE", defaults.api_base),
            timeout_ms,
        })
    }

    /// Picks the key pair for the selected environment.
    pub fn resolve(&self) -> Result<GatewayConfig> {
        let (secret_key, publishable_key, environment) = if self.sandbox {
            (&self.test_secret_key, &self.test_publishable_key, "sandbox")
        } else {
            (&self.live_secret_key, &self.live_publishable_key, "live")
        };

        if secret_key.trim().is_empty() {
            return Err(StriperError::ConfigError(format!(
                "No secret key configured for the {environment} environment"
            )));
        }

        Ok(GatewayConfig {
            title: self.title.clone(),
            secret_key: secret_key.clone(),
            publishable_key: publishable_key.clone(),
            sandbox: self.sandbox,
            always_create_profile: self.enable_unique_profile,
            auth_capture: self.auth_capture,
            api_base: self.api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(self.timeout_ms),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "1" | "on"
    )
}

/// Effective configuration for one environment (sandbox or live).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub title: String,
    pub secret_key: String,
    /// Handed to the client-side tokenization script.
    pub publishable_key: String,
    pub sandbox: bool,
    pub always_create_profile: bool,
    /// The merchant wants a separate capture step once the order is completed.
    pub auth_capture: bool,
    pub api_base: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Whether the initial charge should also capture the funds.
    pub fn capture_immediately(&self) -> bool {
        !self.auth_capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = GatewaySettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, GatewaySettings::default());
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_sandbox_selects_test_keys() {
        let settings = GatewaySettings::from_lookup(lookup(&[
            ("STRIPER_SANDBOX", "yes"),
            ("STRIPER_TEST_SECRET_KEY", "sk_test_1"),
            ("STRIPER_TEST_PUBLISHABLE_KEY", "pk_test_1"),
            ("STRIPER_LIVE_SECRET_KEY", "sk_live_1"),
        ]))
        .unwrap();
        let config = settings.resolve().unwrap();

        assert!(config.sandbox);
        assert_eq!(config.secret_key, "sk_test_1");
        assert_eq!(config.publishable_key, "pk_test_1");
    }

    #[test]
    fn test_live_selects_live_keys() {
        let settings = GatewaySettings::from_lookup(lookup(&[
            ("STRIPER_LIVE_SECRET_KEY", "sk_live_1"),
            ("STRIPER_LIVE_PUBLISHABLE_KEY", "pk_live_1"),
            ("STRIPER_TEST_SECRET_KEY", "sk_test_1"),
        ]))
        .unwrap();
        let config = settings.resolve().unwrap();

        assert_eq!(config.secret_key, "sk_live_1");
        assert_eq!(config.publishable_key, "pk_live_1");
    }

    #[test]
    fn test_missing_secret_key_is_config_error() {
        let settings = GatewaySettings::from_lookup(lookup(&[
            ("STRIPER_SANDBOX", "yes"),
            ("STRIPER_LIVE_SECRET_KEY", "sk_live_1"),
        ]))
        .unwrap();
        assert!(matches!(
            settings.resolve(),
            Err(StriperError::ConfigError(_))
        ));
    }

    #[test]
    fn test_flags_and_capture_inversion() {
        let settings = GatewaySettings::from_lookup(lookup(&[
            ("STRIPER_LIVE_SECRET_KEY", "sk_live_1"),
            ("STRIPER_AUTH_CAPTURE", "yes"),
            ("STRIPER_ENABLE_UNIQUE_PROFILE", "TRUE"),
            ("STRIPER_API_BASE", "http://localhost:12111/"),
            ("STRIPER_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();
        let config = settings.resolve().unwrap();

        assert!(config.auth_capture);
        assert!(!config.capture_immediately());
        assert!(config.always_create_profile);
        assert_eq!(config.api_base, "http://localhost:12111");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_malformed_timeout_is_config_error() {
        let result = GatewaySettings::from_lookup(lookup(&[
            ("STRIPER_LIVE_SECRET_KEY", "sk_live_1"),
            ("STRIPER_TIMEOUT_MS", "15s"),
        ]));
        match result {
            Err(StriperError::ConfigError(message)) => assert!(message.contains("'15s'")),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("yes"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }
}
