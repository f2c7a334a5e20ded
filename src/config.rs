//! Startup configuration, resolved once from the environment.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;

/// Required. The Gemini API credential.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_VAR: &str = "GEMBOT_MODEL";
pub const TEMPERATURE_VAR: &str = "GEMBOT_TEMPERATURE";
pub const SYSTEM_PROMPT_VAR: &str = "GEMBOT_SYSTEM_PROMPT";
pub const MAX_TURNS_VAR: &str = "GEMBOT_MAX_TURNS";
pub const TIMEOUT_VAR: &str = "GEMBOT_TIMEOUT_SECS";
/// API root, for proxies and local stand-ins.
pub const API_BASE_VAR: &str = "GEMBOT_API_BASE";
/// Tracing filter directive, read by the binary before anything else.
pub const LOG_VAR: &str = "GEMBOT_LOG";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. \
Answer the user's question clearly and concisely, using the earlier turns of \
this conversation as context when they are relevant.";

/// Everything the session and model client need, built once at startup and
/// passed down by reference.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub system_prompt: String,
    /// Most recent turns sent with each request. `None` sends the whole
    /// transcript.
    pub max_turns: Option<usize>,
    pub timeout: Duration,
    pub api_base: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("system_prompt", &self.system_prompt)
            .field("max_turns", &self.max_turns)
            .field("timeout", &self.timeout)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Config {
    /// Defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_turns: None,
            timeout: DEFAULT_TIMEOUT,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let mut config = Config::new(api_key);

        if let Some(model) = non_blank(lookup(MODEL_VAR)) {
            config.model = model;
        }
        if let Some(base) = non_blank(lookup(API_BASE_VAR)) {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(invalid(API_BASE_VAR, &base, "must be an http(s) URL"));
            }
            config.api_base = base;
        }
        if let Some(prompt) = non_blank(lookup(SYSTEM_PROMPT_VAR)) {
            config.system_prompt = prompt;
        }
        if let Some(raw) = non_blank(lookup(TEMPERATURE_VAR)) {
            let temperature: f64 = parse_var(TEMPERATURE_VAR, &raw)?;
            if !(0.0..=2.0).contains(&temperature) {
                return Err(invalid(TEMPERATURE_VAR, &raw, "must be between 0.0 and 2.0"));
            }
            config.temperature = temperature;
        }
        if let Some(raw) = non_blank(lookup(MAX_TURNS_VAR)) {
            let max_turns: usize = parse_var(MAX_TURNS_VAR, &raw)?;
            if max_turns == 0 {
                return Err(invalid(MAX_TURNS_VAR, &raw, "must be at least 1"));
            }
            config.max_turns = Some(max_turns);
        }
        if let Some(raw) = non_blank(lookup(TIMEOUT_VAR)) {
            let secs: u64 = parse_var(TIMEOUT_VAR, &raw)?;
            if secs == 0 {
                return Err(invalid(TIMEOUT_VAR, &raw, "must be at least 1"));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| invalid(var, raw, &e.to_string()))
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn missing_key_is_fatal() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingApiKey)));
        assert!(matches!(
            load(&[(API_KEY_VAR, "   ")]),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = load(&[(API_KEY_VAR, " secret ")]).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_turns, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn optional_values_override_defaults() {
        let config = load(&[
            (API_KEY_VAR, "secret"),
            (MODEL_VAR, "gemini-2.5-pro"),
            (TEMPERATURE_VAR, "1.2"),
            (MAX_TURNS_VAR, "8"),
            (TIMEOUT_VAR, "30"),
            (SYSTEM_PROMPT_VAR, "Be terse."),
            (API_BASE_VAR, "http://127.0.0.1:8080/v1beta/models"),
        ])
        .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.temperature, 1.2);
        assert_eq!(config.max_turns, Some(8));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.system_prompt, "Be terse.");
        assert_eq!(config.api_base, "http://127.0.0.1:8080/v1beta/models");
    }

    #[test]
    fn malformed_values_are_rejected() {
        for (var, value) in [
            (TEMPERATURE_VAR, "hot"),
            (TEMPERATURE_VAR, "3.5"),
            (MAX_TURNS_VAR, "0"),
            (MAX_TURNS_VAR, "-1"),
            (TIMEOUT_VAR, "0"),
            (API_BASE_VAR, "localhost:8080"),
        ] {
            let err = load(&[(API_KEY_VAR, "secret"), (var, value)]).unwrap_err();
            match err {
                ConfigError::InvalidValue { var: got, .. } => assert_eq!(got, var),
                other => panic!("expected InvalidValue for {var}, got {other:?}"),
            }
        }
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", Config::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
