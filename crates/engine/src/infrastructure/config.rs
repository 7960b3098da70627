//! Engine configuration from environment variables.

use std::time::Duration;

use crate::infrastructure::llm_client::{
    DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL, DEFAULT_LLM_TIMEOUT_SECS,
};

pub const DEFAULT_DATABASE_PATH: &str = "blankwars.db";
pub const DEFAULT_NARRATIVE_MAX_RETRIES: u32 = 2;
pub const DEFAULT_TURN_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub database_path: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    /// Model used for adjudication; same as `llm_model` unless overridden
    pub judge_model: String,
    pub llm_timeout_secs: u64,
    pub narrative_max_retries: u32,
    pub turn_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_api_key: None,
            judge_model: DEFAULT_LLM_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            narrative_max_retries: DEFAULT_NARRATIVE_MAX_RETRIES,
            turn_interval_secs: DEFAULT_TURN_INTERVAL_SECS,
        }
    }
}

impl EngineConfig {
    /// Read `DATABASE_PATH`, `LLM_BASE_URL`, `LLM_MODEL`, `LLM_API_KEY`, `JUDGE_MODEL`,
    /// `LLM_TIMEOUT_SECS`, `NARRATIVE_MAX_RETRIES` and `TURN_INTERVAL_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let llm_model = get("LLM_MODEL").unwrap_or(defaults.llm_model);
        Self {
            database_path: get("DATABASE_PATH").unwrap_or(defaults.database_path),
            llm_base_url: get("LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            judge_model: get("JUDGE_MODEL").unwrap_or_else(|| llm_model.clone()),
            llm_model,
            llm_api_key: get("LLM_API_KEY"),
            llm_timeout_secs: parse_or(
                "LLM_TIMEOUT_SECS",
                get("LLM_TIMEOUT_SECS"),
                defaults.llm_timeout_secs,
            ),
            narrative_max_retries: parse_or(
                "NARRATIVE_MAX_RETRIES",
                get("NARRATIVE_MAX_RETRIES"),
                defaults.narrative_max_retries,
            ),
            turn_interval_secs: parse_or(
                "TURN_INTERVAL_SECS",
                get("TURN_INTERVAL_SECS"),
                defaults.turn_interval_secs,
            ),
        }
    }

    pub fn turn_interval(&self) -> Duration {
        Duration::from_secs(self.turn_interval_secs.max(1))
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    key: &str,
    value: Option<String>,
    default: T,
) -> T {
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid number, using default");
            default
        }),
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.database_path, "blankwars.db");
        assert_eq!(config.turn_interval_secs, 60);
    }

    #[test]
    fn test_judge_model_follows_llm_model() {
        let config = EngineConfig::from_lookup(lookup(&[("LLM_MODEL", "llama3.2")]));
        assert_eq!(config.llm_model, "llama3.2");
        assert_eq!(config.judge_model, "llama3.2");

        let config = EngineConfig::from_lookup(lookup(&[
            ("LLM_MODEL", "llama3.2"),
            ("JUDGE_MODEL", "qwen2.5"),
        ]));
        assert_eq!(config.judge_model, "qwen2.5");
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("LLM_TIMEOUT_SECS", "soon"),
            ("NARRATIVE_MAX_RETRIES", "5"),
            ("TURN_INTERVAL_SECS", "-3"),
        ]));
        assert_eq!(config.llm_timeout_secs, DEFAULT_LLM_TIMEOUT_SECS);
        assert_eq!(config.narrative_max_retries, 5);
        assert_eq!(config.turn_interval_secs, DEFAULT_TURN_INTERVAL_SECS);
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let config = EngineConfig::from_lookup(lookup(&[("LLM_API_KEY", "  ")]));
        assert_eq!(config.llm_api_key, None);
    }
}
