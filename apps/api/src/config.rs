use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::analysis::ats::AtsStrategy;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Enrichment is disabled when unset.
    pub enrichment_url: Option<String>,
    pub enrichment_api_key: Option<String>,
    pub enrichment_timeout_secs: u64,
    /// JSON catalog override; built-in catalog when unset.
    pub catalog_path: Option<PathBuf>,
    pub ats_strategy: AtsStrategy,
    /// Permissive CORS when unset.
    pub cors_origin: Option<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so parsing is testable without
    /// touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(&lookup, "PORT", 3001)?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            enrichment_url: optional("ENRICHMENT_URL"),
            enrichment_api_key: optional("ENRICHMENT_API_KEY"),
            enrichment_timeout_secs: parse_or(&lookup, "ENRICHMENT_TIMEOUT_SECS", 10)?,
            catalog_path: optional("CATALOG_PATH").map(PathBuf::from),
            ats_strategy: match optional("ATS_STRATEGY") {
                Some(raw) => raw
                    .parse::<AtsStrategy>()
                    .map_err(|e| anyhow!(e))
                    .context("ATS_STRATEGY is invalid")?,
                None => AtsStrategy::default(),
            },
            cors_origin: optional("CORS_ORIGIN"),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.rust_log, "info");
        assert!(config.enrichment_url.is_none());
        assert_eq!(config.enrichment_timeout_secs, 10);
        assert_eq!(config.ats_strategy, AtsStrategy::SkillVocabulary);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("ENRICHMENT_URL", "http://nlp.internal/enrich"),
            ("ATS_STRATEGY", "keyword_overlap"),
            ("CATALOG_PATH", "/etc/catalog.json"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.enrichment_url.as_deref(),
            Some("http://nlp.internal/enrich")
        );
        assert_eq!(config.ats_strategy, AtsStrategy::KeywordOverlap);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/etc/catalog.json")));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("ENRICHMENT_URL", "  "), ("PORT", "")]).unwrap();
        assert!(config.enrichment_url.is_none());
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn test_invalid_port_names_variable() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_strategy_rejected() {
        let err = config_from(&[("ATS_STRATEGY", "semantic")]).unwrap_err();
        assert!(err.to_string().contains("ATS_STRATEGY"));
    }
}
