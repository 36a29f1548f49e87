use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory by [`ExtractorConfig::load`].
pub const DEFAULT_CONFIG_FILE: &str = "product-extractor";
/// Prefix for environment overrides, e.g. `PRODUCT_EXTRACTOR_FETCH__TIMEOUT_SECONDS`.
pub const ENV_PREFIX: &str = "PRODUCT_EXTRACTOR";

/// Top-level configuration. Only fetching is configurable; extraction rules
/// are the same for every site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// How pages are requested
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Overrides the User-Agent of the emulated browser when set.
    pub user_agent: Option<String>,
    pub timeout_seconds: u64,
    /// Total attempts per page, first request included.
    pub max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_seconds: 30,
            max_attempts: 1,
            retry_base_delay_ms: 1000,
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExtractorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, overlaid by an optional `product-extractor.toml` in the
    /// working directory, overlaid by `PRODUCT_EXTRACTOR_*` variables.
    pub fn load() -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to assemble configuration")?;

        let config: ExtractorConfig = settings
            .try_deserialize()
            .context("Invalid configuration values")?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch.max_attempts == 0 {
            anyhow::bail!("fetch.max_attempts must be at least 1");
        }
        if self.fetch.timeout_seconds == 0 {
            anyhow::bail!("fetch.timeout_seconds must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.fetch.timeout_seconds, 30);
        assert_eq!(config.fetch.max_attempts, 1);
        assert!(config.fetch.user_agent.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExtractorConfig::from_toml_str(
            r#"
            [fetch]
            timeout_seconds = 10
            user_agent = "Mozilla/5.0 (X11; Linux x86_64) Firefox/136.0"
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch.timeout_seconds, 10);
        assert_eq!(config.fetch.max_attempts, 1);
        assert_eq!(config.fetch.retry_base_delay_ms, 1000);
        assert!(config.fetch.user_agent.unwrap().starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ExtractorConfig::from_toml_str("").unwrap();
        assert_eq!(config.fetch.timeout_seconds, 30);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ExtractorConfig::from_toml_str("[fetch]\nmax_attempts = 0").is_err());
        assert!(ExtractorConfig::from_toml_str("[fetch]\ntimeout_seconds = \"soon\"").is_err());
    }

    #[test]
    fn test_load_applies_environment_overrides() {
        // Only this test touches PRODUCT_EXTRACTOR_* variables
        unsafe {
            std::env::set_var("PRODUCT_EXTRACTOR_FETCH__TIMEOUT_SECONDS", "7");
            std::env::set_var("PRODUCT_EXTRACTOR_FETCH__MAX_ATTEMPTS", "3");
        }

        let loaded = ExtractorConfig::load();

        unsafe {
            std::env::remove_var("PRODUCT_EXTRACTOR_FETCH__TIMEOUT_SECONDS");
            std::env::remove_var("PRODUCT_EXTRACTOR_FETCH__MAX_ATTEMPTS");
        }

        let config = loaded.unwrap();
        assert_eq!(config.fetch.timeout_seconds, 7);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.retry_base_delay_ms, 1000);
    }

    #[test]
    fn test_missing_file() {
        assert!(ExtractorConfig::from_file("does/not/exist.toml").is_err());
    }
}
