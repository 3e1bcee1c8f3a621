use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, SYSTEM_PLACEHOLDER};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are empty, the Spark endpoint cannot
    /// be resolved, or adapter settings are out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_spark_config()?;
        self.validate_adapter_config()?;
        Ok(())
    }

    /// Validate Spark credentials and endpoint resolution
    fn validate_spark_config(&self) -> anyhow::Result<()> {
        let spark = &self.spark;

        if spark.app_id.trim().is_empty() {
            anyhow::bail!("spark.app_id must not be empty");
        }
        if spark.api_key.expose_secret().is_empty() {
            anyhow::bail!("spark.api_key must not be empty");
        }
        if spark.api_secret.expose_secret().is_empty() {
            anyhow::bail!("spark.api_secret must not be empty");
        }

        spark.endpoint()?;

        if spark.timeout()?.is_zero() {
            anyhow::bail!("spark.timeout must be greater than 0");
        }

        Ok(())
    }

    /// Validate translation settings
    fn validate_adapter_config(&self) -> anyhow::Result<()> {
        let adapter = &self.adapter;

        if !adapter.temperature_scale.is_finite() || adapter.temperature_scale <= 0.0 {
            anyhow::bail!("adapter.temperature_scale must be a positive number");
        }

        if adapter.max_tokens_key.trim().is_empty() {
            anyhow::bail!("adapter.max_tokens_key must not be empty");
        }

        if !adapter.system_template.contains(SYSTEM_PLACEHOLDER) {
            anyhow::bail!("adapter.system_template must contain the {SYSTEM_PLACEHOLDER} placeholder");
        }

        Ok(())
    }
}
