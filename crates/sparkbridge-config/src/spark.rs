use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Known Spark API versions: (version, domain, websocket endpoint)
const KNOWN_VERSIONS: &[(&str, &str, &str)] = &[
    ("v1.1", "general", "wss://spark-api.xf-yun.com/v1.1/chat"),
    ("v2.1", "generalv2", "wss://spark-api.xf-yun.com/v2.1/chat"),
    ("v3.1", "generalv3", "wss://spark-api.xf-yun.com/v3.1/chat"),
    ("v3.5", "generalv3.5", "wss://spark-api.xf-yun.com/v3.5/chat"),
    ("v4.0", "4.0Ultra", "wss://spark-api.xf-yun.com/v4.0/chat"),
];

/// iFlytek Spark connection settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SparkConfig {
    /// Application ID issued by the Spark console
    pub app_id: String,
    /// API key used in the signed authorization header
    pub api_key: SecretString,
    /// API secret keying the HMAC signature
    pub api_secret: SecretString,
    /// API version (e.g. "v3.1"), selects endpoint and domain
    #[serde(default = "default_api_model_version")]
    pub api_model_version: String,
    /// Websocket endpoint override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model domain override
    #[serde(default)]
    pub domain: Option<String>,
    /// End-user identifier sent in the request header
    #[serde(default)]
    pub uid: Option<String>,
    /// Per-frame receive timeout (e.g. "30s")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

/// Resolved websocket endpoint and model domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparkEndpoint {
    pub url: Url,
    pub domain: String,
}

impl SparkConfig {
    /// Resolve the endpoint URL and domain for the configured version
    ///
    /// Explicit `base_url` / `domain` take precedence over the values
    /// derived from `api_model_version`.
    pub fn endpoint(&self) -> anyhow::Result<SparkEndpoint> {
        let known = KNOWN_VERSIONS
            .iter()
            .find(|(version, _, _)| *version == self.api_model_version);

        let url = match (&self.base_url, known) {
            (Some(url), _) => url.clone(),
            (None, Some((_, _, url))) => Url::parse(url)?,
            (None, None) => anyhow::bail!(
                "unknown spark api_model_version '{}' and no base_url configured",
                self.api_model_version
            ),
        };

        let domain = match (&self.domain, known) {
            (Some(domain), _) => domain.clone(),
            (None, Some((_, domain, _))) => (*domain).to_owned(),
            (None, None) => anyhow::bail!(
                "unknown spark api_model_version '{}' and no domain configured",
                self.api_model_version
            ),
        };

        Ok(SparkEndpoint { url, domain })
    }

    /// Parsed receive timeout
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid spark timeout '{}': {e}", self.timeout))
    }
}

fn default_api_model_version() -> String {
    "v3.1".to_owned()
}

fn default_timeout() -> String {
    "30s".to_owned()
}
