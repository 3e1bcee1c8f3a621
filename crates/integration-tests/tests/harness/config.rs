//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use sparkbridge_config::{AdapterConfig, Config, ServerConfig, SparkConfig};
use url::Url;

pub const APP_ID: &str = "test-app";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal configuration pointed at a mock Spark endpoint
    pub fn new(spark_url: Url) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                },
                spark: SparkConfig {
                    app_id: APP_ID.to_owned(),
                    api_key: SecretString::from("test-key".to_owned()),
                    api_secret: SecretString::from("test-secret".to_owned()),
                    api_model_version: "v3.5".to_owned(),
                    base_url: Some(spark_url),
                    domain: None,
                    uid: None,
                    timeout: "5s".to_owned(),
                },
                adapter: AdapterConfig::default(),
                telemetry: None,
            },
        }
    }

    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.spark.timeout = timeout.to_owned();
        self
    }

    pub fn with_uid(mut self, uid: &str) -> Self {
        self.config.spark.uid = Some(uid.to_owned());
        self
    }

    pub fn with_adapter(mut self, adapter: AdapterConfig) -> Self {
        self.config.adapter = adapter;
        self
    }

    pub fn build(self) -> Config {
        self.config.validate().expect("test config must be valid");
        self.config
    }
}
