use serde::Deserialize;
use serde_json::{Map, Value};

/// Placeholder substituted with the system message content
pub const SYSTEM_PLACEHOLDER: &str = "{system}";

/// Vendor parameter keys computed per call, besides the token limit key
const COMPUTED_KEYS: &[&str] = &["chat_id", "temperature"];

/// Translation settings between the OpenAI-style surface and Spark
///
/// Vendor parameters are merged in a fixed order: values computed from the
/// request (`chat_id`, scaled temperature, max tokens) first, then
/// [`extras`](Self::extras), then any unrecognised fields on the request
/// itself. Later layers overwrite earlier ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    /// Model name reported in responses
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Multiplier from the OpenAI temperature range (0-2) to Spark's (0-1)
    #[serde(default = "default_temperature_scale")]
    pub temperature_scale: f64,
    /// Spark parameter name receiving the requested token limit
    #[serde(default = "default_max_tokens_key")]
    pub max_tokens_key: String,
    /// Template for system messages; `{system}` is replaced by the content
    #[serde(default = "default_system_template")]
    pub system_template: String,
    /// Extra Spark parameters sent with every call
    #[serde(default)]
    pub extras: Map<String, Value>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            temperature_scale: default_temperature_scale(),
            max_tokens_key: default_max_tokens_key(),
            system_template: default_system_template(),
            extras: Map::new(),
        }
    }
}

impl AdapterConfig {
    /// Render a system message through [`system_template`](Self::system_template)
    pub fn render_system(&self, content: &str) -> String {
        self.system_template.replace(SYSTEM_PLACEHOLDER, content)
    }

    /// Keys in [`extras`](Self::extras) that replace a per-call computed value
    pub fn overridden_keys(&self) -> Vec<&str> {
        self.extras
            .keys()
            .map(String::as_str)
            .filter(|key| COMPUTED_KEYS.contains(key) || *key == self.max_tokens_key)
            .collect()
    }
}

fn default_model_name() -> String {
    "xunfei-spark3.0".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature_scale() -> f64 {
    0.5
}

fn default_max_tokens_key() -> String {
    "max_tokens".to_owned()
}

fn default_system_template() -> String {
    format!("You need to follow the system settings:{SYSTEM_PLACEHOLDER}")
}
