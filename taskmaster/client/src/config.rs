use serde::Deserialize;
use std::time::Duration;

/// Where the client finds the API and how long it waits for it.
///
/// Read from `TASKMASTER_API_URL` and `TASKMASTER_TIMEOUT_SECS`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("TASKMASTER"))
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_default_to_local_server() {
        let config = ClientConfig::default();

        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn can_override_defaults() {
        let config: ClientConfig = config::Config::builder()
            .set_override("api_url", "https://tasks.example.com/api")
            .unwrap()
            .set_override("timeout_secs", 3)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api_url, "https://tasks.example.com/api");
        assert_eq!(config.timeout_secs, 3);
    }
}
