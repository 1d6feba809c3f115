use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_API_KEY: &str = "<your secret redmine api key goes here>";

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct RedmineClientConfiguration {
    pub url: String,
    pub api_key: String,
}

impl Default for RedmineClientConfiguration {
    fn default() -> Self {
        RedmineClientConfiguration {
            url: "https://redmine.example.com/".into(),
            api_key: PLACEHOLDER_API_KEY.into(),
        }
    }
}

impl RedmineClientConfiguration {
    /// Does the key look like a real Redmine API key?
    #[must_use]
    pub fn has_valid_api_key(&self) -> bool {
        !(self.api_key.trim().is_empty()
            || self.api_key == PLACEHOLDER_API_KEY
            || self.api_key.contains("secret"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_key_is_not_valid() {
        assert!(!RedmineClientConfiguration::default().has_valid_api_key());
        let cfg = RedmineClientConfiguration {
            url: "http://localhost".into(),
            api_key: "8a1b0c".into(),
        };
        assert!(cfg.has_valid_api_key());
    }
}
