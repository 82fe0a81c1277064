//! API base-URL configuration.
//!
//! # Environment variables
//!
//! | Variable             | Required | Default                     | Description              |
//! |----------------------|----------|-----------------------------|--------------------------|
//! | `TASKMASTER_API_URL` | no       | `http://localhost:8000/api` | Root of the REST API     |

/// Environment variable selecting the API base URL.
pub const API_URL_VAR: &str = "TASKMASTER_API_URL";

/// Local development backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Read the configuration from the process environment, loading a `.env`
    /// file first if one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Blank values
    /// count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(API_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { base_url }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_uses_local_default() {
        let config = ApiConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn variable_overrides_default() {
        let config = ApiConfig::from_lookup(|key| {
            (key == API_URL_VAR).then(|| "https://tasks.example.com/api".to_string())
        });
        assert_eq!(config.base_url, "https://tasks.example.com/api");
    }

    #[test]
    fn blank_variable_is_ignored() {
        let config = ApiConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }
}
