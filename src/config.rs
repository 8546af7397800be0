use std::env;

/// Supabase local-stack defaults, used when the environment does not
/// provide real project credentials. The demo service-role key is the
/// well-known key shipped with `supabase start`.
const LOCAL_SUPABASE_URL: &str = "http://127.0.0.1:54321";
const LOCAL_SERVICE_ROLE_KEY: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
eyJpc3MiOiJzdXBhYmFzZS1kZW1vIiwicm9sZSI6InNlcnZpY2Vfcm9sZSIsImV4cCI6MTk4MzgxMjk5Nn0.\
EGIM96RAZx35lJzdJsyH-qQwv8Hdp7fsn3W0YpN81IU";

/// Connection settings for the QuoteKit Supabase project.
#[derive(Debug, Clone)]
pub struct Config {
    /// Supabase project URL (default: local stack)
    pub supabase_url: String,
    /// Service-role key for the admin API (default: local demo key)
    pub service_role_key: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// local development stack when unset. Invalid credentials are not
    /// detected here; they surface at the first API call.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var("NEXT_PUBLIC_SUPABASE_URL").ok(),
            env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
        )
    }

    fn from_values(url: Option<String>, key: Option<String>) -> Result<Self, ConfigError> {
        let supabase_url = url
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| LOCAL_SUPABASE_URL.to_string());
        let service_role_key = key
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| LOCAL_SERVICE_ROLE_KEY.to_string());

        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(supabase_url));
        }

        Ok(Config {
            supabase_url,
            service_role_key,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Supabase URL is not an http(s) URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_back_to_local_stack() {
        let config = Config::from_values(None, None).unwrap();
        assert_eq!(config.supabase_url, LOCAL_SUPABASE_URL);
        assert_eq!(config.service_role_key, LOCAL_SERVICE_ROLE_KEY);
    }

    #[test]
    fn test_empty_values_treated_as_unset() {
        let config = Config::from_values(Some(String::new()), Some(String::new())).unwrap();
        assert_eq!(config.supabase_url, LOCAL_SUPABASE_URL);
    }

    #[test]
    fn test_environment_values_win() {
        let config = Config::from_values(
            Some("https://abc.supabase.co".to_string()),
            Some("secret-key".to_string()),
        )
        .unwrap();
        assert_eq!(config.supabase_url, "https://abc.supabase.co");
        assert_eq!(config.service_role_key, "secret-key");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = Config::from_values(Some("postgres://localhost".to_string()), None);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }
}
