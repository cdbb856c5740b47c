//! Client configuration.
//!
//! Connection settings for the planner backend, built either explicitly
//! or from environment variables.

/// Default planner base URL (local development backend).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Fixed timeout for the non-streaming request path, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the planner client connection.
///
/// # Example
///
/// ```ignore
/// use taskdeck::config::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_base_url("http://localhost:9000")
///     .with_streaming(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Base URL of the planner backend
    pub base_url: String,
    /// Timeout applied to the non-streaming request path
    pub request_timeout_secs: u64,
    /// Use the streaming endpoint; when false, fall back to plain JSON
    pub streaming: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            streaming: true,
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the planner base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the non-streaming request timeout.
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Enable or disable the streaming endpoint.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Build config from environment variables.
    ///
    /// `TASKDECK_PLANNER_URL` overrides the base URL; setting
    /// `TASKDECK_NO_STREAM` switches to the non-streaming fallback.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TASKDECK_PLANNER_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if std::env::var("TASKDECK_NO_STREAM").is_ok() {
            config.streaming = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_default() {
        let config = PlannerConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, REQUEST_TIMEOUT_SECS);
        assert!(config.streaming);
    }

    #[test]
    fn test_config_builder() {
        let config = PlannerConfig::new()
            .with_base_url("http://localhost:9000")
            .with_request_timeout(5)
            .with_streaming(false);

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout_secs, 5);
        assert!(!config.streaming);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("TASKDECK_PLANNER_URL", "http://10.0.0.5:8000/");
        std::env::set_var("TASKDECK_NO_STREAM", "1");

        let config = PlannerConfig::from_env();
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert!(!config.streaming);

        std::env::remove_var("TASKDECK_PLANNER_URL");
        std::env::remove_var("TASKDECK_NO_STREAM");
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        std::env::remove_var("TASKDECK_PLANNER_URL");
        std::env::remove_var("TASKDECK_NO_STREAM");

        let config = PlannerConfig::from_env();
        assert_eq!(config, PlannerConfig::default());
    }
}
