//! Engine configuration

use crate::error::ConfigError;
use lrc_entity::EntityId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Cache and transport configuration
///
/// Loaded from TOML; every field is optional and falls back to
/// [`CacheConfig::default`].
///
/// ```toml
/// base_url = "https://learn.example.org"
/// current_user_id = 7
/// request_timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Server origin requests are resolved against
    pub base_url: String,
    /// Id of the signed-in user, for the my-lists selector
    pub current_user_id: Option<EntityId>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Capacity of the `(kind, id)` lookup memo
    pub lookup_cache_capacity: u64,
    /// Finished query statuses kept before they are pruned
    pub status_capacity: usize,
}

impl CacheConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With current user id
    #[inline]
    #[must_use]
    pub fn with_current_user_id(mut self, user_id: impl Into<EntityId>) -> Self {
        self.current_user_id = Some(user_id.into());
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// With lookup memo capacity
    #[inline]
    #[must_use]
    pub fn with_lookup_cache_capacity(mut self, capacity: u64) -> Self {
        self.lookup_cache_capacity = capacity;
        self
    }

    /// With finished-status capacity
    #[inline]
    #[must_use]
    pub fn with_status_capacity(mut self, capacity: usize) -> Self {
        self.status_capacity = capacity;
        self
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns error on malformed TOML or out-of-range values
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be positive".into()));
        }
        if self.lookup_cache_capacity == 0 {
            return Err(ConfigError::Invalid("lookup_cache_capacity must be positive".into()));
        }
        if self.status_capacity == 0 {
            return Err(ConfigError::Invalid("status_capacity must be positive".into()));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8063".to_string(),
            current_user_id: None,
            request_timeout_secs: 30,
            lookup_cache_capacity: 10_000,
            status_capacity: crate::engine::DEFAULT_STATUS_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = CacheConfig::from_toml_str("current_user_id = 7\n").unwrap();
        assert_eq!(config.current_user_id, Some(EntityId::Int(7)));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.base_url, CacheConfig::default().base_url);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            CacheConfig::from_toml_str("base_url = \"ftp://x\"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CacheConfig::from_toml_str("request_timeout_secs = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CacheConfig::from_toml_str("status_capacity = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CacheConfig::from_toml_str("request_timeout_secs = \"soon\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"https://learn.example.org\"").unwrap();
        writeln!(file, "current_user_id = \"staff-1\"").unwrap();

        let config = CacheConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "https://learn.example.org");
        assert_eq!(config.current_user_id, Some(EntityId::from("staff-1")));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            CacheConfig::load("/nonexistent/lrc.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn builders_override_defaults() {
        let config = CacheConfig::new()
            .with_base_url("https://a.example")
            .with_current_user_id(3)
            .with_request_timeout_secs(5)
            .with_lookup_cache_capacity(10)
            .with_status_capacity(2);
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }
}
