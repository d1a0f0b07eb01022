use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a [`TransformerCache`](crate::TransformerCache).
///
/// Usually embedded in the host application's configuration file:
///
/// ```toml
/// [views.cache]
/// max_capacity = 4096
/// tti_seconds = 600
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Name reported in logs
    pub name: Option<String>,

    /// Maximum number of transformers kept
    pub max_capacity: u64,

    /// Entries are dropped this long after they were compiled
    pub ttl_seconds: Option<u64>,

    /// Entries are dropped after going unused for this long
    pub tti_seconds: Option<u64>,
}

impl CacheConfig {
    pub const DEFAULT_MAX_CAPACITY: u64 = 1024;

    pub fn time_to_live(&self) -> Option<Duration> {
        self.ttl_seconds.map(Duration::from_secs)
    }

    pub fn time_to_idle(&self) -> Option<Duration> {
        self.tti_seconds.map(Duration::from_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: None,
            max_capacity: Self::DEFAULT_MAX_CAPACITY,
            ttl_seconds: None,
            tti_seconds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: CacheConfig = serde_json::from_str(r#"{ "tti_seconds": 30 }"#).unwrap();

        assert_eq!(config.max_capacity, CacheConfig::DEFAULT_MAX_CAPACITY);
        assert_eq!(config.time_to_idle(), Some(Duration::from_secs(30)));
        assert_eq!(config.time_to_live(), None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<CacheConfig>(r#"{ "capacity": 3 }"#).is_err());
    }
}
