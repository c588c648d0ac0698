use crate::game::constants::{SCAN_MS, TICK_MS};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub tick_period: Duration,
    pub scan_interval: Duration,
    pub mean_comments: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            tick_period: Duration::from_millis(TICK_MS),
            scan_interval: Duration::from_millis(SCAN_MS),
            mean_comments: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|value| *value > 0)
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        Self {
            port: lookup("PORT")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.port),
            tick_period: millis("TICK_MS", defaults.tick_period),
            scan_interval: millis("SCAN_MS", defaults.scan_interval),
            mean_comments: lookup("MEAN_COMMENTS")
                .map(|value| !matches!(value.trim(), "0" | "false" | "FALSE" | "off"))
                .unwrap_or(defaults.mean_comments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.port, 5000);
        assert_eq!(config.tick_period, Duration::from_millis(200));
        assert_eq!(config.scan_interval, Duration::from_millis(50));
        assert!(config.mean_comments);
    }

    #[test]
    fn overrides_are_parsed_and_bad_values_ignored() {
        let config = config_from(&[
            ("PORT", "8787"),
            ("TICK_MS", "100"),
            ("SCAN_MS", "zero"),
            ("MEAN_COMMENTS", "off"),
        ]);
        assert_eq!(config.port, 8787);
        assert_eq!(config.tick_period, Duration::from_millis(100));
        assert_eq!(config.scan_interval, Duration::from_millis(50));
        assert!(!config.mean_comments);
    }
}
