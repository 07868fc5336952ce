use std::str::FromStr;
use std::time::Duration;

const CLASSIFY_URL: &str = "https://egghlaujjh5qoiwrhw3svn7r5u0iwkmy.lambda-url.us-east-1.on.aws/";

pub const HISTORY_CAP: usize = 10;
pub const TARGET_SIZE: u32 = 224;
pub const DEFAULT_CONFIDENCE_THRESHOLD: u8 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub classify_endpoint: String,
    /// `None` keeps telemetry on the local log only.
    pub telemetry_endpoint: Option<String>,
    pub request_timeout: Duration,
    pub transport_retries: u32,
    pub history_cap: usize,
    pub target_size: u32,
    pub confidence_threshold: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            classify_endpoint: CLASSIFY_URL.to_string(),
            telemetry_endpoint: None,
            request_timeout: Duration::from_secs(30),
            transport_retries: 1,
            history_cap: HISTORY_CAP,
            target_size: TARGET_SIZE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `LEAF_LENS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("LEAF_LENS_CLASSIFY_URL").filter(|v| !v.trim().is_empty()) {
            config.classify_endpoint = url;
        }
        if let Some(url) = lookup("LEAF_LENS_TELEMETRY_URL").filter(|v| !v.trim().is_empty()) {
            config.telemetry_endpoint = Some(url);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "LEAF_LENS_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var(&lookup, "LEAF_LENS_TRANSPORT_RETRIES") {
            config.transport_retries = retries;
        }
        if let Some(cap) = parse_var::<usize>(&lookup, "LEAF_LENS_HISTORY_CAP").filter(|c| *c > 0) {
            config.history_cap = cap;
        }
        if let Some(size) = parse_var::<u32>(&lookup, "LEAF_LENS_TARGET_SIZE").filter(|s| *s > 0) {
            config.target_size = size;
        }
        if let Some(threshold) = parse_var::<u8>(&lookup, "LEAF_LENS_CONFIDENCE_THRESHOLD") {
            config.confidence_threshold = threshold.min(100);
        }

        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable config override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_dashboard_constants() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.history_cap, 10);
        assert_eq!(config.target_size, 224);
        assert_eq!(config.confidence_threshold, 30);
        assert_eq!(config.transport_retries, 1);
        assert!(config.telemetry_endpoint.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("LEAF_LENS_CLASSIFY_URL", "http://localhost:9000/"),
            ("LEAF_LENS_TELEMETRY_URL", "http://localhost:9001/logs"),
            ("LEAF_LENS_REQUEST_TIMEOUT_SECS", "5"),
            ("LEAF_LENS_TRANSPORT_RETRIES", "0"),
            ("LEAF_LENS_CONFIDENCE_THRESHOLD", "250"),
        ]));
        assert_eq!(config.classify_endpoint, "http://localhost:9000/");
        assert_eq!(config.telemetry_endpoint.as_deref(), Some("http://localhost:9001/logs"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.transport_retries, 0);
        assert_eq!(config.confidence_threshold, 100);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("LEAF_LENS_HISTORY_CAP", "lots"),
            ("LEAF_LENS_TARGET_SIZE", "0"),
        ]));
        assert_eq!(config.history_cap, HISTORY_CAP);
        assert_eq!(config.target_size, TARGET_SIZE);
    }
}
