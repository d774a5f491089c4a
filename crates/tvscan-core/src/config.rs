use std::collections::BTreeMap;
use std::env;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://scanner.tradingview.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const BASE_URL_ENV: &str = "TVSCAN_BASE_URL";
const TIMEOUT_ENV: &str = "TVSCAN_TIMEOUT_MS";

const DEFAULT_HEADERS: [(&str, &str); 7] = [
    ("authority", "scanner.tradingview.com"),
    ("accept", "text/plain, */*; q=0.01"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.0.4758.102 Safari/537.36",
    ),
    ("origin", "https://www.tradingview.com"),
    ("referer", "https://www.tradingview.com/"),
    ("accept-language", "en-US,en;q=0.9"),
    // The scanner expects the JSON body under a form content type.
    ("content-type", "application/x-www-form-urlencoded"),
];

/// Endpoint, timeout and headers used by [`crate::ScreenerClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenerConfig {
    base_url: String,
    timeout_ms: u64,
    headers: BTreeMap<String, String>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                .collect(),
        }
    }
}

impl ScreenerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `TVSCAN_BASE_URL` and `TVSCAN_TIMEOUT_MS`.
    ///
    /// Unusable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV) {
            let trimmed = base_url.trim();
            if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                config = config.with_base_url(trimmed);
            } else {
                warn!(value = %base_url, "ignoring {BASE_URL_ENV}: expected an http(s) URL");
            }
        }

        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            match timeout.trim().parse::<u64>() {
                Ok(timeout_ms) if timeout_ms > 0 => config = config.with_timeout_ms(timeout_ms),
                _ => warn!(value = %timeout, "ignoring {TIMEOUT_ENV}: expected a positive integer"),
            }
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Adds or replaces a default header. Names are stored lowercase.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(&name.to_ascii_lowercase());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Scan endpoint for `market`.
    pub fn scan_url(&self, market: &str) -> String {
        format!("{}/{}/scan", self.base_url, market)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn defaults_carry_browser_headers() {
        let config = ScreenerConfig::default();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms(), DEFAULT_TIMEOUT_MS);
        assert_eq!(
            config.headers().get("content-type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            config.headers().get("origin").map(String::as_str),
            Some("https://www.tradingview.com")
        );
        assert_eq!(
            config.scan_url("america"),
            "https://scanner.tradingview.com/america/scan"
        );
    }

    #[test]
    fn environment_overrides_valid_values() {
        let config = ScreenerConfig::from_lookup(lookup_from(&[
            (BASE_URL_ENV, "http://localhost:8080/"),
            (TIMEOUT_ENV, "2500"),
        ]));

        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.timeout_ms(), 2_500);
        assert_eq!(config.scan_url("crypto"), "http://localhost:8080/crypto/scan");
    }

    #[test]
    fn environment_ignores_invalid_values() {
        let config = ScreenerConfig::from_lookup(lookup_from(&[
            (BASE_URL_ENV, "scanner.local"),
            (TIMEOUT_ENV, "soon"),
        ]));

        assert_eq!(config, ScreenerConfig::default());
    }

    #[test]
    fn header_names_are_case_insensitive() {
        let config = ScreenerConfig::default()
            .with_header("X-Session", "abc")
            .without_header("Authority");

        assert_eq!(config.headers().get("x-session").map(String::as_str), Some("abc"));
        assert!(!config.headers().contains_key("authority"));
    }
}
