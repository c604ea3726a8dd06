//! Server settings from environment variables.
//!
//! `HOST`, `PORT`, `MATCH_LOG_DIR` (CSV match log; disabled when unset) and
//! `INACTIVITY_HOURS` (tournaments untouched this long are dropped).

use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub match_log_dir: Option<PathBuf>,
    pub inactivity_timeout: Duration,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_hours() -> u64 {
    12
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            match_log_dir: None,
            inactivity_timeout: Duration::from_secs(default_inactivity_hours() * 3600),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to the default (with a warning).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(default_host);
        let port = parse_or("PORT", lookup("PORT"), default_port());
        let hours = parse_or("INACTIVITY_HOURS", lookup("INACTIVITY_HOURS"), default_inactivity_hours());
        let match_log_dir = lookup("MATCH_LOG_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);
        Self {
            host,
            port,
            match_log_dir,
            inactivity_timeout: Duration::from_secs(hours * 3600),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", key, v);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
    }

    #[test]
    fn reads_all_variables() {
        let s = Settings::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("MATCH_LOG_DIR", "/tmp/courts"),
            ("INACTIVITY_HOURS", "2"),
        ]));
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.port, 9000);
        assert_eq!(s.match_log_dir, Some(PathBuf::from("/tmp/courts")));
        assert_eq!(s.inactivity_timeout, Duration::from_secs(7200));
    }

    #[test]
    fn bad_port_falls_back() {
        let s = Settings::from_lookup(lookup(&[("PORT", "eighty")]));
        assert_eq!(s.port, 8080);
    }
}
