//! Startup configuration read once from the environment.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::LevelFilter;

use crate::adapter::ServerConfig;
use crate::logging::parse_level;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Seed of the first deal.
    pub seed: u32,
    /// Whether the TCP control adapter is started.
    pub ai_enabled: bool,
    pub server: ServerConfig,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// A malformed `MAHJONG_SEED` is an error; other variables fall back to
    /// their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let seed = match get("MAHJONG_SEED") {
            Some(s) => s
                .trim()
                .parse()
                .with_context(|| format!("MAHJONG_SEED must be a u32, got {:?}", s))?,
            None => clock_seed(),
        };
        let ai_enabled = get("MAHJONG_AI")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes"))
            .unwrap_or(false);
        let log_level = parse_level(get("MAHJONG_LOG").as_deref());
        let log_file = get("MAHJONG_LOG_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("mahjong.log"));

        Ok(Self {
            seed,
            ai_enabled,
            server: ServerConfig::from_lookup(&get),
            log_level,
            log_file,
        })
    }
}

/// Seed from the wall clock, never zero.
fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1);
    nanos.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |k: &str| map.get(k).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.seed != 0);
        assert!(!config.ai_enabled);
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert_eq!(config.log_file, PathBuf::from("mahjong.log"));
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MAHJONG_SEED", "42"),
            ("MAHJONG_AI", "true"),
            ("MAHJONG_AI_PORT", "9100"),
            ("MAHJONG_LOG", "debug"),
            ("MAHJONG_LOG_FILE", "/tmp/m.log"),
        ]))
        .unwrap();
        assert_eq!(config.seed, 42);
        assert!(config.ai_enabled);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file, PathBuf::from("/tmp/m.log"));
    }

    #[test]
    fn test_bad_seed_is_an_error() {
        assert!(AppConfig::from_lookup(lookup(&[("MAHJONG_SEED", "abc")])).is_err());
    }
}
