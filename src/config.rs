use std::env;
use std::time::Duration;

/// Background refresh configuration.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Trailing daily bars fetched per instrument.
    pub history_days: u32,
    /// Instruments fetched concurrently during a refresh.
    pub concurrency: usize,
    /// Per-instrument fetch + compute timeout in seconds.
    pub timeout_secs: u64,
    /// Periodic refresh interval in seconds (0 = manual only).
    pub interval_secs: u64,
}

impl RefreshConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Periodic refresh interval, if enabled.
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            history_days: 90,
            concurrency: 4,
            timeout_secs: 15,
            interval_secs: 0,
        }
    }
}

/// Screening defaults.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Minimum score for a stock to pass the screen.
    pub min_score: u8,
    /// Instruments analysed on demand when nothing has been refreshed yet.
    pub seed_count: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            min_score: 70,
            seed_count: 10,
        }
    }
}

/// Self-ping configuration for hosts that idle inactive services.
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Public base URL of this service.
    pub url: String,
    /// Ping interval in seconds.
    pub interval_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Exchange suffix appended to codes for Yahoo Finance.
    pub yahoo_symbol_suffix: String,
    /// Background refresh configuration.
    pub refresh: RefreshConfig,
    /// Screening defaults.
    pub screen: ScreenConfig,
    /// Keep-alive pinger, enabled when a public URL is known.
    pub keep_alive: Option<KeepAliveConfig>,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let refresh_defaults = RefreshConfig::default();
        let screen_defaults = ScreenConfig::default();

        let keep_alive = env::var("KEEP_ALIVE_URL")
            .or_else(|_| env::var("RENDER_EXTERNAL_URL"))
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| KeepAliveConfig {
                url: url.trim_end_matches('/').to_string(),
                interval_secs: parse_var("KEEP_ALIVE_INTERVAL_SECS").unwrap_or(25 * 60),
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(10000),
            yahoo_symbol_suffix: env::var("YAHOO_SYMBOL_SUFFIX")
                .unwrap_or_else(|_| ".TW".to_string()),
            refresh: RefreshConfig {
                history_days: parse_var("HISTORY_DAYS").unwrap_or(refresh_defaults.history_days),
                concurrency: parse_var::<usize>("FETCH_CONCURRENCY")
                    .unwrap_or(refresh_defaults.concurrency)
                    .max(1),
                timeout_secs: parse_var("FETCH_TIMEOUT_SECS")
                    .unwrap_or(refresh_defaults.timeout_secs),
                interval_secs: parse_var("REFRESH_INTERVAL_SECS")
                    .unwrap_or(refresh_defaults.interval_secs),
            },
            screen: ScreenConfig {
                min_score: parse_var("MIN_SCREEN_SCORE").unwrap_or(screen_defaults.min_score),
                seed_count: parse_var("SCREEN_SEED_COUNT").unwrap_or(screen_defaults.seed_count),
            },
            keep_alive,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            yahoo_symbol_suffix: ".TW".to_string(),
            refresh: RefreshConfig::default(),
            screen: ScreenConfig::default(),
            keep_alive: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // RefreshConfig Tests
    // =========================================================================

    #[test]
    fn test_refresh_config_defaults() {
        let config = RefreshConfig::default();
        assert_eq!(config.history_days, 90);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert!(config.interval().is_none());
    }

    #[test]
    fn test_refresh_interval_enabled() {
        let config = RefreshConfig {
            interval_secs: 3600,
            ..RefreshConfig::default()
        };
        assert_eq!(config.interval(), Some(Duration::from_secs(3600)));
    }

    // =========================================================================
    // Config Tests
    // =========================================================================

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 10000);
        assert_eq!(config.yahoo_symbol_suffix, ".TW");
        assert_eq!(config.screen.min_score, 70);
        assert_eq!(config.screen.seed_count, 10);
        assert!(config.keep_alive.is_none());
    }

    #[test]
    fn test_config_clone() {
        let config = Config {
            port: 8080,
            keep_alive: Some(KeepAliveConfig {
                url: "https://screener.example.com".to_string(),
                interval_secs: 60,
            }),
            ..Config::default()
        };

        let cloned = config.clone();
        assert_eq!(cloned.port, 8080);
        assert_eq!(cloned.keep_alive.unwrap().interval_secs, 60);
    }

    #[test]
    fn test_parse_var_missing() {
        assert_eq!(parse_var::<u16>("TW_SCREENER_TEST_UNSET_VAR"), None);
    }
}
