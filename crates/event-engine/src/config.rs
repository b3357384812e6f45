//! Configuration with environment variable overrides.

use std::env;

use chrono_tz::Tz;
use tracing::warn;

/// Environment variable overriding the default timezone.
pub const DEFAULT_TIMEZONE_ENV: &str = "EVENT_ENGINE_DEFAULT_TZ";

/// Timezone used when a request does not name one.
pub const DEFAULT_TIMEZONE: Tz = Tz::UTC;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Timezone applied to requests with a missing or empty timezone.
    pub default_timezone: Tz,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl Config {
    /// Load from environment variables, keeping defaults for anything unset
    /// or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var(DEFAULT_TIMEZONE_ENV) {
            config.apply_default_timezone(&val);
        }

        config
    }

    /// Set the default timezone from an IANA name. Blank values are ignored,
    /// invalid ones are logged and ignored.
    pub fn apply_default_timezone(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        match name.parse::<Tz>() {
            Ok(tz) => self.default_timezone = tz,
            Err(_) => warn!(
                timezone = name,
                fallback = self.default_timezone.name(),
                "ignoring invalid default timezone"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(Config::default().default_timezone, Tz::UTC);
    }

    #[test]
    fn test_apply_default_timezone() {
        let mut config = Config::default();
        config.apply_default_timezone("Europe/Moscow");
        assert_eq!(config.default_timezone, Tz::Europe__Moscow);

        config.apply_default_timezone("Mars/Olympus_Mons");
        assert_eq!(config.default_timezone, Tz::Europe__Moscow);

        config.apply_default_timezone("  ");
        assert_eq!(config.default_timezone, Tz::Europe__Moscow);
    }

    #[test]
    fn test_env_override() {
        env::set_var(DEFAULT_TIMEZONE_ENV, "Asia/Tokyo");
        let config = Config::from_env();
        env::remove_var(DEFAULT_TIMEZONE_ENV);
        assert_eq!(config.default_timezone, Tz::Asia__Tokyo);
    }
}
