//! Run configuration and its validation.
//!
//! Values arrive from several layers (flags, environment, config file) as
//! loosely-typed strings. [`RawConfig::validate`] turns them into a
//! [`SyncConfig`] without touching the network.

use serde::Deserialize;
use thiserror::Error;

/// Number of years generated when none is configured.
pub const DEFAULT_YEARS: u32 = 2;

/// Problems found while validating a [`RawConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required arguments: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for years: '{0}' (expected a non-negative integer)")]
    InvalidYears(String),

    #[error("Could not load config file: {0}")]
    File(String),
}

/// Unvalidated settings as collected from one configuration source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    pub contacts_url: Option<String>,
    pub calendar_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub years: Option<String>,
    pub show_skipped: Option<String>,
    pub dry_run: Option<String>,
}

/// Validated settings for one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub contacts_url: String,
    pub calendar_url: String,
    pub user: String,
    pub password: String,
    pub years: u32,
    pub show_skipped: bool,
    pub dry_run: bool,
}

impl RawConfig {
    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: RawConfig) -> RawConfig {
        RawConfig {
            contacts_url: self.contacts_url.or(fallback.contacts_url),
            calendar_url: self.calendar_url.or(fallback.calendar_url),
            user: self.user.or(fallback.user),
            password: self.password.or(fallback.password),
            years: self.years.or(fallback.years),
            show_skipped: self.show_skipped.or(fallback.show_skipped),
            dry_run: self.dry_run.or(fallback.dry_run),
        }
    }

    /// Check required fields and parse the typed ones.
    ///
    /// Every missing required field is listed, not just the first. Empty
    /// strings count as missing.
    pub fn validate(self) -> Result<SyncConfig, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let contacts_url = require(self.contacts_url, "contacts_url");
        let calendar_url = require(self.calendar_url, "calendar_url");
        let user = require(self.user, "user");
        let password = require(self.password, "password");

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let years = match self.years.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_YEARS,
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidYears(value.to_string()))?,
        };

        Ok(SyncConfig {
            contacts_url,
            calendar_url,
            user,
            password,
            years,
            show_skipped: flag_enabled(self.show_skipped.as_deref()),
            dry_run: flag_enabled(self.dry_run.as_deref()),
        })
    }
}

/// Boolean-like string flags are on only for a case-insensitive "true".
pub fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RawConfig {
        RawConfig {
            contacts_url: Some("https://dav.example.com/contacts/".into()),
            calendar_url: Some("https://dav.example.com/birthdays/".into()),
            user: Some("alice".into()),
            password: Some("secret".into()),
            ..RawConfig::default()
        }
    }

    #[test]
    fn test_validate_lists_every_missing_field() {
        let raw = RawConfig {
            calendar_url: Some("https://dav.example.com/birthdays/".into()),
            user: Some("".into()),
            ..RawConfig::default()
        };

        let err = raw.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec!["contacts_url", "user", "password"])
        );
        assert_eq!(
            err.to_string(),
            "Missing required arguments: contacts_url, user, password"
        );
    }

    #[test]
    fn test_validate_defaults() {
        let config = complete().validate().unwrap();
        assert_eq!(config.years, DEFAULT_YEARS);
        assert!(!config.show_skipped);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_validate_rejects_bad_years() {
        let raw = RawConfig {
            years: Some("-1".into()),
            ..complete()
        };
        assert_eq!(
            raw.validate().unwrap_err(),
            ConfigError::InvalidYears("-1".into())
        );
    }

    #[test]
    fn test_flags_only_accept_true() {
        assert!(flag_enabled(Some("true")));
        assert!(flag_enabled(Some("TRUE")));
        assert!(flag_enabled(Some("True ")));
        assert!(!flag_enabled(Some("yes")));
        assert!(!flag_enabled(Some("1")));
        assert!(!flag_enabled(None));
    }

    #[test]
    fn test_or_prefers_self() {
        let cli = RawConfig {
            years: Some("5".into()),
            ..RawConfig::default()
        };
        let file = RawConfig {
            years: Some("3".into()),
            dry_run: Some("true".into()),
            ..complete()
        };

        let config = cli.or(file).validate().unwrap();
        assert_eq!(config.years, 5);
        assert!(config.dry_run);
        assert_eq!(config.user, "alice");
    }
}
