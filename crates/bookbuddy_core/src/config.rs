//! Runtime configuration for the book catalog.
//!
//! # Responsibility
//! - Hold the database location and the domain bounds used by validation.
//! - Provide stable defaults so callers can construct a store with no setup.
//!
//! # Invariants
//! - `min_year <= max_year` for any config accepted by `validate()`.
//! - `valid_genres` is never empty for an accepted config.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "bookbuddy.db";
pub const DEFAULT_MIN_YEAR: i32 = 1000;
pub const DEFAULT_MAX_YEAR: i32 = 2025;
pub const DEFAULT_GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Mystery",
    "Sci-Fi",
    "Romance",
    "Biography",
];

/// Catalog configuration passed explicitly to validators and stores.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookBuddyConfig {
    /// SQLite database file path.
    pub db_path: PathBuf,
    /// Inclusive lower bound for `published_year`.
    pub min_year: i32,
    /// Inclusive upper bound for `published_year`.
    pub max_year: i32,
    /// Accepted genre names, matched case-sensitively.
    pub valid_genres: BTreeSet<String>,
}

impl Default for BookBuddyConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            valid_genres: DEFAULT_GENRES.iter().map(|g| (*g).to_string()).collect(),
        }
    }
}

impl BookBuddyConfig {
    /// Returns a default config pointing at `db_path`.
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON config document. Missing keys keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_year > self.max_year {
            return Err(ConfigError::InvalidYearBounds {
                min_year: self.min_year,
                max_year: self.max_year,
            });
        }
        if self.valid_genres.is_empty() {
            return Err(ConfigError::EmptyGenreSet);
        }
        Ok(())
    }

    pub fn is_valid_genre(&self, genre: &str) -> bool {
        self.valid_genres.contains(genre)
    }

    pub fn is_year_in_range(&self, year: i64) -> bool {
        (i64::from(self.min_year)..=i64::from(self.max_year)).contains(&year)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidYearBounds { min_year: i32, max_year: i32 },
    EmptyGenreSet,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::InvalidYearBounds { min_year, max_year } => write!(
                f,
                "min_year {min_year} must not be greater than max_year {max_year}"
            ),
            Self::EmptyGenreSet => write!(f, "valid_genres must not be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidYearBounds { .. } | Self::EmptyGenreSet => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BookBuddyConfig, ConfigError, DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR};
    use std::path::PathBuf;

    #[test]
    fn defaults_match_catalog_rules() {
        let config = BookBuddyConfig::default();
        assert_eq!(config.min_year, DEFAULT_MIN_YEAR);
        assert_eq!(config.max_year, DEFAULT_MAX_YEAR);
        assert!(config.is_valid_genre("Sci-Fi"));
        assert!(!config.is_valid_genre("Horror"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_config_keeps_defaults_for_missing_keys() {
        let config =
            BookBuddyConfig::from_json_str(r#"{"db_path": "/tmp/books.db", "max_year": 2030}"#)
                .expect("partial config should parse");
        assert_eq!(config.db_path, PathBuf::from("/tmp/books.db"));
        assert_eq!(config.max_year, 2030);
        assert_eq!(config.min_year, DEFAULT_MIN_YEAR);
        assert_eq!(config.valid_genres.len(), 6);
    }

    #[test]
    fn json_config_rejects_inverted_year_bounds() {
        let err = BookBuddyConfig::from_json_str(r#"{"min_year": 2000, "max_year": 1999}"#)
            .expect_err("inverted bounds must fail");
        assert!(matches!(err, ConfigError::InvalidYearBounds { .. }));
    }

    #[test]
    fn json_config_rejects_empty_genre_set() {
        let err = BookBuddyConfig::from_json_str(r#"{"valid_genres": []}"#)
            .expect_err("empty genre set must fail");
        assert!(matches!(err, ConfigError::EmptyGenreSet));
    }
}
