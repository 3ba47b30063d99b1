//! Input validation for book create/update payloads.
//!
//! # Responsibility
//! - Check untyped JSON payloads against field-presence and domain rules.
//! - Convert accepted payloads into typed `NewBook` / `BookPatch` values.
//!
//! # Invariants
//! - Validation is pure: it never touches storage.
//! - The first failing rule is reported, in the order: missing fields,
//!   title/author, published_year, genre.
//! - Unknown keys are ignored.

use crate::config::BookBuddyConfig;
use crate::model::book::{BookPatch, BookValidationError, NewBook, MUTABLE_FIELDS};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Whether all mutable fields are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Creation: every mutable field must be present.
    Full,
    /// Update: only fields present in the payload are checked.
    Partial,
}

/// Caller-side input error. Never produced by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields(Vec<&'static str>),
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },
    EmptyField(&'static str),
    InvalidYear,
    YearOutOfRange { year: i64, min: i32, max: i32 },
    InvalidGenre { allowed: Vec<String> },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            Self::InvalidFieldType { field, expected } => {
                write!(f, "{field} must be {expected}")
            }
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
            Self::InvalidYear => write!(f, "Published year must be a valid integer"),
            Self::YearOutOfRange { min, max, .. } => {
                write!(f, "Published year must be between {min} and {max}")
            }
            Self::InvalidGenre { allowed } => {
                write!(f, "Genre must be one of: {}", allowed.join(", "))
            }
        }
    }
}

impl Error for ValidationError {}

impl From<BookValidationError> for ValidationError {
    fn from(value: BookValidationError) -> Self {
        match value {
            BookValidationError::EmptyField(field) => Self::EmptyField(field),
        }
    }
}

/// Validates a create (`Full`) or update (`Partial`) payload.
pub fn validate_book_data(
    data: &Map<String, Value>,
    mode: ValidationMode,
    config: &BookBuddyConfig,
) -> Result<(), ValidationError> {
    if mode == ValidationMode::Full {
        let missing: Vec<&'static str> = MUTABLE_FIELDS
            .iter()
            .copied()
            .filter(|field| !data.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
    }

    for field in ["title", "author"] {
        if let Some(value) = data.get(field) {
            check_text_field(field, value)?;
        }
    }

    if let Some(value) = data.get("published_year") {
        check_year(value, config)?;
    }

    if let Some(value) = data.get("genre") {
        check_genre(value, config)?;
    }

    Ok(())
}

/// Validates a full payload and converts it into an insertable record.
pub fn parse_new_book(
    data: &Map<String, Value>,
    config: &BookBuddyConfig,
) -> Result<NewBook, ValidationError> {
    validate_book_data(data, ValidationMode::Full, config)?;

    let book = NewBook::new(
        text_field(data, "title").unwrap_or_default(),
        text_field(data, "author").unwrap_or_default(),
        year_field(data, config)?.unwrap_or_default(),
        text_field(data, "genre").unwrap_or_default(),
    )?;
    Ok(book)
}

/// Validates a partial payload and keeps only the mutable fields it sets.
///
/// The returned patch may be empty when the payload names no mutable field;
/// the store reports that case.
pub fn parse_book_patch(
    data: &Map<String, Value>,
    config: &BookBuddyConfig,
) -> Result<BookPatch, ValidationError> {
    validate_book_data(data, ValidationMode::Partial, config)?;

    Ok(BookPatch {
        title: text_field(data, "title"),
        author: text_field(data, "author"),
        published_year: year_field(data, config)?,
        genre: text_field(data, "genre"),
    })
}

fn check_text_field(field: &'static str, value: &Value) -> Result<(), ValidationError> {
    let text = value.as_str().ok_or(ValidationError::InvalidFieldType {
        field,
        expected: "a string",
    })?;
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

fn check_year(value: &Value, config: &BookBuddyConfig) -> Result<i32, ValidationError> {
    let year = parse_year(value).ok_or(ValidationError::InvalidYear)?;
    if !config.is_year_in_range(year) {
        return Err(ValidationError::YearOutOfRange {
            year,
            min: config.min_year,
            max: config.max_year,
        });
    }
    i32::try_from(year).map_err(|_| ValidationError::InvalidYear)
}

/// Accepts JSON integers and strings holding an integer.
fn parse_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn check_genre(value: &Value, config: &BookBuddyConfig) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(genre) if config.is_valid_genre(genre) => Ok(()),
        _ => Err(ValidationError::InvalidGenre {
            allowed: config.valid_genres.iter().cloned().collect(),
        }),
    }
}

fn text_field(data: &Map<String, Value>, field: &str) -> Option<String> {
    data.get(field).and_then(Value::as_str).map(str::to_string)
}

fn year_field(
    data: &Map<String, Value>,
    config: &BookBuddyConfig,
) -> Result<Option<i32>, ValidationError> {
    data.get("published_year")
        .map(|value| check_year(value, config))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::{
        parse_book_patch, parse_new_book, validate_book_data, ValidationError, ValidationMode,
    };
    use crate::config::BookBuddyConfig;
    use serde_json::{json, Map, Value};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn valid_book() -> Map<String, Value> {
        object(json!({
            "title": "A",
            "author": "B",
            "published_year": 2020,
            "genre": "Fiction"
        }))
    }

    #[test]
    fn full_validation_accepts_complete_payload() {
        let config = BookBuddyConfig::default();
        assert_eq!(
            validate_book_data(&valid_book(), ValidationMode::Full, &config),
            Ok(())
        );
    }

    #[test]
    fn full_validation_lists_missing_fields_in_column_order() {
        let config = BookBuddyConfig::default();
        let data = object(json!({ "author": "B", "published_year": 2020 }));

        let err = validate_book_data(&data, ValidationMode::Full, &config).unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["title", "genre"]));
        assert_eq!(err.to_string(), "Missing required fields: title, genre");
    }

    #[test]
    fn partial_validation_skips_presence_check() {
        let config = BookBuddyConfig::default();
        let data = object(json!({ "title": "Only title" }));
        assert_eq!(
            validate_book_data(&data, ValidationMode::Partial, &config),
            Ok(())
        );
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let config = BookBuddyConfig::default();
        for year in [config.min_year, config.max_year] {
            let data = object(json!({ "published_year": year }));
            assert_eq!(
                validate_book_data(&data, ValidationMode::Partial, &config),
                Ok(())
            );
        }
    }

    #[test]
    fn year_outside_bounds_is_rejected() {
        let config = BookBuddyConfig::default();
        for year in [999, 2026, 3000, -5] {
            let data = object(json!({ "published_year": year }));
            let err = validate_book_data(&data, ValidationMode::Partial, &config).unwrap_err();
            assert!(
                matches!(err, ValidationError::YearOutOfRange { year: got, .. } if got == i64::from(year)),
                "year {year} should be out of range, got {err:?}"
            );
        }
    }

    #[test]
    fn year_accepts_integer_strings_and_rejects_other_shapes() {
        let config = BookBuddyConfig::default();
        let data = object(json!({ "published_year": " 1999 " }));
        assert_eq!(
            validate_book_data(&data, ValidationMode::Partial, &config),
            Ok(())
        );

        for bad in [json!("nineteen"), json!(1999.5), json!(true), json!(null)] {
            let data = object(json!({ "published_year": bad }));
            assert_eq!(
                validate_book_data(&data, ValidationMode::Partial, &config),
                Err(ValidationError::InvalidYear)
            );
        }
    }

    #[test]
    fn unknown_genre_lists_allowed_set() {
        let config = BookBuddyConfig::default();
        let data = object(json!({ "genre": "Horror" }));

        let err = validate_book_data(&data, ValidationMode::Partial, &config).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Genre must be one of: "));
        for genre in &config.valid_genres {
            assert!(message.contains(genre.as_str()));
        }
    }

    #[test]
    fn blank_title_or_author_is_rejected() {
        let config = BookBuddyConfig::default();
        let mut data = valid_book();
        data.insert("author".to_string(), json!("   "));

        assert_eq!(
            validate_book_data(&data, ValidationMode::Full, &config),
            Err(ValidationError::EmptyField("author"))
        );
    }

    #[test]
    fn non_string_title_is_rejected() {
        let config = BookBuddyConfig::default();
        let data = object(json!({ "title": 42 }));
        assert_eq!(
            validate_book_data(&data, ValidationMode::Partial, &config),
            Err(ValidationError::InvalidFieldType {
                field: "title",
                expected: "a string"
            })
        );
    }

    #[test]
    fn parse_new_book_converts_string_year() {
        let config = BookBuddyConfig::default();
        let mut data = valid_book();
        data.insert("published_year".to_string(), json!("2001"));
        data.insert("isbn".to_string(), json!("ignored"));

        let book = parse_new_book(&data, &config).unwrap();
        assert_eq!(book.published_year, 2001);
        assert_eq!(book.title, "A");
    }

    #[test]
    fn parse_patch_drops_unknown_keys() {
        let config = BookBuddyConfig::default();
        let data = object(json!({ "isbn": "123", "pages": 300 }));

        let patch = parse_book_patch(&data, &config).unwrap();
        assert!(patch.is_empty());
    }
}
