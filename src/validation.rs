use crate::vr::{StructuralRule, ValueRepresentation};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

static AGE_REGEX: OnceLock<Regex> = OnceLock::new();
static DATE_DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();
static UID_REGEX: OnceLock<Regex> = OnceLock::new();

/// A single field value's violation of its VR grammar.
///
/// Always recoverable: the sanitization pass converts it into a report entry
/// and drops the field, it never aborts processing of the rest of the image.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("{vr} value is {length} code points long, maximum is {max}")]
    TooLong {
        vr: ValueRepresentation,
        length: usize,
        max: usize,
    },

    #[error("{vr} value {value:?} contains a disallowed character")]
    DisallowedCharacter {
        vr: ValueRepresentation,
        value: String,
    },

    #[error("AS value {value:?} is not three digits followed by D, W, M or Y")]
    MalformedAge { value: String },

    #[error("DA value {value:?} is not a YYYYMMDD calendar date")]
    InvalidDate { value: String },

    #[error("UI value {value:?} is not a dot-separated sequence of numeric components")]
    MalformedUid { value: String },
}

/// Validates a candidate value against the grammar of the given VR.
///
/// The length limit is checked first, counted in Unicode code points, so an
/// oversized value is rejected before any structural parsing. Pure function,
/// no I/O.
///
/// # Example
///
/// ```
/// use dicom_sanitization::validation::validate;
/// use dicom_sanitization::vr::ValueRepresentation;
///
/// assert!(validate(ValueRepresentation::AgeString, "015Y").is_ok());
/// assert!(validate(ValueRepresentation::AgeString, "15Y").is_err());
/// ```
pub fn validate(vr: ValueRepresentation, value: &str) -> Result<(), ValidationError> {
    validate_with_limit(vr, value, None)
}

/// Like [`validate`], with an optional field-specific length limit that can
/// only tighten the VR default, never widen it.
pub fn validate_with_limit(
    vr: ValueRepresentation,
    value: &str,
    limit: Option<usize>,
) -> Result<(), ValidationError> {
    let grammar = vr.grammar();
    let max = match limit {
        Some(limit) => limit.min(grammar.max_length),
        None => grammar.max_length,
    };

    let length = value.chars().count();
    if length > max {
        return Err(ValidationError::TooLong { vr, length, max });
    }

    match grammar.rule {
        StructuralRule::Age => check_age(value),
        StructuralRule::CodeCharacters => check_code_characters(vr, value),
        StructuralRule::CalendarDate => check_calendar_date(value),
        StructuralRule::Text => check_text(vr, value),
        StructuralRule::NumericComponents => check_numeric_components(value),
    }
}

fn check_age(value: &str) -> Result<(), ValidationError> {
    let regex = AGE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{3}[DWMY]$").unwrap());
    if !regex.is_match(value) {
        return Err(ValidationError::MalformedAge {
            value: value.into(),
        });
    }
    Ok(())
}

fn check_code_characters(vr: ValueRepresentation, value: &str) -> Result<(), ValidationError> {
    let allowed =
        |c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' ' || c == '_';
    if !value.chars().all(allowed) {
        return Err(ValidationError::DisallowedCharacter {
            vr,
            value: value.into(),
        });
    }
    Ok(())
}

fn check_calendar_date(value: &str) -> Result<(), ValidationError> {
    // empty means the date is absent, which is allowed
    if value.is_empty() {
        return Ok(());
    }

    let regex = DATE_DIGITS_REGEX.get_or_init(|| Regex::new(r"^[0-9]{8}$").unwrap());
    if !regex.is_match(value) {
        return Err(ValidationError::InvalidDate {
            value: value.into(),
        });
    }

    // all-ASCII at this point, so byte slicing cannot split a code point;
    // fixed-width slicing avoids chrono's flexible-width `%Y%m%d` parsing,
    // which would accept strings like "2021923"
    let year: i32 = value[0..4].parse().unwrap_or_default();
    let month: u32 = value[4..6].parse().unwrap_or_default();
    let day: u32 = value[6..8].parse().unwrap_or_default();

    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return Err(ValidationError::InvalidDate {
            value: value.into(),
        });
    }
    Ok(())
}

fn check_text(vr: ValueRepresentation, value: &str) -> Result<(), ValidationError> {
    // backslash is the DICOM multi-value separator and is reserved
    if value.contains('\\') {
        return Err(ValidationError::DisallowedCharacter {
            vr,
            value: value.into(),
        });
    }
    Ok(())
}

fn check_numeric_components(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }

    // components are `0` or digits without a leading zero; one trailing
    // separator after a complete component is tolerated
    let regex = UID_REGEX
        .get_or_init(|| Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))*\.?$").unwrap());
    if !regex.is_match(value) {
        return Err(ValidationError::MalformedUid {
            value: value.into(),
        });
    }
    Ok(())
}
