use std::fmt::Display;

use chrono::{Datelike, NaiveDate};

/// A date of birth as entered in a `type=date` field. Only month and day
/// matter for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDate(NaiveDate);

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("Birth date is empty")]
    Empty,
    #[error("{0} is not a valid birth date")]
    Unparsable(String),
}

impl BirthDate {
    pub fn parse(s: &str) -> Result<Self, InvalidInputError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidInputError::Empty);
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| InvalidInputError::Unparsable(s.to_string()))
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl Display for BirthDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
