//! Small validated value types shared by the clinic crates.
//!
//! Each type checks its invariant once at construction, so code holding a value can rely on it
//! without re-validating.

use chrono::NaiveTime;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input was not a 24-hour `HH:mm` wall-clock time
    #[error("expected HH:mm wall-clock time, got '{0}'")]
    InvalidTime(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A 24-hour wall-clock time of day in `HH:mm` form, e.g. `09:00` or `17:30`.
///
/// Availability windows are stored as the original strings; this type is used to check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WallClockTime(NaiveTime);

impl WallClockTime {
    /// Parses an `HH:mm` string. Seconds, AM/PM suffixes and surrounding whitespace are rejected.
    pub fn parse(input: &str) -> Result<Self, TextError> {
        // chrono accepts single-digit hours for %H, the stored format is always two digits
        if input.len() != 5 {
            return Err(TextError::InvalidTime(input.to_owned()));
        }
        NaiveTime::parse_from_str(input, "%H:%M")
            .map(Self)
            .map_err(|_| TextError::InvalidTime(input.to_owned()))
    }
}

impl std::fmt::Display for WallClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  alice ").unwrap();
        assert_eq!(text.as_str(), "alice");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn non_empty_text_deserialize_rejects_empty() {
        let err = serde_json::from_str::<NonEmptyText>("\"\"").unwrap_err();
        assert!(err.to_string().contains("Text cannot be empty"));
    }

    #[test]
    fn wall_clock_time_accepts_hh_mm() {
        let t = WallClockTime::parse("09:05").unwrap();
        assert_eq!(t.to_string(), "09:05");
        assert!(WallClockTime::parse("17:00").unwrap() > t);
    }

    #[test]
    fn wall_clock_time_rejects_other_shapes() {
        for bad in ["9:00", "09:00:00", "24:00", "12:60", "noon", ""] {
            assert!(
                matches!(WallClockTime::parse(bad), Err(TextError::InvalidTime(_))),
                "{bad} should be rejected"
            );
        }
    }
}
