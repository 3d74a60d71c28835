//! Input validation utilities.
//!
//! Checks applied to request bodies after they have been deserialised and before they reach
//! the store. Structural problems (missing fields, wrong JSON types, unknown enum values) are
//! already rejected by deserialisation; these functions cover value-level rules.
//!
//! Deliberately absent: double-booking detection, booking outside declared availability, and
//! ordering of `startTime`/`endTime`.

use crate::constants::MAX_DAY_OF_WEEK;
use crate::models::{NewAvailability, NewUser};
use crate::{ClinicError, ClinicResult};
use clinic_types::{NonEmptyText, WallClockTime};

/// Validates a user about to be stored.
///
/// # Errors
///
/// Returns `ClinicError::InvalidInput` if the username, name or email is blank, or the
/// password is empty.
pub fn validate_new_user(new: &NewUser) -> ClinicResult<()> {
    for (field, value) in [
        ("username", &new.username),
        ("name", &new.name),
        ("email", &new.email),
    ] {
        NonEmptyText::new(value)
            .map_err(|_| ClinicError::InvalidInput(format!("{field} cannot be empty")))?;
    }

    if new.password.is_empty() {
        return Err(ClinicError::InvalidInput("password cannot be empty".into()));
    }

    Ok(())
}

/// Validates an availability window.
///
/// # Errors
///
/// Returns `ClinicError::InvalidInput` if `dayOfWeek` is outside `0..=6` or either time is not
/// an `HH:mm` wall-clock time.
pub fn validate_new_availability(new: &NewAvailability) -> ClinicResult<()> {
    if new.day_of_week > MAX_DAY_OF_WEEK {
        return Err(ClinicError::InvalidInput(format!(
            "dayOfWeek must be between 0 and {MAX_DAY_OF_WEEK}, got {}",
            new.day_of_week
        )));
    }

    WallClockTime::parse(&new.start_time)?;
    WallClockTime::parse(&new.end_time)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user() -> NewUser {
        NewUser {
            username: "alice".into(),
            password: "pw".into(),
            email: "alice@example.com".into(),
            role: Role::Patient,
            name: "Alice".into(),
            phone: None,
            specialization: None,
            medical_history: None,
        }
    }

    fn window(day: u8, start: &str, end: &str) -> NewAvailability {
        NewAvailability {
            doctor_id: Some(1),
            day_of_week: day,
            start_time: start.into(),
            end_time: end.into(),
            is_available: None,
        }
    }

    #[test]
    fn accepts_complete_user() {
        validate_new_user(&user()).expect("valid user");
    }

    #[test]
    fn rejects_blank_username() {
        let mut new = user();
        new.username = "  ".into();
        assert_eq!(
            validate_new_user(&new),
            Err(ClinicError::InvalidInput("username cannot be empty".into()))
        );
    }

    #[test]
    fn rejects_empty_password() {
        let mut new = user();
        new.password.clear();
        assert!(matches!(
            validate_new_user(&new),
            Err(ClinicError::InvalidInput(_))
        ));
    }

    #[test]
    fn accepts_every_day_of_week() {
        for day in 0..=6 {
            validate_new_availability(&window(day, "09:00", "17:00")).expect("valid day");
        }
    }

    #[test]
    fn rejects_day_seven() {
        let err = validate_new_availability(&window(7, "09:00", "17:00")).unwrap_err();
        assert!(err.to_string().contains("dayOfWeek"));
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(validate_new_availability(&window(1, "9am", "17:00")).is_err());
        assert!(validate_new_availability(&window(1, "09:00", "25:00")).is_err());
    }

    #[test]
    fn end_before_start_is_accepted() {
        validate_new_availability(&window(1, "17:00", "09:00")).expect("ordering is not checked");
    }
}
