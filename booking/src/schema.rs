//! Validation rules for the booking and registration drafts.
//!
//! Validation is pure: the same draft always yields the same error
//! list, and validating never mutates the draft.

use crate::draft::{BookingDraft, RegistrationDraft};
use crate::session::is_valid_mobile;
use crate::types::Member;

/// A single validation failure, addressed by field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, e.g. `fullName` or `members.2.idName`
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: &str) -> Self {
        Self {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

/// Maximum number of additional members
const MAX_MEMBERS: usize = 10;

fn validate_age(age: Option<u32>, field: &str, errors: &mut Vec<FieldError>) {
    if let Some(age) = age {
        if age < 1 {
            errors.push(FieldError::new(field, "Age must be at least 1."));
        } else if age > 150 {
            errors.push(FieldError::new(field, "Age must be less than 150."));
        }
    }
}

fn validate_members(members: &[Member], min_name_len: usize, name_message: &str, errors: &mut Vec<FieldError>) {
    if members.len() > MAX_MEMBERS {
        errors.push(FieldError::new(
            "members",
            "You can only add up to 10 members.",
        ));
    }
    for (index, member) in members.iter().enumerate() {
        if member.name.trim().len() < min_name_len {
            errors.push(FieldError::new(
                format!("members.{index}.idName"),
                name_message,
            ));
        }
        validate_age(member.age, &format!("members.{index}.idAge"), errors);
        if member.gender.is_none() {
            errors.push(FieldError::new(
                format!("members.{index}.idGender"),
                "Gender is required.",
            ));
        }
    }
}

fn missing_slot_error(missing: &[String]) -> FieldError {
    FieldError::new(
        "preferredTimeSlot",
        &format!("Please select time slots for: {}", missing.join(", ")),
    )
}

/// Validate the Rudraksha booking draft
///
/// Returns an empty list when the draft may be submitted.
#[must_use]
pub fn validate_booking(draft: &BookingDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.full_name.trim().len() < 2 {
        errors.push(FieldError::new("fullName", "Name is required"));
    }
    if !is_valid_mobile(&draft.phone_number) {
        errors.push(FieldError::new(
            "phoneNumber",
            "Invalid 10-digit phone number.",
        ));
    }
    validate_age(draft.age, "age", &mut errors);
    if draft.gender.is_none() {
        errors.push(FieldError::new("gender", "Gender is required."));
    }

    if draft.quantity < 1 {
        errors.push(FieldError::new(
            "rudrakshaQuantity",
            "Quantity must be at least 1.",
        ));
    } else if draft.quantity > 10 {
        errors.push(FieldError::new(
            "rudrakshaQuantity",
            "Maximum quantity is 10.",
        ));
    }

    validate_members(&draft.members, 2, "Name is required.", &mut errors);

    if draft.participating {
        if draft.selection.dates.is_empty() {
            errors.push(FieldError::new(
                "preferredDate",
                "Please select at least one preferred date.",
            ));
        } else {
            let missing = draft.selection.missing_slot_dates();
            if !missing.is_empty() {
                errors.push(missing_slot_error(&missing));
            }
        }
    }

    if !draft.address.has_content() || draft.address.combined().len() < 5 {
        errors.push(FieldError::new(
            "addressText",
            "Please provide a complete address (at least 5 characters).",
        ));
    }

    errors
}

/// Validate the free registration draft
///
/// The phone rule here is weaker than the booking one: only presence
/// and a 10-digit cap are checked, with no leading-digit pattern. The
/// two forms shipped with different strictness and the asymmetry is
/// kept.
#[must_use]
pub fn validate_registration(draft: &RegistrationDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.full_name.trim().is_empty() {
        errors.push(FieldError::new("fullName", "Name is required."));
    }
    if draft.phone_number.is_empty() {
        errors.push(FieldError::new("phoneNumber", "Phone number is required."));
    } else if draft.phone_number.len() > 10 {
        errors.push(FieldError::new(
            "phoneNumber",
            "Phone number cannot exceed 10 digits.",
        ));
    }
    validate_age(draft.age, "age", &mut errors);
    if draft.gender.is_none() {
        errors.push(FieldError::new("gender", "Gender is required."));
    }

    if draft.selection.dates.is_empty() {
        errors.push(FieldError::new(
            "preferredDate",
            "Please select at least one preferred date.",
        ));
    } else {
        let missing = draft.selection.missing_slot_dates();
        if !missing.is_empty() {
            errors.push(missing_slot_error(&missing));
        }
    }

    validate_members(&draft.members, 2, "Member name is required.", &mut errors);

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;

    fn valid_booking() -> BookingDraft {
        let mut draft = BookingDraft::for_phone("9876543210");
        draft.full_name = "Asha Iyer".to_string();
        draft.gender = Some(Gender::Female);
        draft.address.line1 = "12 Temple Road".to_string();
        draft.address.city = "Chennai".to_string();
        draft
    }

    #[test]
    fn valid_booking_passes() {
        assert!(validate_booking(&valid_booking()).is_empty());
    }

    #[test]
    fn booking_rejects_bad_phone() {
        let mut draft = valid_booking();
        draft.phone_number = "5876543210".to_string();
        let errors = validate_booking(&draft);
        assert!(errors.iter().any(|e| e.field == "phoneNumber"));
    }

    #[test]
    fn booking_quantity_bounds() {
        let mut draft = valid_booking();
        draft.quantity = 0;
        assert!(
            validate_booking(&draft)
                .iter()
                .any(|e| e.message == "Quantity must be at least 1.")
        );
        draft.quantity = 11;
        assert!(
            validate_booking(&draft)
                .iter()
                .any(|e| e.message == "Maximum quantity is 10.")
        );
    }

    #[test]
    fn missing_slot_dates_are_named_in_the_error() {
        let mut draft = valid_booking();
        draft.set_participating(true);
        draft.selection.add_date("2026-02-15");
        draft.selection.add_date("2026-02-16");
        draft.selection.toggle_slot("2026-02-15", "06:00:00-08:00:00");

        let errors = validate_booking(&draft);
        let slot_error = errors
            .iter()
            .find(|e| e.field == "preferredTimeSlot")
            .map(|e| e.message.clone());
        assert_eq!(
            slot_error.as_deref(),
            Some("Please select time slots for: 2026-02-16")
        );
    }

    #[test]
    fn non_participating_booking_skips_date_rules() {
        let draft = valid_booking();
        assert!(!draft.participating);
        assert!(
            !validate_booking(&draft)
                .iter()
                .any(|e| e.field == "preferredDate")
        );
    }

    #[test]
    fn address_must_be_non_trivial() {
        let mut draft = valid_booking();
        draft.address = crate::draft::Address::default();
        assert!(
            validate_booking(&draft)
                .iter()
                .any(|e| e.field == "addressText")
        );

        draft.address.line1 = "abc".to_string();
        assert!(
            validate_booking(&draft)
                .iter()
                .any(|e| e.field == "addressText")
        );

        draft.address.line1 = "12 Temple Road".to_string();
        assert!(
            !validate_booking(&draft)
                .iter()
                .any(|e| e.field == "addressText")
        );
    }

    #[test]
    fn registration_phone_skips_pattern_check() {
        let mut draft = RegistrationDraft {
            full_name: "Asha".to_string(),
            phone_number: "1234".to_string(),
            gender: Some(Gender::Female),
            ..RegistrationDraft::default()
        };
        draft.selection.add_date("2026-02-15");
        draft.selection.toggle_slot("2026-02-15", "06:00:00-08:00:00");

        assert!(validate_registration(&draft).is_empty());
    }

    #[test]
    fn registration_requires_a_date() {
        let draft = RegistrationDraft {
            full_name: "Asha".to_string(),
            phone_number: "9876543210".to_string(),
            gender: Some(Gender::Female),
            ..RegistrationDraft::default()
        };
        assert!(
            validate_registration(&draft)
                .iter()
                .any(|e| e.field == "preferredDate")
        );
    }

    #[test]
    fn member_errors_are_indexed() {
        let mut draft = valid_booking();
        draft.set_participating(true);
        draft.selection.add_date("2026-02-15");
        draft.selection.toggle_slot("2026-02-15", "06:00:00-08:00:00");
        draft.set_number_of_people(2);

        let errors = validate_booking(&draft);
        assert!(errors.iter().any(|e| e.field == "members.0.idName"));
        assert!(errors.iter().any(|e| e.field == "members.0.idGender"));
    }

    #[test]
    fn validation_is_idempotent() {
        let mut draft = valid_booking();
        draft.full_name = String::new();
        let first = validate_booking(&draft);
        let second = validate_booking(&draft);
        assert_eq!(first, second);
    }
}
