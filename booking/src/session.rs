//! Verified session identity and phone-number helpers.
//!
//! Phone numbers live in two shapes: the 10-digit local form used by
//! the forms, and the `+91`-prefixed form sent to the identity service.

/// Country calling code prefix used on the wire
pub const COUNTRY_CODE: &str = "+91";

/// The identity established by OTP verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Verified phone in 10-digit local form
    pub phone_number: String,
    /// Backend user id
    pub user_id: String,
}

/// Local 10-digit mobile check: digits only, first digit 6 to 9
#[must_use]
pub fn is_valid_mobile(phone: &str) -> bool {
    phone.len() == 10
        && phone.chars().all(|c| c.is_ascii_digit())
        && phone.starts_with(['6', '7', '8', '9'])
}

/// Prefix the country code for wire payloads
#[must_use]
pub fn with_country_code(phone: &str) -> String {
    format!("{COUNTRY_CODE}{phone}")
}

/// Strip the country code from a wire phone number, if present
#[must_use]
pub fn strip_country_code(phone: &str) -> String {
    phone
        .strip_prefix(COUNTRY_CODE)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(phone)
        .to_string()
}

/// Sanitize a raw phone input keystroke
///
/// Keeps digits only, rejects input whose first digit is outside 6 to
/// 9 (the previous value is kept), and caps at 10 digits.
#[must_use]
pub fn sanitize_mobile_input(previous: &str, input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    if !digits.starts_with(['6', '7', '8', '9']) {
        return previous.to_string();
    }
    digits.chars().take(10).collect()
}
