//! Shared domain types for the booking and registration flows.

use serde::{Deserialize, Serialize};

/// Gender of the registrant or a party member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other / prefer not to say
    Others,
}

impl Gender {
    /// Wire representation used by the backend
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Others => "others",
        }
    }

    /// Parse the wire representation
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "others" => Some(Self::Others),
            _ => None,
        }
    }
}

/// One additional member of the event party
///
/// The registrant themselves is not a member; a party of N people has
/// N - 1 members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Member {
    /// Member's full name
    pub name: String,
    /// Member's age, optional
    pub age: Option<u32>,
    /// Member's gender, unset until chosen
    pub gender: Option<Gender>,
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational, neutral styling
    Info,
    /// Something went wrong
    Error,
}

/// A transient user-facing notice (toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Short title
    pub title: String,
    /// Longer description
    pub message: String,
}

impl Notice {
    /// Informational notice
    #[must_use]
    pub fn info(title: &str, message: &str) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    /// Error notice
    #[must_use]
    pub fn error(title: &str, message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_round_trips_through_wire_form() {
        for gender in [Gender::Male, Gender::Female, Gender::Others] {
            assert_eq!(Gender::parse(gender.as_str()), Some(gender));
        }
        assert_eq!(Gender::parse("unknown"), None);
    }
}
