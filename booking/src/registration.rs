//! Free event registration form.
//!
//! Standalone single-step form: no login, no payment. Phone input here
//! only caps at 10 digits, without the leading-digit restriction the
//! booking login applies. Submission validates the whole draft, builds
//! the wire payload with empty optionals elided, and resets the form
//! on success.

use std::sync::Arc;

use yagam_core::effect::Effect;
use yagam_core::reducer::Reducer;

use crate::draft::RegistrationDraft;
use crate::schema::{FieldError, validate_registration};
use crate::services::{RegistrationPayload, RegistrationService, wire_members};
use crate::types::{Gender, Notice};

/// Dependencies of the registration form
#[derive(Clone)]
pub struct RegistrationEnvironment {
    /// Registration submission
    pub service: Arc<dyn RegistrationService>,
}

/// Registration form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationState {
    /// The draft under edit
    pub draft: RegistrationDraft,
    /// Currently displayed validation errors
    pub errors: Vec<FieldError>,
    /// Submit request in flight
    pub submitting: bool,
    /// The last submission went through
    pub submitted: bool,
    /// Last user-facing notice
    pub notice: Option<Notice>,
}

impl RegistrationState {
    /// Whether a field currently has an error
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Registration form inputs and service results
#[derive(Debug, Clone)]
pub enum RegistrationAction {
    /// Full name edited
    FullNameChanged(String),
    /// Phone input keystroke
    PhoneChanged(String),
    /// Age edited, `None` clears it
    AgeChanged(Option<u32>),
    /// Gender chosen
    GenderChanged(Gender),
    /// Address line 1 edited
    AddressLine1Changed(String),
    /// City edited
    CityChanged(String),
    /// State edited
    StateChanged(String),
    /// Pin code edited
    PinCodeChanged(String),
    /// Party size selector changed
    NumberOfPeopleChanged(u32),
    /// Member name edited
    MemberNameChanged {
        /// Member index
        index: usize,
        /// New value
        value: String,
    },
    /// Member age edited
    MemberAgeChanged {
        /// Member index
        index: usize,
        /// New value, `None` clears it
        value: Option<u32>,
    },
    /// Member gender chosen
    MemberGenderChanged {
        /// Member index
        index: usize,
        /// New value
        value: Gender,
    },
    /// An event date was selected
    DateAdded(String),
    /// An event date was deselected
    DateRemoved(String),
    /// A slot was toggled on a date
    SlotToggled {
        /// The date the slot belongs to
        date: String,
        /// Slot id, `"<start>-<end>"`
        slot_id: String,
    },
    /// Submit button
    SubmitTapped,
    /// The registration went through
    SubmitSucceeded,
    /// The registration failed
    SubmitFailed {
        /// User-facing message, empty for generic handling
        message: String,
    },
}

/// Reducer for the registration form
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationReducer;

/// Build the wire payload from a validated draft
///
/// Empty optionals (age, address, members) are omitted rather than
/// sent as blanks.
fn registration_payload(draft: &RegistrationDraft) -> RegistrationPayload {
    let address = draft.address.combined();
    RegistrationPayload {
        full_name: draft.full_name.trim().to_string(),
        phone_number: draft.phone_number.clone(),
        age: draft.age,
        gender: draft
            .gender
            .map_or_else(String::new, |g| g.as_str().to_string()),
        preferred_date: draft.selection.dates.clone(),
        preferred_time_slot: draft.selection.slots.clone(),
        number_of_people: draft.number_of_people,
        address_text: if address.is_empty() {
            None
        } else {
            Some(address)
        },
        members: if draft.members.is_empty() {
            None
        } else {
            Some(wire_members(&draft.members))
        },
    }
}

impl Reducer for RegistrationReducer {
    type State = RegistrationState;
    type Action = RegistrationAction;
    type Environment = RegistrationEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Vec<Effect<Self::Action>> {
        match action {
            RegistrationAction::FullNameChanged(value) => state.draft.full_name = value,
            RegistrationAction::PhoneChanged(input) => {
                state.draft.phone_number = input
                    .chars()
                    .filter(char::is_ascii_digit)
                    .take(10)
                    .collect();
            },
            RegistrationAction::AgeChanged(value) => state.draft.age = value,
            RegistrationAction::GenderChanged(value) => state.draft.gender = Some(value),
            RegistrationAction::AddressLine1Changed(value) => state.draft.address.line1 = value,
            RegistrationAction::CityChanged(value) => state.draft.address.city = value,
            RegistrationAction::StateChanged(value) => state.draft.address.state = value,
            RegistrationAction::PinCodeChanged(value) => state.draft.address.pin_code = value,
            RegistrationAction::NumberOfPeopleChanged(value) => {
                state.draft.set_number_of_people(value);
            },
            RegistrationAction::MemberNameChanged { index, value } => {
                if let Some(member) = state.draft.members.get_mut(index) {
                    member.name = value;
                }
            },
            RegistrationAction::MemberAgeChanged { index, value } => {
                if let Some(member) = state.draft.members.get_mut(index) {
                    member.age = value;
                }
            },
            RegistrationAction::MemberGenderChanged { index, value } => {
                if let Some(member) = state.draft.members.get_mut(index) {
                    member.gender = Some(value);
                }
            },
            RegistrationAction::DateAdded(date) => state.draft.selection.add_date(&date),
            RegistrationAction::DateRemoved(date) => state.draft.selection.remove_date(&date),
            RegistrationAction::SlotToggled { date, slot_id } => {
                state.draft.selection.toggle_slot(&date, &slot_id);
            },

            RegistrationAction::SubmitTapped => {
                if state.submitting {
                    return vec![];
                }
                let errors = validate_registration(&state.draft);
                if !errors.is_empty() {
                    state.errors = errors;
                    return vec![];
                }
                state.errors.clear();
                state.submitting = true;
                let service = Arc::clone(&env.service);
                let payload = registration_payload(&state.draft);
                return vec![Effect::Future(Box::pin(async move {
                    match service.register(payload).await {
                        Ok(()) => Some(RegistrationAction::SubmitSucceeded),
                        Err(error) => Some(RegistrationAction::SubmitFailed {
                            message: error.server_message().unwrap_or_default().to_string(),
                        }),
                    }
                }))];
            },

            RegistrationAction::SubmitSucceeded => {
                state.submitting = false;
                state.submitted = true;
                state.draft = RegistrationDraft::default();
                state.notice = Some(Notice::info(
                    "Registration Successful!",
                    "We look forward to seeing you at the event",
                ));
            },

            RegistrationAction::SubmitFailed { message } => {
                state.submitting = false;
                let description = if message.is_empty() {
                    "Registration failed. Please try again.".to_string()
                } else {
                    message
                };
                state.notice = Some(Notice::error("Registration Failed", &description));
            },
        }

        vec![]
    }
}
