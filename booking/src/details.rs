//! Booking details step.
//!
//! Edits the booking draft with field-level validation as fields are
//! touched and a holistic check on submit. The phone number is
//! read-only here, sourced from the verified session, so there is no
//! action for it. Submission derives the combined address, freezes the
//! draft and leaves it for the orchestrator to pick up; no network.

use std::collections::BTreeSet;

use yagam_core::effect::Effect;
use yagam_core::reducer::Reducer;

use crate::draft::{BookingDraft, ResolvedPlace};
use crate::schema::{FieldError, validate_booking};
use crate::types::Gender;

/// Details step state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsState {
    /// The draft under edit
    pub draft: BookingDraft,
    /// Currently displayed validation errors
    pub errors: Vec<FieldError>,
    /// Fields the visitor has interacted with; eager validation only
    /// surfaces errors for these until submit
    pub touched: BTreeSet<String>,
    /// The frozen draft, set when submit passes validation
    pub submitted: Option<BookingDraft>,
}

impl DetailsState {
    /// Whether a field currently has an error
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Details step inputs
#[derive(Debug, Clone)]
pub enum DetailsAction {
    /// Full name edited
    FullNameChanged(String),
    /// Age edited, `None` clears it
    AgeChanged(Option<u32>),
    /// Gender chosen
    GenderChanged(Gender),
    /// Address line 1 edited by hand
    AddressLine1Changed(String),
    /// Address line 2 edited
    AddressLine2Changed(String),
    /// City edited
    CityChanged(String),
    /// District edited
    DistrictChanged(String),
    /// State edited
    StateChanged(String),
    /// Pin code edited
    PinCodeChanged(String),
    /// An autocomplete suggestion was selected
    PlaceResolved(ResolvedPlace),
    /// Participation checkbox toggled
    ParticipationToggled(bool),
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
    /// Rudraksha quantity edited
    QuantityChanged(u32),
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
}

/// Reducer for the details step
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailsReducer;

fn touched_field(action: &DetailsAction) -> Option<String> {
    match action {
        DetailsAction::FullNameChanged(_) => Some("fullName".to_string()),
        DetailsAction::AgeChanged(_) => Some("age".to_string()),
        DetailsAction::GenderChanged(_) => Some("gender".to_string()),
        DetailsAction::AddressLine1Changed(_)
        | DetailsAction::AddressLine2Changed(_)
        | DetailsAction::CityChanged(_)
        | DetailsAction::DistrictChanged(_)
        | DetailsAction::StateChanged(_)
        | DetailsAction::PinCodeChanged(_)
        | DetailsAction::PlaceResolved(_) => Some("addressText".to_string()),
        DetailsAction::QuantityChanged(_) => Some("rudrakshaQuantity".to_string()),
        DetailsAction::DateAdded(_) | DetailsAction::DateRemoved(_) => {
            Some("preferredDate".to_string())
        },
        DetailsAction::SlotToggled { .. } => Some("preferredTimeSlot".to_string()),
        DetailsAction::MemberNameChanged { index, .. } => Some(format!("members.{index}.idName")),
        DetailsAction::MemberAgeChanged { index, .. } => Some(format!("members.{index}.idAge")),
        DetailsAction::MemberGenderChanged { index, .. } => {
            Some(format!("members.{index}.idGender"))
        },
        _ => None,
    }
}

impl Reducer for DetailsReducer {
    type State = DetailsState;
    type Action = DetailsAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> Vec<Effect<Self::Action>> {
        // Event-only controls stay inert until participation is on, so
        // a non-participating draft can never carry dates, slots or
        // members
        if !state.draft.participating
            && matches!(
                action,
                DetailsAction::NumberOfPeopleChanged(_)
                    | DetailsAction::MemberNameChanged { .. }
                    | DetailsAction::MemberAgeChanged { .. }
                    | DetailsAction::MemberGenderChanged { .. }
                    | DetailsAction::DateAdded(_)
                    | DetailsAction::DateRemoved(_)
                    | DetailsAction::SlotToggled { .. }
            )
        {
            return vec![];
        }

        if let Some(field) = touched_field(&action) {
            state.touched.insert(field);
        }

        match action {
            DetailsAction::FullNameChanged(value) => state.draft.full_name = value,
            DetailsAction::AgeChanged(value) => state.draft.age = value,
            DetailsAction::GenderChanged(value) => state.draft.gender = Some(value),
            DetailsAction::AddressLine1Changed(value) => state.draft.edit_address_line1(&value),
            DetailsAction::AddressLine2Changed(value) => state.draft.address.line2 = value,
            DetailsAction::CityChanged(value) => state.draft.address.city = value,
            DetailsAction::DistrictChanged(value) => state.draft.address.district = value,
            DetailsAction::StateChanged(value) => state.draft.address.state = value,
            DetailsAction::PinCodeChanged(value) => state.draft.address.pin_code = value,
            DetailsAction::PlaceResolved(place) => state.draft.apply_place(place),
            DetailsAction::ParticipationToggled(value) => state.draft.set_participating(value),
            DetailsAction::NumberOfPeopleChanged(value) => {
                state.draft.set_number_of_people(value);
            },
            DetailsAction::MemberNameChanged { index, value } => {
                if let Some(member) = state.draft.members.get_mut(index) {
                    member.name = value;
                }
            },
            DetailsAction::MemberAgeChanged { index, value } => {
                if let Some(member) = state.draft.members.get_mut(index) {
                    member.age = value;
                }
            },
            DetailsAction::MemberGenderChanged { index, value } => {
                if let Some(member) = state.draft.members.get_mut(index) {
                    member.gender = Some(value);
                }
            },
            DetailsAction::QuantityChanged(value) => state.draft.quantity = value,
            DetailsAction::DateAdded(date) => state.draft.selection.add_date(&date),
            DetailsAction::DateRemoved(date) => state.draft.selection.remove_date(&date),
            DetailsAction::SlotToggled { date, slot_id } => {
                state.draft.selection.toggle_slot(&date, &slot_id);
            },
            DetailsAction::SubmitTapped => {
                let errors = validate_booking(&state.draft);
                if errors.is_empty() {
                    state.errors.clear();
                    state.draft.finalize_address();
                    state.submitted = Some(state.draft.clone());
                } else {
                    state.errors = errors;
                }
                return vec![];
            },
        }

        // Eager validation: only show errors for touched fields
        state.errors = validate_booking(&state.draft)
            .into_iter()
            .filter(|error| state.touched.contains(&error.field))
            .collect();

        vec![]
    }
}
