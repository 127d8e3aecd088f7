//! Mutable form drafts for the booking wizard and the free registration.

use crate::slots::SlotSelection;
use crate::types::{Gender, Member};

/// Maximum event party size (registrant included)
pub const MAX_PARTY_SIZE: u32 = 10;

/// Maximum Rudraksha quantity per booking
pub const MAX_QUANTITY: u32 = 10;

/// Structured postal address fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Street number and route
    pub line1: String,
    /// Apartment / unit
    pub line2: String,
    /// City
    pub city: String,
    /// District
    pub district: String,
    /// State
    pub state: String,
    /// Postal code
    pub pin_code: String,
}

impl Address {
    fn parts(&self) -> [&str; 6] {
        [
            &self.line1,
            &self.line2,
            &self.city,
            &self.district,
            &self.state,
            &self.pin_code,
        ]
    }

    /// Join the non-blank fields with `", "` in fixed order
    #[must_use]
    pub fn combined(&self) -> String {
        self.parts()
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether any field is non-blank
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.parts().iter().any(|part| !part.trim().is_empty())
    }
}

/// An address suggestion resolved by a places autocomplete provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPlace {
    /// Street number and route
    pub line1: String,
    /// Subpremise
    pub line2: String,
    /// Locality
    pub city: String,
    /// Administrative area level 2
    pub district: String,
    /// Administrative area level 1
    pub state: String,
    /// Postal code
    pub pin_code: String,
    /// Provider place id
    pub place_id: Option<String>,
    /// Latitude
    pub lat: Option<f64>,
    /// Longitude
    pub lng: Option<f64>,
}

/// The Rudraksha booking form draft
///
/// Phone number is set by the auth step and never edited here.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    /// Registrant's full name
    pub full_name: String,
    /// Verified 10-digit phone, without country code
    pub phone_number: String,
    /// Registrant's age, optional
    pub age: Option<u32>,
    /// Registrant's gender, unset until chosen
    pub gender: Option<Gender>,
    /// Structured address fields
    pub address: Address,
    /// Combined address string, derived on submit
    pub address_text: String,
    /// Autocomplete place id, cleared on manual address edits
    pub place_id: Option<String>,
    /// Autocomplete latitude
    pub lat: Option<f64>,
    /// Autocomplete longitude
    pub lng: Option<f64>,
    /// Whether the registrant attends the event in person
    pub participating: bool,
    /// Event date and slot choices
    pub selection: SlotSelection,
    /// Additional party members (party size minus one)
    pub members: Vec<Member>,
    /// Event party size including the registrant, 1 to 10
    pub number_of_people: u32,
    /// Rudraksha quantity, 1 to 10
    pub quantity: u32,

    // Line 1 as last written by autocomplete, for manual-edit detection
    autocomplete_line1: Option<String>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone_number: String::new(),
            age: None,
            gender: None,
            address: Address::default(),
            address_text: String::new(),
            place_id: None,
            lat: None,
            lng: None,
            participating: false,
            selection: SlotSelection::default(),
            members: Vec::new(),
            number_of_people: 1,
            quantity: 1,
            autocomplete_line1: None,
        }
    }
}

impl BookingDraft {
    /// Empty draft for the given verified phone number
    #[must_use]
    pub fn for_phone(phone_number: &str) -> Self {
        Self {
            phone_number: phone_number.to_string(),
            ..Self::default()
        }
    }

    /// Prefill name and address from a resolved identity profile
    ///
    /// Blank values leave the draft untouched.
    pub fn prefill(&mut self, full_name: &str, address_text: &str) {
        if !full_name.trim().is_empty() {
            self.full_name = full_name.to_string();
        }
        if !address_text.trim().is_empty() {
            self.address_text = address_text.to_string();
            self.address.line1 = address_text.to_string();
        }
    }

    /// Set the party size, keeping `members.len() == n - 1`
    ///
    /// Surviving member entries keep their data; the list grows with
    /// empty entries and shrinks from the tail. Out-of-range values are
    /// clamped to 1..=10.
    pub fn set_number_of_people(&mut self, count: u32) {
        let count = count.clamp(1, MAX_PARTY_SIZE);
        self.number_of_people = count;
        let target = (count - 1) as usize;
        if self.members.len() > target {
            self.members.truncate(target);
        } else {
            self.members.resize_with(target, Member::default);
        }
    }

    /// Toggle event participation
    ///
    /// Turning it off clears dates, slots and members, and resets the
    /// party size to 1.
    pub fn set_participating(&mut self, participating: bool) {
        self.participating = participating;
        if !participating {
            self.selection.clear();
            self.members.clear();
            self.number_of_people = 1;
        }
    }

    /// Apply an autocomplete selection, overwriting the structured
    /// fields and geodata
    pub fn apply_place(&mut self, place: ResolvedPlace) {
        self.address = Address {
            line1: place.line1.clone(),
            line2: place.line2,
            city: place.city,
            district: place.district,
            state: place.state,
            pin_code: place.pin_code,
        };
        self.place_id = place.place_id;
        self.lat = place.lat;
        self.lng = place.lng;
        self.autocomplete_line1 = Some(place.line1);
    }

    /// Manually edit address line 1
    ///
    /// Hand edits after an autocomplete selection clear the stored
    /// place id and coordinates so stale geodata is never submitted
    /// alongside hand-edited text.
    pub fn edit_address_line1(&mut self, value: &str) {
        if self.autocomplete_line1.as_deref() != Some(value) {
            self.place_id = None;
            self.lat = None;
            self.lng = None;
        }
        self.address.line1 = value.to_string();
    }

    /// Derive and store the combined address string
    pub fn finalize_address(&mut self) {
        let combined = self.address.combined();
        if !combined.is_empty() {
            self.address_text = combined;
        }
    }

    /// Party size derived from the member list
    #[must_use]
    pub fn party_size(&self) -> u32 {
        u32::try_from(self.members.len()).unwrap_or(u32::MAX).saturating_add(1)
    }
}

/// The free event registration draft
///
/// Unlike the booking draft there is no quantity and no participation
/// flag: dates and slots are always required, and the phone number is
/// typed by hand rather than verified.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDraft {
    /// Registrant's full name
    pub full_name: String,
    /// Phone number as typed, up to 10 digits
    pub phone_number: String,
    /// Registrant's age, optional
    pub age: Option<u32>,
    /// Registrant's gender, unset until chosen
    pub gender: Option<Gender>,
    /// Structured address fields
    pub address: Address,
    /// Event date and slot choices
    pub selection: SlotSelection,
    /// Additional party members
    pub members: Vec<Member>,
    /// Party size including the registrant, 1 to 10
    pub number_of_people: u32,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone_number: String::new(),
            age: None,
            gender: None,
            address: Address::default(),
            selection: SlotSelection::default(),
            members: Vec::new(),
            number_of_people: 1,
        }
    }
}

impl RegistrationDraft {
    /// Set the party size, keeping `members.len() == n - 1`
    pub fn set_number_of_people(&mut self, count: u32) {
        let count = count.clamp(1, MAX_PARTY_SIZE);
        self.number_of_people = count;
        let target = (count - 1) as usize;
        if self.members.len() > target {
            self.members.truncate(target);
        } else {
            self.members.resize_with(target, Member::default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_address_joins_non_blank_parts() {
        let address = Address {
            line1: "12 Temple Road".to_string(),
            line2: String::new(),
            city: "Chennai".to_string(),
            district: "  ".to_string(),
            state: "Tamil Nadu".to_string(),
            pin_code: "600001".to_string(),
        };
        assert_eq!(
            address.combined(),
            "12 Temple Road, Chennai, Tamil Nadu, 600001"
        );
    }

    #[test]
    fn party_size_change_preserves_surviving_members() {
        let mut draft = BookingDraft::default();
        draft.set_participating(true);
        draft.set_number_of_people(4);
        assert_eq!(draft.members.len(), 3);

        draft.members[0].name = "Asha".to_string();
        draft.members[1].name = "Ravi".to_string();

        draft.set_number_of_people(2);
        assert_eq!(draft.members.len(), 1);
        assert_eq!(draft.members[0].name, "Asha");

        draft.set_number_of_people(3);
        assert_eq!(draft.members.len(), 2);
        assert_eq!(draft.members[0].name, "Asha");
        assert_eq!(draft.members[1].name, "");
    }

    #[test]
    fn participation_off_clears_event_fields() {
        let mut draft = BookingDraft::default();
        draft.set_participating(true);
        draft.set_number_of_people(4);
        draft.selection.add_date("2026-02-15");
        draft.selection.toggle_slot("2026-02-15", "06:00:00-08:00:00");

        draft.set_participating(false);
        assert!(draft.selection.is_empty());
        assert!(draft.members.is_empty());
        assert_eq!(draft.number_of_people, 1);
    }

    #[test]
    fn manual_line1_edit_clears_geodata() {
        let mut draft = BookingDraft::default();
        draft.apply_place(ResolvedPlace {
            line1: "12 Temple Road".to_string(),
            city: "Chennai".to_string(),
            place_id: Some("place-123".to_string()),
            lat: Some(13.08),
            lng: Some(80.27),
            ..ResolvedPlace::default()
        });
        assert!(draft.place_id.is_some());

        // Re-setting the autocomplete value keeps the geodata
        draft.edit_address_line1("12 Temple Road");
        assert!(draft.place_id.is_some());

        draft.edit_address_line1("12 Temple Rd");
        assert!(draft.place_id.is_none());
        assert!(draft.lat.is_none());
        assert!(draft.lng.is_none());
    }

    #[test]
    fn prefill_ignores_blank_values() {
        let mut draft = BookingDraft::for_phone("9876543210");
        draft.prefill("  ", "");
        assert_eq!(draft.full_name, "");
        draft.prefill("Asha Iyer", "Old Street, Madurai");
        assert_eq!(draft.full_name, "Asha Iyer");
        assert_eq!(draft.address.line1, "Old Street, Madurai");
    }
}
