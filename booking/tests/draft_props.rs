//! Property tests for draft invariants.

use proptest::prelude::*;

use yagam_booking::draft::{BookingDraft, MAX_PARTY_SIZE};
use yagam_booking::schema::validate_booking;
use yagam_booking::types::Gender;

proptest! {
    // Whatever sequence of party sizes is applied, the member list
    // tracks the final size minus the registrant, clamped to 1..=10.
    #[test]
    fn member_list_tracks_party_size(sizes in proptest::collection::vec(0u32..20, 1..12)) {
        let mut draft = BookingDraft::default();
        draft.set_participating(true);
        for size in &sizes {
            draft.set_number_of_people(*size);
        }
        let last = sizes.last().copied().unwrap_or(1).clamp(1, MAX_PARTY_SIZE);
        prop_assert_eq!(draft.number_of_people, last);
        prop_assert_eq!(draft.members.len() as u32, last - 1);
    }

    // Shrinking and regrowing never invents member data
    #[test]
    fn regrown_members_start_empty(grow in 2u32..=10, shrink in 1u32..=9) {
        prop_assume!(shrink < grow);
        let mut draft = BookingDraft::default();
        draft.set_participating(true);
        draft.set_number_of_people(grow);
        for member in &mut draft.members {
            member.name = "Ravi".to_string();
        }
        draft.set_number_of_people(shrink);
        draft.set_number_of_people(grow);
        for member in &draft.members[(shrink as usize - 1)..] {
            prop_assert_eq!(&member.name, "");
        }
    }

    // Toggling participation off always leaves a submittable-shape
    // draft with respect to the event fields
    #[test]
    fn participation_off_clears_event_rules(
        size in 1u32..=10,
        dates in proptest::collection::vec("2026-02-1[0-9]", 0..4),
    ) {
        let mut draft = BookingDraft::default();
        draft.full_name = "Asha Iyer".to_string();
        draft.phone_number = "9876543210".to_string();
        draft.gender = Some(Gender::Female);
        draft.address.line1 = "12 Temple Road".to_string();

        draft.set_participating(true);
        draft.set_number_of_people(size);
        for date in &dates {
            draft.selection.add_date(date);
        }

        draft.set_participating(false);
        let errors = validate_booking(&draft);
        prop_assert!(!errors.iter().any(|e| e.field.starts_with("members")));
        prop_assert!(!errors.iter().any(|e| e.field == "preferredDate"));
        prop_assert!(!errors.iter().any(|e| e.field == "preferredTimeSlot"));
    }
}
