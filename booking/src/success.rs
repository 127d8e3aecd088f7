//! Success step summary.

use crate::draft::BookingDraft;
use crate::payment::total_amount;

/// What the success screen shows after a verified payment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessSummary {
    /// Rudrakshas booked
    pub quantity: u32,
    /// Amount paid in whole rupees
    pub total_amount: u64,
    /// Whether the registrant attends the event
    pub participating: bool,
    /// Party size including the registrant
    pub party_size: u32,
}

impl SuccessSummary {
    /// Summarize a paid booking
    #[must_use]
    pub fn from_booking(draft: &BookingDraft) -> Self {
        Self {
            quantity: draft.quantity,
            total_amount: total_amount(draft.quantity),
            participating: draft.participating,
            party_size: draft.party_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reflects_the_paid_booking() {
        let mut draft = BookingDraft::for_phone("9876543210");
        draft.quantity = 2;
        draft.set_participating(true);
        draft.set_number_of_people(3);

        let summary = SuccessSummary::from_booking(&draft);
        assert_eq!(summary.quantity, 2);
        assert_eq!(summary.total_amount, 1998);
        assert!(summary.participating);
        assert_eq!(summary.party_size, 3);
    }
}
