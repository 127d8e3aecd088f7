//! Event date and time-slot selection.
//!
//! The event runs in fixed 2-hour bands. A visitor picks one or more
//! dates and, for each date, one or more slots. A slot is identified by
//! the `"<start>-<end>"` literal of its band, so the same slot id may
//! appear under several dates.

use std::collections::BTreeMap;

/// Part of the day a slot belongs to, used for grouping in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// 06:00 to 12:00
    Morning,
    /// 12:00 to 16:00
    Afternoon,
    /// 16:00 to 20:00
    Evening,
    /// 20:00 to 22:00
    Night,
    /// The overnight band
    Midnight,
}

/// One selectable time band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    /// Band start, `HH:MM:SS`
    pub start: &'static str,
    /// Band end, `HH:MM:SS`
    pub end: &'static str,
    /// Display label
    pub label: &'static str,
    /// Day period for grouping
    pub period: Period,
    /// Layout hint: the band spans the full row
    pub full_width: bool,
}

impl TimeSlot {
    /// Slot identifier, the `"<start>-<end>"` literal
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// The fixed slot catalog: eight 2-hour bands plus the overnight band
pub const TIME_SLOTS: [TimeSlot; 9] = [
    TimeSlot {
        start: "06:00:00",
        end: "08:00:00",
        label: "Early Morning",
        period: Period::Morning,
        full_width: false,
    },
    TimeSlot {
        start: "08:00:00",
        end: "10:00:00",
        label: "Morning",
        period: Period::Morning,
        full_width: false,
    },
    TimeSlot {
        start: "10:00:00",
        end: "12:00:00",
        label: "Late Morning",
        period: Period::Morning,
        full_width: false,
    },
    TimeSlot {
        start: "12:00:00",
        end: "14:00:00",
        label: "Afternoon",
        period: Period::Afternoon,
        full_width: false,
    },
    TimeSlot {
        start: "14:00:00",
        end: "16:00:00",
        label: "Afternoon",
        period: Period::Afternoon,
        full_width: false,
    },
    TimeSlot {
        start: "16:00:00",
        end: "18:00:00",
        label: "Evening",
        period: Period::Evening,
        full_width: false,
    },
    TimeSlot {
        start: "18:00:00",
        end: "20:00:00",
        label: "Evening",
        period: Period::Evening,
        full_width: false,
    },
    TimeSlot {
        start: "20:00:00",
        end: "22:00:00",
        label: "Night",
        period: Period::Night,
        full_width: false,
    },
    TimeSlot {
        start: "22:00:00",
        end: "06:00:00",
        label: "Midnight",
        period: Period::Midnight,
        full_width: true,
    },
];

/// Look up a catalog slot by its id
#[must_use]
pub fn slot_by_id(id: &str) -> Option<&'static TimeSlot> {
    TIME_SLOTS.iter().find(|slot| slot.id() == id)
}

/// The visitor's date and slot choices
///
/// Dates keep insertion order. The slot map only ever holds keys that
/// are also in `dates`; removing a date purges its slots. No overlap
/// detection: the same slot id may be selected on every date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSelection {
    /// Selected dates (ISO `YYYY-MM-DD`), in selection order
    pub dates: Vec<String>,
    /// Selected slot ids per date
    pub slots: BTreeMap<String, Vec<String>>,
    /// Date currently focused in the slot picker
    pub focused: Option<String>,
}

impl SlotSelection {
    /// Add a date and focus it. Adding an already-selected date only
    /// moves focus.
    pub fn add_date(&mut self, date: &str) {
        if !self.dates.iter().any(|d| d == date) {
            self.dates.push(date.to_string());
        }
        self.focused = Some(date.to_string());
    }

    /// Remove a date, purging its slot entry. Removing a date that is
    /// not selected is a no-op.
    pub fn remove_date(&mut self, date: &str) {
        self.dates.retain(|d| d != date);
        self.slots.remove(date);
        if self.focused.as_deref() == Some(date) {
            self.focused = None;
        }
    }

    /// Toggle a slot on a date. Ignored when the date is not selected.
    pub fn toggle_slot(&mut self, date: &str, slot_id: &str) {
        if !self.dates.iter().any(|d| d == date) {
            return;
        }
        let entry = self.slots.entry(date.to_string()).or_default();
        if let Some(position) = entry.iter().position(|s| s == slot_id) {
            entry.remove(position);
            if entry.is_empty() {
                self.slots.remove(date);
            }
        } else {
            entry.push(slot_id.to_string());
        }
    }

    /// Selected dates that have no slot yet, in selection order
    #[must_use]
    pub fn missing_slot_dates(&self) -> Vec<String> {
        self.dates
            .iter()
            .filter(|date| {
                self.slots
                    .get(date.as_str())
                    .is_none_or(|slots| slots.is_empty())
            })
            .cloned()
            .collect()
    }

    /// At least one date selected and every date has a slot
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.dates.is_empty() && self.missing_slot_dates().is_empty()
    }

    /// No dates, no slots, no focus
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.slots.is_empty() && self.focused.is_none()
    }

    /// Drop every choice
    pub fn clear(&mut self) {
        self.dates.clear();
        self.slots.clear();
        self.focused = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn catalog_tiles_the_day() {
        assert_eq!(TIME_SLOTS.len(), 9);
        for pair in TIME_SLOTS.windows(2).take(7) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        let overnight = TIME_SLOTS.last().unwrap();
        assert_eq!(overnight.start, "22:00:00");
        assert_eq!(overnight.end, "06:00:00");
        assert_eq!(overnight.period, Period::Midnight);
        assert!(overnight.full_width);
    }

    #[test]
    fn slot_id_is_the_start_end_literal() {
        assert_eq!(TIME_SLOTS[0].id(), "06:00:00-08:00:00");
        assert!(slot_by_id("06:00:00-08:00:00").is_some());
        assert!(slot_by_id("07:00:00-09:00:00").is_none());
    }

    #[test]
    fn removing_a_date_purges_its_slots_and_focus() {
        let mut selection = SlotSelection::default();
        selection.add_date("2026-02-15");
        selection.toggle_slot("2026-02-15", "06:00:00-08:00:00");
        assert_eq!(selection.focused.as_deref(), Some("2026-02-15"));

        selection.remove_date("2026-02-15");
        assert!(selection.is_empty());

        // Idempotent
        selection.remove_date("2026-02-15");
        assert!(selection.is_empty());
    }

    #[test]
    fn toggling_a_slot_twice_removes_it() {
        let mut selection = SlotSelection::default();
        selection.add_date("2026-02-15");
        selection.toggle_slot("2026-02-15", "08:00:00-10:00:00");
        assert!(selection.is_complete());
        selection.toggle_slot("2026-02-15", "08:00:00-10:00:00");
        assert!(!selection.is_complete());
        assert_eq!(selection.missing_slot_dates(), vec!["2026-02-15"]);
    }

    #[test]
    fn toggle_on_unselected_date_is_ignored() {
        let mut selection = SlotSelection::default();
        selection.toggle_slot("2026-02-15", "08:00:00-10:00:00");
        assert!(selection.slots.is_empty());
    }

    #[test]
    fn same_slot_may_repeat_across_dates() {
        let mut selection = SlotSelection::default();
        selection.add_date("2026-02-15");
        selection.add_date("2026-02-16");
        selection.toggle_slot("2026-02-15", "06:00:00-08:00:00");
        selection.toggle_slot("2026-02-16", "06:00:00-08:00:00");
        assert!(selection.is_complete());
    }

    #[test]
    fn missing_slot_dates_keeps_selection_order() {
        let mut selection = SlotSelection::default();
        selection.add_date("2026-02-17");
        selection.add_date("2026-02-15");
        assert_eq!(
            selection.missing_slot_dates(),
            vec!["2026-02-17", "2026-02-15"]
        );
    }
}
