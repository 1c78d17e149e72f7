//! Recurring time slots
//!
//! A slot is a posting template: a time of day, the weekdays it recurs on,
//! and the platforms it targets. Slots are replaced wholesale by id and
//! never edited in place.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::scheduling::{parse_time_of_day, slot_dates};
use crate::service::store::PostStore;
use crate::types::{Platform, PostPatch, TimeSlot};
use crate::{BatchcastError, Result};

/// Ordered collection of time slots
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: Vec<TimeSlot>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with the built-in slots
    pub fn with_defaults() -> Self {
        Self {
            slots: default_slots(),
        }
    }

    /// Registry from configured slots, rejecting invalid entries
    pub fn from_slots(slots: Vec<TimeSlot>) -> Result<Self> {
        let mut registry = Self::new();
        for slot in slots {
            registry.add(slot)?;
        }
        Ok(registry)
    }

    /// Add a slot after checking its time, days, platforms and id
    pub fn add(&mut self, slot: TimeSlot) -> Result<()> {
        check_slot(&slot)?;
        if self.get(&slot.id).is_some() {
            return Err(BatchcastError::InvalidInput(format!(
                "Time slot '{}' already exists",
                slot.id
            )));
        }
        debug!(slot_id = %slot.id, name = %slot.name, "adding time slot");
        self.slots.push(slot);
        Ok(())
    }

    /// Swap the slot with the same id for `slot`
    ///
    /// Returns `Ok(false)` when no slot has that id.
    pub fn replace(&mut self, slot: TimeSlot) -> Result<bool> {
        check_slot(&slot)?;
        match self.slots.iter_mut().find(|s| s.id == slot.id) {
            Some(existing) => {
                *existing = slot;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != id);
        self.slots.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Look a slot up by id, falling back to a case-insensitive name match
    pub fn find(&self, id_or_name: &str) -> Option<&TimeSlot> {
        self.get(id_or_name).or_else(|| {
            self.slots
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(id_or_name.trim()))
        })
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn default_slot(&self) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.is_default)
    }
}

/// Assign each post a date from `slot`, in the order given
///
/// Sets the date, the slot's time and the slot's platforms (replacing any
/// platforms already chosen), then revalidates through the store. Ids not
/// in the store are skipped but still consume their position in the
/// rotation. Returns how many drafts were updated.
pub fn apply_slot(
    store: &mut PostStore,
    slot: &TimeSlot,
    post_ids: &[String],
    today: NaiveDate,
) -> Result<usize> {
    if post_ids.is_empty() {
        return Ok(0);
    }

    let dates = slot_dates(today, &slot.days, post_ids.len())?;

    let mut updated = 0;
    for (id, date) in post_ids.iter().zip(dates) {
        let patch = PostPatch::new()
            .scheduled_date(date)
            .scheduled_time(slot.time.clone())
            .platforms(slot.platforms.clone());
        if store.update(id, patch) {
            updated += 1;
        }
    }

    info!(slot_id = %slot.id, updated, "applied time slot");
    Ok(updated)
}

fn check_slot(slot: &TimeSlot) -> Result<()> {
    if slot.id.trim().is_empty() {
        return Err(BatchcastError::InvalidInput(
            "Time slot id cannot be empty".to_string(),
        ));
    }
    parse_time_of_day(&slot.time)?;
    if slot.days.is_empty() {
        return Err(BatchcastError::InvalidInput(format!(
            "Time slot '{}' needs at least one day",
            slot.name
        )));
    }
    if slot.platforms.is_empty() {
        return Err(BatchcastError::InvalidInput(format!(
            "Time slot '{}' needs at least one platform",
            slot.name
        )));
    }
    Ok(())
}

/// Built-in slots used when none are configured
pub fn default_slots() -> Vec<TimeSlot> {
    use chrono::Weekday::*;

    vec![
        TimeSlot {
            id: "morning-boost".to_string(),
            name: "Morning Boost".to_string(),
            time: "09:00".to_string(),
            days: vec![Mon, Wed, Fri],
            platforms: vec![Platform::Instagram, Platform::Facebook],
            is_default: true,
        },
        TimeSlot {
            id: "lunch-break".to_string(),
            name: "Lunch Break".to_string(),
            time: "12:30".to_string(),
            days: vec![Tue, Thu],
            platforms: vec![Platform::Twitter, Platform::Linkedin],
            is_default: false,
        },
        TimeSlot {
            id: "evening-engagement".to_string(),
            name: "Evening Engagement".to_string(),
            time: "18:00".to_string(),
            days: vec![Mon, Tue, Wed, Thu, Fri],
            platforms: vec![Platform::Instagram, Platform::Tiktok, Platform::Threads],
            is_default: false,
        },
    ]
}
