//! Synthetic event value.

use chrono::{DateTime, Local};
use rand::Rng;
use std::ops::RangeInclusive;

/// Range every random event field is drawn from.
pub const FIELD_RANGE: RangeInclusive<i32> = 1..=100;

/// One pseudo-event, produced once per active tick and dropped after rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: DateTime<Local>,
    pub event_id: i32,
    pub param1: i32,
    pub param2: i32,
    pub param3: i32,
}

impl Event {
    /// Draw a fresh event stamped with `timestamp`.
    pub fn generate<R: Rng>(rng: &mut R, timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            event_id: rng.random_range(FIELD_RANGE),
            param1: rng.random_range(FIELD_RANGE),
            param2: rng.random_range(FIELD_RANGE),
            param3: rng.random_range(FIELD_RANGE),
        }
    }

    /// ctime-style rendering, e.g. `Mon Oct 19 14:03:07 2026`.
    pub fn human_timestamp(&self) -> String {
        self.timestamp.format("%a %b %e %H:%M:%S %Y").to_string()
    }
}
