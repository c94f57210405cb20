//! Verbosity tiers
//!
//! Each tier renders an [`Event`] with a wider field set than the one below
//! it. Tiers are a closed set selected by the generator's verbosity level;
//! levels outside `0..=2` select nothing.

use crate::config::OutputFormat;
use crate::event::Event;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::{self, Write};

/// Display labels, one per tier. Labels are never opened for writing.
pub const TIER_LABELS: [&str; 3] = ["level0.log", "level1.log", "level2.log"];

/// A single rendered event field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub key: &'static str,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Zero,
    First,
    Second,
}

impl TierKind {
    pub const ALL: [TierKind; 3] = [TierKind::Zero, TierKind::First, TierKind::Second];

    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            0 => Some(TierKind::Zero),
            1 => Some(TierKind::First),
            2 => Some(TierKind::Second),
            _ => None,
        }
    }

    pub fn level(self) -> i32 {
        match self {
            TierKind::Zero => 0,
            TierKind::First => 1,
            TierKind::Second => 2,
        }
    }

    /// Number of numeric fields rendered after the timestamp.
    pub fn field_count(self) -> usize {
        match self {
            TierKind::Zero => 1,
            TierKind::First => 2,
            TierKind::Second => 4,
        }
    }
}

/// JSON shape of one rendered event; fields outside the tier are omitted.
#[derive(Debug, Serialize)]
struct TierRecord<'a> {
    tier: &'a str,
    timestamp: DateTime<Local>,
    event_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    param1: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    param2: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    param3: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbosityTier {
    kind: TierKind,
    label: String,
}

impl VerbosityTier {
    pub fn new(kind: TierKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }

    pub fn kind(&self) -> TierKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fields of `event` this tier includes, in render order.
    pub fn fields(&self, event: &Event) -> impl Iterator<Item = Field> {
        let all = [
            Field {
                name: "Event ID",
                key: "event_id",
                value: event.event_id,
            },
            Field {
                name: "Param1",
                key: "param1",
                value: event.param1,
            },
            Field {
                name: "Param2",
                key: "param2",
                value: event.param2,
            },
            Field {
                name: "Param3",
                key: "param3",
                value: event.param3,
            },
        ];
        all.into_iter().take(self.kind.field_count())
    }

    /// Format `event` without writing it anywhere.
    pub fn format(&self, event: &Event, format: OutputFormat) -> String {
        match format {
            OutputFormat::Pretty => {
                let mut out = format!("Timestamp: {}\n", event.human_timestamp());
                for field in self.fields(event) {
                    out.push_str(&format!("{}: {}\n", field.name, field.value));
                }
                out
            }
            OutputFormat::Json => {
                let count = self.kind.field_count();
                let record = TierRecord {
                    tier: &self.label,
                    timestamp: event.timestamp,
                    event_id: event.event_id,
                    param1: (count > 1).then_some(event.param1),
                    param2: (count > 2).then_some(event.param2),
                    param3: (count > 3).then_some(event.param3),
                };
                let mut line =
                    serde_json::to_string(&record).unwrap_or_else(|_| "{}".to_string());
                line.push('\n');
                line
            }
        }
    }

    /// Render `event` to `out` in a single write. Returns `self` for chaining.
    pub fn render<W: Write + ?Sized>(
        &self,
        event: &Event,
        format: OutputFormat,
        out: &mut W,
    ) -> io::Result<&Self> {
        out.write_all(self.format(event, format).as_bytes())?;
        out.flush()?;
        Ok(self)
    }
}

/// The three tiers, built once and reused for the generator lifetime.
#[derive(Debug, Clone)]
pub struct TierSet {
    tiers: [VerbosityTier; 3],
}

impl TierSet {
    pub fn new() -> Self {
        Self {
            tiers: TierKind::ALL
                .map(|kind| VerbosityTier::new(kind, TIER_LABELS[kind.level() as usize])),
        }
    }

    /// Tier for `level`, or `None` when the level is out of range.
    pub fn select(&self, level: i32) -> Option<&VerbosityTier> {
        TierKind::from_level(level).map(|kind| self.get(kind))
    }

    pub fn get(&self, kind: TierKind) -> &VerbosityTier {
        &self.tiers[kind.level() as usize]
    }
}

impl Default for TierSet {
    fn default() -> Self {
        Self::new()
    }
}
