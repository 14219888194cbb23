//! Running field goal totals for one video.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::tracker::{ShotEvent, ShotEventKind};

/// Field goals made and attempted, as persisted per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(rename = "FGM")]
    pub fgm: u32,
    #[serde(rename = "FGA")]
    pub fga: u32,
}

impl SessionSnapshot {
    /// Made over attempted; 0.0 when nothing was attempted.
    pub fn field_goal_percentage(&self) -> f32 {
        if self.fga == 0 {
            0.0
        } else {
            self.fgm as f32 / self.fga as f32
        }
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            fgm: self.fgm,
            fga: self.fga,
            fg_pct: (self.field_goal_percentage() * 100.0).round() / 100.0,
        }
    }

    /// Write the snapshot as a JSON session record, replacing any previous one.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Snapshot plus the derived percentage, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionReport {
    #[serde(rename = "FGM")]
    pub fgm: u32,
    #[serde(rename = "FGA")]
    pub fga: u32,
    #[serde(rename = "FG%")]
    pub fg_pct: f32,
}

/// Accumulates shot events into session counters.
///
/// Attempts are counted when the attempt event is emitted, so misses only
/// feed the miss tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTotals {
    attempts: u32,
    makes: u32,
    misses: u32,
}

impl SessionTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &ShotEvent) {
        match event.kind {
            ShotEventKind::Attempt => self.attempts += 1,
            ShotEventKind::Make => self.makes += 1,
            ShotEventKind::Miss => self.misses += 1,
        }
        debug!(
            id = event.track_id,
            kind = ?event.kind,
            fgm = self.makes,
            fga = self.attempts,
            "session updated"
        );
    }

    pub fn absorb<'a>(&mut self, events: impl IntoIterator<Item = &'a ShotEvent>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn makes(&self) -> u32 {
        self.makes
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            fgm: self.makes,
            fga: self.attempts,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
