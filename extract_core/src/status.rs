//! Results and events reported to the presentation side.

use std::time::Duration;

use crate::material::MaterialId;
use crate::quality::Quality;
use crate::scoring::Bonus;
use crate::trim::TrimProgress;

/// What a completed press produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PressOutcome {
    pub material: MaterialId,
    pub quality: Quality,
    pub bonus: Bonus,
    pub units_added: u32,
    /// Ledger count for (material, quality) after the credit.
    pub total_units: u64,
}

/// Public status of the press after each press call.
#[derive(Debug, Clone, PartialEq)]
pub enum PressStatus {
    /// Not holding (nothing on the press, or no hold running).
    Idle,
    /// Hold running, threshold not reached yet.
    Holding {
        elapsed: Duration,
        remaining: Duration,
    },
    /// Threshold reached: scored, credited, state discarded.
    Completed(PressOutcome),
    /// Let go before the threshold; trim progress kept.
    Released { elapsed: Duration },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractEvent {
    /// Counters after a tracked sub-action.
    Progress(TrimProgress),
    /// Bonus shown when a trimmed material moves onto the press.
    Preview { material: MaterialId, bonus: Bonus },
    PressCompleted(PressOutcome),
    PressReleased {
        material: MaterialId,
        elapsed: Duration,
    },
}

/// Sink for workbench events (UI feedback, logs, replays).
pub trait ExtractObserver {
    fn on_event(&mut self, event: &ExtractEvent);
}

impl<F: FnMut(&ExtractEvent)> ExtractObserver for F {
    fn on_event(&mut self, event: &ExtractEvent) {
        self(event)
    }
}
