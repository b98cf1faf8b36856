//! Hold-to-complete press timing.
//!
//! `PressGate` is a pure state machine fed with frame deltas; it knows nothing
//! about materials or scoring. `FrameTimer` turns clock readings into deltas.

use std::time::{Duration, Instant};

use extract_traits::Clock;

/// Current phase of the press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressPhase {
    Idle,
    Holding { elapsed: Duration },
}

/// Result of feeding the gate one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTick {
    /// Not engaged; the delta was ignored.
    Idle,
    /// Still below the threshold.
    Holding { elapsed: Duration, remaining: Duration },
    /// Threshold reached on this frame; the gate is back to idle.
    Fired { elapsed: Duration },
}

#[derive(Debug, Clone)]
pub struct PressGate {
    hold: Duration,
    phase: PressPhase,
}

impl PressGate {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            phase: PressPhase::Idle,
        }
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.phase, PressPhase::Holding { .. })
    }

    /// Idle -> Holding with a fresh accumulator. Returns false if already holding.
    pub fn engage(&mut self) -> bool {
        if self.is_holding() {
            return false;
        }
        self.phase = PressPhase::Holding {
            elapsed: Duration::ZERO,
        };
        true
    }

    /// Advance a running hold by `dt`. Fires exactly once when the hold is reached.
    pub fn tick(&mut self, dt: Duration) -> PressTick {
        let PressPhase::Holding { elapsed } = self.phase else {
            return PressTick::Idle;
        };
        let elapsed = elapsed.saturating_add(dt);
        if elapsed >= self.hold {
            self.phase = PressPhase::Idle;
            return PressTick::Fired { elapsed };
        }
        self.phase = PressPhase::Holding { elapsed };
        PressTick::Holding {
            elapsed,
            remaining: self.hold - elapsed,
        }
    }

    /// Holding -> Idle without firing. Returns the elapsed time if a hold was running.
    pub fn release(&mut self) -> Option<Duration> {
        match std::mem::replace(&mut self.phase, PressPhase::Idle) {
            PressPhase::Holding { elapsed } => Some(elapsed),
            PressPhase::Idle => None,
        }
    }
}

/// Frame delta source over any `Clock`.
#[derive(Debug, Default, Clone)]
pub struct FrameTimer {
    last: Option<Instant>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the previous call; zero on the first call.
    pub fn delta(&mut self, clock: &dyn Clock) -> Duration {
        let now = clock.now();
        let dt = self
            .last
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        dt
    }

    /// Forget the previous reading, e.g. after the press is released.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
