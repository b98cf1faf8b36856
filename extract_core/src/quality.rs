//! Quality tiers and the progression gate on the top tier.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use extract_traits::UnlockSource;

use crate::scoring::Bonus;

/// Discrete outcome grade, ordered `Low < Normal < Good < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quality {
    Low,
    Normal,
    Good,
    Excellent,
}

impl Quality {
    pub const ALL: [Quality; 4] = [
        Quality::Low,
        Quality::Normal,
        Quality::Good,
        Quality::Excellent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Normal => "normal",
            Quality::Good => "good",
            Quality::Excellent => "excellent",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl std::str::FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quality::ALL
            .into_iter()
            .find(|q| q.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown quality {s:?}"))
    }
}

/// Bonus lower bound for `Normal`.
pub const NORMAL_AT: f32 = 0.8;
/// Bonus lower bound for `Good`.
pub const GOOD_AT: f32 = 1.1;
/// Bonus lower bound for `Excellent`.
pub const EXCELLENT_AT: f32 = 1.4;

/// Numeric classification only; no gate applied.
pub fn classify_bonus(bonus: Bonus) -> Quality {
    let b = bonus.value();
    if b < NORMAL_AT {
        Quality::Low
    } else if b < GOOD_AT {
        Quality::Normal
    } else if b < EXCELLENT_AT {
        Quality::Good
    } else {
        Quality::Excellent
    }
}

/// Classify and then apply the unlock gate: a locked `Excellent` becomes `Good`.
pub fn grade(bonus: Bonus, unlock: &dyn UnlockSource) -> Quality {
    let quality = classify_bonus(bonus);
    if quality == Quality::Excellent && !unlock.is_unlocked() {
        tracing::info!(bonus = bonus.value(), "excellent locked; downgraded to good");
        return Quality::Good;
    }
    quality
}

/// Process-wide unlock switch. Starts locked and can only be set, never cleared.
///
/// Clones share the flag, so the progression system can keep a handle while the
/// workbench reads through `UnlockSource`.
#[derive(Debug, Clone, Default)]
pub struct UnlockFlag(Arc<AtomicBool>);

impl UnlockFlag {
    pub fn new(unlocked: bool) -> Self {
        Self(Arc::new(AtomicBool::new(unlocked)))
    }

    /// Set the flag. Returns true only for the call that flipped it.
    pub fn unlock(&self) -> bool {
        let flipped = !self.0.swap(true, Ordering::AcqRel);
        if flipped {
            tracing::info!("excellent quality unlocked");
        }
        flipped
    }
}

impl UnlockSource for UnlockFlag {
    fn is_unlocked(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
