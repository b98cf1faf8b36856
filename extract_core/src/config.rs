//! Configuration types for the extraction engine.
//!
//! These are the runtime configuration structs used by `Workbench`.
//! They are separate from the TOML-deserialized config in `extract_config`.

use std::time::Duration;

/// RootCut thresholds over the number of knife cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootCutCfg {
    /// At or below this many cuts the bonus is the floor.
    pub min_chops: u32,
    /// Exactly this many cuts gives the neutral bonus.
    pub optimal_chops: u32,
    /// At or above this many cuts the bonus is the ceiling.
    pub max_chops: u32,
}

impl Default for RootCutCfg {
    fn default() -> Self {
        Self {
            min_chops: 5,
            optimal_chops: 10,
            max_chops: 15,
        }
    }
}

/// WoodGrind threshold over completed rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WoodGrindCfg {
    /// Below this many rotations no credit is given. Must be >= 1.
    pub min_rotations: u32,
}

impl Default for WoodGrindCfg {
    fn default() -> Self {
        Self { min_rotations: 5 }
    }
}

/// RindScrape thresholds over stroke count and straightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RindScrapeCfg {
    /// Below this many strokes no credit is given. Must be >= 1.
    pub min_strokes: u32,
    /// Average deviation at which the bonus reaches the floor. Must be > 0.
    pub allowed_deviation: f32,
}

impl Default for RindScrapeCfg {
    fn default() -> Self {
        Self {
            min_strokes: 5,
            allowed_deviation: 20.0,
        }
    }
}

/// Per-classification scoring thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoringCfg {
    pub root: RootCutCfg,
    pub wood: WoodGrindCfg,
    pub rind: RindScrapeCfg,
}

impl ScoringCfg {
    /// Check the invariants the formulas rely on.
    pub fn check(&self) -> Result<(), &'static str> {
        if self.root.min_chops >= self.root.optimal_chops {
            return Err("root min_chops must be < optimal_chops");
        }
        if self.root.optimal_chops >= self.root.max_chops {
            return Err("root optimal_chops must be < max_chops");
        }
        if self.wood.min_rotations == 0 {
            return Err("wood min_rotations must be >= 1");
        }
        if self.rind.min_strokes == 0 {
            return Err("rind min_strokes must be >= 1");
        }
        if !(self.rind.allowed_deviation.is_finite() && self.rind.allowed_deviation > 0.0) {
            return Err("rind allowed_deviation must be finite and > 0");
        }
        Ok(())
    }
}

/// Press hold and ledger credit settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressCfg {
    /// How long the press must be held to complete.
    pub hold: Duration,
    /// Units credited per completed press, independent of the bonus.
    pub batch_size: u32,
}

impl Default for PressCfg {
    fn default() -> Self {
        Self {
            hold: Duration::from_secs(2),
            batch_size: 10,
        }
    }
}

impl PressCfg {
    pub fn check(&self) -> Result<(), &'static str> {
        if self.hold.is_zero() {
            return Err("press hold must be > 0");
        }
        if self.batch_size == 0 {
            return Err("press batch_size must be >= 1");
        }
        Ok(())
    }
}
