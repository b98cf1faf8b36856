//! Bonus computation from a processing state.
//!
//! Every path returns a value in [`Bonus::FLOOR`, `Bonus::CEILING`]. A single
//! touch with the wrong tool short-circuits to the floor before any formula runs.

use std::fmt;

use crate::config::{RindScrapeCfg, RootCutCfg, ScoringCfg, WoodGrindCfg};
use crate::material::Classification;
use crate::trim::TrimState;

/// Quality multiplier in [0.5, 1.5]; 1.0 is neutral.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Bonus(f32);

impl Bonus {
    pub const FLOOR: Bonus = Bonus(0.5);
    pub const NEUTRAL: Bonus = Bonus(1.0);
    pub const CEILING: Bonus = Bonus(1.5);

    /// Clamp into range. NaN maps to the floor.
    pub fn clamped(v: f32) -> Self {
        if v.is_nan() {
            return Self::FLOOR;
        }
        Bonus(v.clamp(Self::FLOOR.0, Self::CEILING.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Bonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// True when no tool other than the classification's own was used.
/// An untouched material passes.
pub fn is_pure_tool_set(classification: Classification, state: &TrimState) -> bool {
    let correct = classification.required_tool();
    state.used_tools().iter().all(|&t| t == correct)
}

/// Score a processing state for a material of the given classification.
pub fn compute_bonus(
    classification: Classification,
    state: &TrimState,
    cfg: &ScoringCfg,
) -> Bonus {
    if !is_pure_tool_set(classification, state) {
        tracing::debug!(
            %classification,
            tools = ?state.used_tools(),
            "wrong tool used; bonus floored"
        );
        return Bonus::FLOOR;
    }

    let bonus = match classification {
        Classification::RootCut => root_cut_bonus(state.chop_count(), &cfg.root),
        Classification::WoodGrind => wood_grind_bonus(state.grind_count(), &cfg.wood),
        Classification::RindScrape => rind_scrape_bonus(
            state.scrape_count(),
            state.scrape_deviation_sum(),
            &cfg.rind,
        ),
    };
    tracing::debug!(%classification, bonus = bonus.value(), "bonus computed");
    bonus
}

/// Three-point piecewise linear curve over the cut count.
pub fn root_cut_bonus(chops: u32, cfg: &RootCutCfg) -> Bonus {
    Bonus::clamped(lerp3(
        chops as f32,
        cfg.min_chops as f32,
        cfg.optimal_chops as f32,
        cfg.max_chops as f32,
    ))
}

/// Floor below the minimum, otherwise proportional to rotations over the minimum.
pub fn wood_grind_bonus(rotations: u32, cfg: &WoodGrindCfg) -> Bonus {
    if rotations < cfg.min_rotations || cfg.min_rotations == 0 {
        return Bonus::FLOOR;
    }
    Bonus::clamped(rotations as f32 / cfg.min_rotations as f32)
}

/// Floor below the minimum stroke count, otherwise straighter strokes score higher:
/// 1.5 at zero average deviation down to 0.5 at `allowed_deviation` and beyond.
pub fn rind_scrape_bonus(strokes: u32, deviation_sum: f32, cfg: &RindScrapeCfg) -> Bonus {
    if strokes < cfg.min_strokes || strokes == 0 {
        return Bonus::FLOOR;
    }
    let avg = deviation_sum / strokes as f32;
    Bonus::clamped(Bonus::CEILING.0 - avg / cfg.allowed_deviation)
}

/// 0.5 at or below `min`, 1.0 at `optimal`, 1.5 at or above `max`, linear in between.
fn lerp3(value: f32, min: f32, optimal: f32, max: f32) -> f32 {
    if value <= min {
        return Bonus::FLOOR.0;
    }
    if value >= max {
        return Bonus::CEILING.0;
    }
    if value <= optimal {
        lerp(Bonus::FLOOR.0, Bonus::NEUTRAL.0, (value - min) / (optimal - min))
    } else {
        lerp(Bonus::NEUTRAL.0, Bonus::CEILING.0, (value - optimal) / (max - optimal))
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::material::Tool;

    fn cuts(n: u32) -> TrimState {
        let mut s = TrimState::new();
        s.record_tool_use(Tool::Knife);
        for _ in 0..n {
            s.record_cut();
        }
        s
    }

    #[test]
    fn root_cut_boundaries_are_exact() {
        let cfg = ScoringCfg::default();
        let b = |n| compute_bonus(Classification::RootCut, &cuts(n), &cfg).value();
        assert_eq!(b(0), 0.5);
        assert_eq!(b(5), 0.5);
        assert_eq!(b(10), 1.0);
        assert_eq!(b(15), 1.5);
        assert_eq!(b(40), 1.5);
        assert!((b(7) - 0.7).abs() < 1e-6);
        assert!((b(12) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn wrong_tool_floors_everything() {
        let cfg = ScoringCfg::default();
        let mut s = cuts(10);
        s.record_tool_use(Tool::Scraper);
        assert_eq!(compute_bonus(Classification::RootCut, &s, &cfg), Bonus::FLOOR);
    }

    #[test]
    fn untouched_material_scores_by_formula() {
        let cfg = ScoringCfg::default();
        let s = TrimState::new();
        assert!(is_pure_tool_set(Classification::WoodGrind, &s));
        assert_eq!(compute_bonus(Classification::WoodGrind, &s, &cfg), Bonus::FLOOR);
    }

    #[test]
    fn wood_grind_is_floor_then_proportional() {
        let cfg = WoodGrindCfg { min_rotations: 5 };
        assert_eq!(wood_grind_bonus(4, &cfg), Bonus::FLOOR);
        assert_eq!(wood_grind_bonus(5, &cfg), Bonus::NEUTRAL);
        assert!((wood_grind_bonus(6, &cfg).value() - 1.2).abs() < 1e-6);
        assert_eq!(wood_grind_bonus(100, &cfg), Bonus::CEILING);
    }

    #[test]
    fn partial_angle_does_not_help_wood() {
        let cfg = ScoringCfg::default();
        let mut s = TrimState::new();
        s.record_tool_use(Tool::Pestle);
        // Four full turns plus 350 degrees of carry.
        let mut a = 0.0;
        s.record_rotation_sample(a);
        for _ in 0..((4 * 360 + 350) / 10) {
            a += 10.0;
            s.record_rotation_sample(a);
        }
        assert_eq!(s.grind_count(), 4);
        assert_eq!(compute_bonus(Classification::WoodGrind, &s, &cfg), Bonus::FLOOR);
    }

    #[test]
    fn rind_scrape_curve() {
        let cfg = RindScrapeCfg {
            min_strokes: 5,
            allowed_deviation: 20.0,
        };
        assert_eq!(rind_scrape_bonus(4, 0.0, &cfg), Bonus::FLOOR);
        assert_eq!(rind_scrape_bonus(5, 0.0, &cfg), Bonus::CEILING);
        assert_eq!(rind_scrape_bonus(5, 50.0, &cfg), Bonus::NEUTRAL);
        assert_eq!(rind_scrape_bonus(5, 100.0, &cfg), Bonus::FLOOR);
        assert_eq!(rind_scrape_bonus(5, 500.0, &cfg), Bonus::FLOOR);
    }

    #[test]
    fn straight_scrapes_reach_the_ceiling() {
        let cfg = ScoringCfg::default();
        let mut s = TrimState::new();
        s.record_tool_use(Tool::Scraper);
        let (a, b) = (Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        for _ in 0..5 {
            s.record_scrape_stroke(a, b, &[a, Point::new(50.0, 0.0), b]);
        }
        assert_eq!(compute_bonus(Classification::RindScrape, &s, &cfg), Bonus::CEILING);
    }

    #[test]
    fn clamped_handles_nan_and_range() {
        assert_eq!(Bonus::clamped(f32::NAN), Bonus::FLOOR);
        assert_eq!(Bonus::clamped(9.0), Bonus::CEILING);
        assert_eq!(Bonus::clamped(-1.0), Bonus::FLOOR);
        assert_eq!(Bonus::NEUTRAL.to_string(), "1.00");
    }
}
