//! `From` implementations bridging `extract_config` types to `extract_core` types.

use crate::config::{PressCfg, RindScrapeCfg, RootCutCfg, ScoringCfg, WoodGrindCfg};
use crate::material::{Classification, Material};
use crate::quality::Quality;
use crate::util::secs_to_duration;

// ── Scoring ──────────────────────────────────────────────────────────────────

impl From<&extract_config::RootCfg> for RootCutCfg {
    fn from(c: &extract_config::RootCfg) -> Self {
        Self {
            min_chops: c.min_chops,
            optimal_chops: c.optimal_chops,
            max_chops: c.max_chops,
        }
    }
}

impl From<&extract_config::WoodCfg> for WoodGrindCfg {
    fn from(c: &extract_config::WoodCfg) -> Self {
        Self {
            min_rotations: c.min_rotations,
        }
    }
}

impl From<&extract_config::RindCfg> for RindScrapeCfg {
    fn from(c: &extract_config::RindCfg) -> Self {
        Self {
            min_strokes: c.min_strokes,
            allowed_deviation: c.allowed_deviation,
        }
    }
}

impl From<&extract_config::TrimCfg> for ScoringCfg {
    fn from(c: &extract_config::TrimCfg) -> Self {
        Self {
            root: (&c.root).into(),
            wood: (&c.wood).into(),
            rind: (&c.rind).into(),
        }
    }
}

// ── Press ────────────────────────────────────────────────────────────────────

impl From<&extract_config::PressCfg> for PressCfg {
    fn from(c: &extract_config::PressCfg) -> Self {
        Self {
            hold: secs_to_duration(c.hold_secs),
            batch_size: c.batch_size,
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

impl From<extract_config::ClassificationName> for Classification {
    fn from(c: extract_config::ClassificationName) -> Self {
        match c {
            extract_config::ClassificationName::RootCut => Classification::RootCut,
            extract_config::ClassificationName::WoodGrind => Classification::WoodGrind,
            extract_config::ClassificationName::RindScrape => Classification::RindScrape,
        }
    }
}

impl From<extract_config::QualityName> for Quality {
    fn from(q: extract_config::QualityName) -> Self {
        match q {
            extract_config::QualityName::Low => Quality::Low,
            extract_config::QualityName::Normal => Quality::Normal,
            extract_config::QualityName::Good => Quality::Good,
            extract_config::QualityName::Excellent => Quality::Excellent,
        }
    }
}

impl From<&extract_config::MaterialEntry> for Material {
    fn from(e: &extract_config::MaterialEntry) -> Self {
        let m = Material::new(e.id.trim(), e.classification.into());
        match e.name.as_deref() {
            Some(name) if !name.trim().is_empty() => m.with_display_name(name),
            _ => m,
        }
    }
}
