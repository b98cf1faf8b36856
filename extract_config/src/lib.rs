#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and opening-stock parsing for the extraction workbench.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional; defaults match the shipped tuning.
//! - Opening stock CSV loader enforces exact headers.
use std::collections::HashSet;

use serde::Deserialize;

/// Material classification as written in TOML.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationName {
    RootCut,
    WoodGrind,
    RindScrape,
}

/// Quality tier as written in TOML/CSV.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QualityName {
    Low,
    Normal,
    Good,
    Excellent,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MaterialEntry {
    pub id: String,
    /// Display name; falls back to the id when absent.
    #[serde(default)]
    pub name: Option<String>,
    pub classification: ClassificationName,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RootCfg {
    pub min_chops: u32,
    pub optimal_chops: u32,
    pub max_chops: u32,
}

impl Default for RootCfg {
    fn default() -> Self {
        Self {
            min_chops: 5,
            optimal_chops: 10,
            max_chops: 15,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WoodCfg {
    /// Completed 360° rotations required before any credit is given
    pub min_rotations: u32,
}

impl Default for WoodCfg {
    fn default() -> Self {
        Self { min_rotations: 5 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RindCfg {
    /// Completed strokes required before any credit is given
    pub min_strokes: u32,
    /// Average deviation (caller units, usually px) at which the bonus hits the floor
    pub allowed_deviation: f32,
}

impl Default for RindCfg {
    fn default() -> Self {
        Self {
            min_strokes: 5,
            allowed_deviation: 20.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TrimCfg {
    pub root: RootCfg,
    pub wood: WoodCfg,
    pub rind: RindCfg,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PressCfg {
    /// Seconds the press must be held before it completes
    pub hold_secs: f32,
    /// Units credited to the ledger per completed press
    pub batch_size: u32,
}

impl Default for PressCfg {
    fn default() -> Self {
        Self {
            hold_secs: 2.0,
            batch_size: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Progression {
    /// Initial state of the Excellent unlock
    pub excellent_unlocked: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub trim: TrimCfg,
    pub press: PressCfg,
    pub progression: Progression,
    pub logging: Logging,
    pub materials: Vec<MaterialEntry>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Root
        let root = &self.trim.root;
        if root.min_chops >= root.optimal_chops {
            eyre::bail!("trim.root.min_chops must be < trim.root.optimal_chops");
        }
        if root.optimal_chops >= root.max_chops {
            eyre::bail!("trim.root.optimal_chops must be < trim.root.max_chops");
        }

        // Wood
        if self.trim.wood.min_rotations == 0 {
            eyre::bail!("trim.wood.min_rotations must be >= 1");
        }

        // Rind
        if self.trim.rind.min_strokes == 0 {
            eyre::bail!("trim.rind.min_strokes must be >= 1");
        }
        let dev = self.trim.rind.allowed_deviation;
        if !(dev.is_finite() && dev > 0.0) {
            eyre::bail!("trim.rind.allowed_deviation must be finite and > 0");
        }

        // Press
        let hold = self.press.hold_secs;
        if !(hold.is_finite() && hold > 0.0) {
            eyre::bail!("press.hold_secs must be finite and > 0");
        }
        if hold > 10.0 * 60.0 {
            eyre::bail!("press.hold_secs is unreasonably large (>10min)");
        }
        if self.press.batch_size == 0 {
            eyre::bail!("press.batch_size must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
            }
        }

        // Materials
        let mut seen = HashSet::new();
        for (idx, m) in self.materials.iter().enumerate() {
            if m.id.trim().is_empty() {
                eyre::bail!("materials[{idx}].id must not be empty");
            }
            if !seen.insert(m.id.as_str()) {
                eyre::bail!("materials[{idx}].id {:?} is a duplicate", m.id);
            }
        }

        Ok(())
    }

    /// Look up a configured material by id.
    pub fn material(&self, id: &str) -> Option<&MaterialEntry> {
        self.materials.iter().find(|m| m.id == id)
    }
}

/// Opening stock CSV schema.
///
/// Expected headers:
/// material,quality,units
///
/// Example:
/// material,quality,units
/// vetiver,normal,30
/// sandalwood,good,10
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StockRow {
    pub material: String,
    pub quality: QualityName,
    pub units: u32,
}

pub fn load_stock_csv(path: &std::path::Path) -> eyre::Result<Vec<StockRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open stock CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["material", "quality", "units"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "stock CSV must have headers 'material,quality,units', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<StockRow>().enumerate() {
        match rec {
            Ok(row) => {
                if row.material.is_empty() {
                    eyre::bail!("invalid CSV row {}: empty material", idx + 2);
                }
                rows.push(row);
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(rows)
}
