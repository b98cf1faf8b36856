//! Type-state builder for `Workbench`.
//!
//! `build()` is only available once a material catalog has been supplied;
//! `try_build()` is always available and reports what is missing.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::config::{PressCfg, ScoringCfg};
use crate::error::{BuildError, Result};
use crate::ledger::Ledger;
use crate::material::{Material, MaterialId};
use crate::press::PressGate;
use crate::quality::UnlockFlag;
use crate::status::ExtractObserver;
use crate::trim::TrimTable;
use crate::workbench::Workbench;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Workbench`. All fields are validated on `build()`.
pub struct WorkbenchBuilder<C> {
    materials: Option<Vec<Material>>,
    scoring: Option<ScoringCfg>,
    press: Option<PressCfg>,
    unlock: Option<UnlockFlag>,
    observer: Option<Box<dyn ExtractObserver>>,
    _c: PhantomData<C>,
}

impl Default for WorkbenchBuilder<Missing> {
    fn default() -> Self {
        Self {
            materials: None,
            scoring: None,
            press: None,
            unlock: None,
            observer: None,
            _c: PhantomData,
        }
    }
}

/// Check the runtime config and assemble an empty workbench.
fn validate_and_build(
    materials: Vec<Material>,
    scoring: ScoringCfg,
    press: PressCfg,
    unlock: UnlockFlag,
    observer: Option<Box<dyn ExtractObserver>>,
) -> Result<Workbench> {
    // ── Validation ───────────────────────────────────────────────────────────
    if materials.is_empty() {
        return Err(eyre::Report::new(BuildError::MissingMaterials));
    }
    scoring
        .check()
        .map_err(|msg| eyre::Report::new(BuildError::InvalidConfig(msg)))?;
    press
        .check()
        .map_err(|msg| eyre::Report::new(BuildError::InvalidConfig(msg)))?;

    let mut catalog: HashMap<MaterialId, Material> = HashMap::with_capacity(materials.len());
    for m in materials {
        if m.id.as_str().trim().is_empty() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "material id must not be empty",
            )));
        }
        if catalog.contains_key(&m.id) {
            return Err(eyre::Report::new(BuildError::DuplicateMaterial(
                m.id.to_string(),
            )));
        }
        catalog.insert(m.id.clone(), m);
    }

    tracing::debug!(
        materials = catalog.len(),
        hold_ms = press.hold.as_millis() as u64,
        batch_size = press.batch_size,
        "workbench built"
    );

    Ok(Workbench {
        catalog,
        scoring,
        batch_size: press.batch_size,
        trims: TrimTable::new(),
        ledger: Ledger::new(),
        unlock,
        press: PressGate::new(press.hold),
        slot: None,
        observer,
    })
}

impl<C> WorkbenchBuilder<C> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Workbench> {
        let materials = self
            .materials
            .ok_or_else(|| eyre::Report::new(BuildError::MissingMaterials))?;
        validate_and_build(
            materials,
            self.scoring.unwrap_or_default(),
            self.press.unwrap_or_default(),
            self.unlock.unwrap_or_default(),
            self.observer,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<C> WorkbenchBuilder<C> {
    pub fn with_scoring(mut self, scoring: ScoringCfg) -> Self {
        self.scoring = Some(scoring);
        self
    }
    pub fn with_press(mut self, press: PressCfg) -> Self {
        self.press = Some(press);
        self
    }
    /// Share an unlock flag owned by the progression system.
    pub fn with_unlock(mut self, unlock: UnlockFlag) -> Self {
        self.unlock = Some(unlock);
        self
    }
    pub fn with_excellent_unlocked(mut self, unlocked: bool) -> Self {
        self.unlock = Some(UnlockFlag::new(unlocked));
        self
    }
    pub fn with_observer(mut self, observer: impl ExtractObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }
}

// Setters that advance type-state
impl WorkbenchBuilder<Missing> {
    pub fn with_materials(
        self,
        materials: impl IntoIterator<Item = Material>,
    ) -> WorkbenchBuilder<Set> {
        WorkbenchBuilder {
            materials: Some(materials.into_iter().collect()),
            scoring: self.scoring,
            press: self.press,
            unlock: self.unlock,
            observer: self.observer,
            _c: PhantomData,
        }
    }

    /// Take catalog, tuning and the initial unlock state from a loaded config.
    pub fn with_config(self, cfg: &extract_config::Config) -> WorkbenchBuilder<Set> {
        self.with_scoring(ScoringCfg::from(&cfg.trim))
            .with_press(PressCfg::from(&cfg.press))
            .with_excellent_unlocked(cfg.progression.excellent_unlocked)
            .with_materials(cfg.materials.iter().map(Material::from))
    }
}

impl WorkbenchBuilder<Set> {
    /// Build the workbench.
    pub fn build(self) -> Result<Workbench> {
        self.try_build()
    }
}
