//! The extraction workbench (`Workbench`).
//!
//! Owns everything a session mutates: the material catalog, the live trim
//! table, the inventory ledger, the unlock flag and the press gate. Input
//! collaborators call the `on_*` methods one event at a time; completed
//! presses are the only path that writes the ledger.

use std::collections::HashMap;
use std::time::Duration;

use extract_traits::UnlockSource;

use crate::builder::{Missing, WorkbenchBuilder};
use crate::config::ScoringCfg;
use crate::error::ExtractError;
use crate::geometry::Point;
use crate::ledger::Ledger;
use crate::material::{Material, MaterialId, Tool};
use crate::press::{PressGate, PressPhase, PressTick};
use crate::quality::{Quality, UnlockFlag, grade};
use crate::scoring::{Bonus, compute_bonus};
use crate::status::{ExtractEvent, ExtractObserver, PressOutcome, PressStatus};
use crate::trim::{TrimProgress, TrimState, TrimTable};

/// Where a material sits on the workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Trimming surface; tool actions are tracked here.
    Board,
    /// Press surface; holding the press completes the extraction.
    Press,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub material: MaterialId,
    pub surface: Surface,
}

pub struct Workbench {
    pub(crate) catalog: HashMap<MaterialId, Material>,
    pub(crate) scoring: ScoringCfg,
    pub(crate) batch_size: u32,
    pub(crate) trims: TrimTable,
    pub(crate) ledger: Ledger,
    pub(crate) unlock: UnlockFlag,
    pub(crate) press: PressGate,
    pub(crate) slot: Option<Placement>,
    pub(crate) observer: Option<Box<dyn ExtractObserver>>,
}

impl core::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Workbench")
            .field("materials", &self.catalog.len())
            .field("slot", &self.slot)
            .field("press", &self.press.phase())
            .field("ledger_entries", &self.ledger.len())
            .field("unlocked", &self.unlock.is_unlocked())
            .finish()
    }
}

impl Workbench {
    /// Start building a Workbench.
    pub fn builder() -> WorkbenchBuilder<Missing> {
        WorkbenchBuilder::default()
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn material(&self, id: &MaterialId) -> Option<&Material> {
        self.catalog.get(id)
    }

    /// Catalog entries sorted by id.
    pub fn materials(&self) -> Vec<&Material> {
        let mut v: Vec<&Material> = self.catalog.values().collect();
        v.sort_by(|a, b| a.id.cmp(&b.id));
        v
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.slot.as_ref()
    }

    pub fn current_material(&self) -> Option<&MaterialId> {
        self.slot.as_ref().map(|p| &p.material)
    }

    pub fn trim_state(&self, id: &MaterialId) -> Option<&TrimState> {
        self.trims.get(id)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn scoring(&self) -> &ScoringCfg {
        &self.scoring
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    pub fn press_phase(&self) -> PressPhase {
        self.press.phase()
    }

    /// Shared handle for the progression system to flip.
    pub fn unlock_handle(&self) -> UnlockFlag {
        self.unlock.clone()
    }

    pub fn is_excellent_unlocked(&self) -> bool {
        self.unlock.is_unlocked()
    }

    /// Score the current state of `id` without committing anything.
    /// Materials with no trim state score as untouched.
    pub fn preview_bonus(&self, id: &MaterialId) -> Option<Bonus> {
        let material = self.catalog.get(id)?;
        let bonus = match self.trims.get(id) {
            Some(state) => compute_bonus(material.classification, state, &self.scoring),
            None => compute_bonus(material.classification, &TrimState::default(), &self.scoring),
        };
        Some(bonus)
    }

    /// Set opening stock for a known material.
    pub fn seed_stock(
        &mut self,
        id: &MaterialId,
        quality: Quality,
        units: u32,
    ) -> Result<(), ExtractError> {
        if !self.catalog.contains_key(id) {
            return Err(ExtractError::UnknownMaterial(id.to_string()));
        }
        self.ledger.seed(id, quality, units);
        Ok(())
    }

    // ── Placement ────────────────────────────────────────────────────────────

    /// Put a material on the board (to trim) or straight onto the press.
    pub fn place(&mut self, id: &MaterialId, surface: Surface) -> Result<(), ExtractError> {
        if !self.catalog.contains_key(id) {
            return Err(ExtractError::UnknownMaterial(id.to_string()));
        }
        if let Some(current) = &self.slot {
            return Err(ExtractError::Occupied(current.material.to_string()));
        }
        // Anything left from an earlier visit is stale.
        self.trims.discard(id);
        self.slot = Some(Placement {
            material: id.clone(),
            surface,
        });
        tracing::info!(material = %id, ?surface, "material placed");
        Ok(())
    }

    /// Move the board material onto the press, keeping its trim state.
    /// Returns the bonus the press would award right now.
    pub fn move_to_press(&mut self) -> Result<Bonus, ExtractError> {
        let Some(slot) = self.slot.as_mut() else {
            return Err(ExtractError::State("nothing on the board".into()));
        };
        if slot.surface == Surface::Press {
            return Err(ExtractError::State(format!(
                "{} is already on the press",
                slot.material
            )));
        }
        slot.surface = Surface::Press;
        let id = slot.material.clone();
        let bonus = self.preview_bonus(&id).unwrap_or(Bonus::FLOOR);
        tracing::info!(material = %id, bonus = bonus.value(), "moved to press");
        self.emit(&ExtractEvent::Preview {
            material: id,
            bonus,
        });
        Ok(bonus)
    }

    /// Take the material off the workbench without pressing.
    /// A running hold is released and the trim state is discarded.
    pub fn withdraw(&mut self) -> Option<MaterialId> {
        let placement = self.slot.take()?;
        if let Some(elapsed) = self.press.release() {
            self.emit(&ExtractEvent::PressReleased {
                material: placement.material.clone(),
                elapsed,
            });
        }
        let had_state = self.trims.discard(&placement.material);
        tracing::info!(material = %placement.material, had_state, "material withdrawn");
        Some(placement.material)
    }

    // ── Trim actions ─────────────────────────────────────────────────────────
    //
    // Each is a no-op (None) unless `id` is the material on the board.

    pub fn on_tool_touch(&mut self, id: &MaterialId, tool: Tool) -> Option<TrimProgress> {
        self.track(id, |s| s.record_tool_use(tool))
    }

    pub fn on_cut(&mut self, id: &MaterialId) -> Option<TrimProgress> {
        self.track(id, TrimState::record_cut)
    }

    pub fn on_rotation_sample(&mut self, id: &MaterialId, angle_deg: f32) -> Option<TrimProgress> {
        self.track(id, |s| {
            s.record_rotation_sample(angle_deg);
        })
    }

    /// End the grinding stroke in progress so the next sample starts a new one.
    pub fn on_rotation_end(&mut self, id: &MaterialId) -> bool {
        if !self.is_trimming(id) {
            return false;
        }
        self.trims.entry(id).end_rotation();
        true
    }

    pub fn on_scrape_stroke(
        &mut self,
        id: &MaterialId,
        start: Point,
        end: Point,
        path: &[Point],
    ) -> Option<TrimProgress> {
        self.track(id, |s| {
            s.record_scrape_stroke(start, end, path);
        })
    }

    fn is_trimming(&self, id: &MaterialId) -> bool {
        matches!(&self.slot, Some(p) if p.surface == Surface::Board && &p.material == id)
    }

    fn track(
        &mut self,
        id: &MaterialId,
        apply: impl FnOnce(&mut TrimState),
    ) -> Option<TrimProgress> {
        if !self.is_trimming(id) {
            tracing::trace!(material = %id, "trim action ignored; not on the board");
            return None;
        }
        let state = self.trims.entry(id);
        apply(state);
        let progress = state.progress(id);
        self.emit(&ExtractEvent::Progress(progress.clone()));
        Some(progress)
    }

    // ── Press ────────────────────────────────────────────────────────────────

    /// Start a hold. Only a material on the press surface can be pressed.
    pub fn press_engage(&mut self) -> bool {
        if !matches!(&self.slot, Some(p) if p.surface == Surface::Press) {
            tracing::warn!("press engaged with nothing on the press");
            return false;
        }
        self.press.engage()
    }

    /// Advance the hold by one frame, engaging it first if needed.
    pub fn on_press_held(&mut self, dt: Duration) -> PressStatus {
        if !self.press.is_holding() && !self.press_engage() {
            return PressStatus::Idle;
        }
        match self.press.tick(dt) {
            PressTick::Idle => PressStatus::Idle,
            PressTick::Holding { elapsed, remaining } => PressStatus::Holding { elapsed, remaining },
            PressTick::Fired { elapsed } => self.complete(elapsed),
        }
    }

    /// Let go of the press. Before the threshold nothing is scored.
    pub fn on_press_released(&mut self) -> PressStatus {
        let Some(elapsed) = self.press.release() else {
            return PressStatus::Idle;
        };
        if let Some(p) = &self.slot {
            tracing::info!(
                material = %p.material,
                elapsed_ms = elapsed.as_millis() as u64,
                hold_ms = self.press.hold().as_millis() as u64,
                "press released early"
            );
            let event = ExtractEvent::PressReleased {
                material: p.material.clone(),
                elapsed,
            };
            self.emit(&event);
        }
        PressStatus::Released { elapsed }
    }

    fn complete(&mut self, elapsed: Duration) -> PressStatus {
        let Some(placement) = self.slot.take() else {
            tracing::warn!("press fired with an empty workbench");
            return PressStatus::Idle;
        };
        let id = placement.material;
        let Some(material) = self.catalog.get(&id) else {
            tracing::warn!(material = %id, "press fired for a material missing from the catalog");
            return PressStatus::Idle;
        };

        let state = self.trims.take(&id).unwrap_or_default();
        let bonus = compute_bonus(material.classification, &state, &self.scoring);
        let quality = grade(bonus, &self.unlock);
        let total_units = self.ledger.commit(&id, quality, self.batch_size);

        tracing::info!(
            material = %id,
            %quality,
            bonus = bonus.value(),
            units = self.batch_size,
            total_units,
            elapsed_ms = elapsed.as_millis() as u64,
            "press complete"
        );

        let outcome = PressOutcome {
            material: id,
            quality,
            bonus,
            units_added: self.batch_size,
            total_units,
        };
        self.emit(&ExtractEvent::PressCompleted(outcome.clone()));
        PressStatus::Completed(outcome)
    }

    fn emit(&mut self, event: &ExtractEvent) {
        if let Some(obs) = self.observer.as_mut() {
            obs.on_event(event);
        }
    }
}
