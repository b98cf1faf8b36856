//! Per-material processing state and the table that owns it.
//!
//! A `TrimState` lives only while its material is being worked. The table
//! creates it lazily on first touch and hands it out by value when the press
//! completes, so discarding is an explicit removal.

use std::collections::{BTreeSet, HashMap};

use crate::geometry::{FULL_TURN_DEG, Point, RotationAccumulator, line_deviation};
use crate::material::{MaterialId, Tool};

/// Accumulated trim actions for one material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrimState {
    used_tools: BTreeSet<Tool>,
    chop_count: u32,
    grind_angle_sum: f32,
    grind_count: u32,
    rotation: RotationAccumulator,
    // Baseline for the stroke in progress; None until its first sample.
    grind_prev_angle: Option<f32>,
    scrape_deviation_sum: f32,
    scrape_count: u32,
}

impl TrimState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn used_tools(&self) -> &BTreeSet<Tool> {
        &self.used_tools
    }
    pub fn chop_count(&self) -> u32 {
        self.chop_count
    }
    pub fn grind_angle_sum(&self) -> f32 {
        self.grind_angle_sum
    }
    pub fn grind_count(&self) -> u32 {
        self.grind_count
    }
    /// Degrees carried towards the next full rotation.
    pub fn grind_current_angle(&self) -> f32 {
        self.rotation.carry()
    }
    pub fn scrape_deviation_sum(&self) -> f32 {
        self.scrape_deviation_sum
    }
    pub fn scrape_count(&self) -> u32 {
        self.scrape_count
    }

    pub fn record_tool_use(&mut self, tool: Tool) {
        self.used_tools.insert(tool);
    }

    pub fn record_cut(&mut self) {
        self.chop_count = self.chop_count.saturating_add(1);
        tracing::debug!(chop_count = self.chop_count, "cut recorded");
    }

    /// Feed one angle sample of a grinding stroke.
    /// The first sample of a stroke only sets the baseline.
    /// Returns the number of rotations this sample completed.
    pub fn record_rotation_sample(&mut self, angle_deg: f32) -> u32 {
        if !angle_deg.is_finite() {
            return 0;
        }
        let Some(prev) = self.grind_prev_angle.replace(angle_deg) else {
            return 0;
        };
        let completed = self.rotation.accumulate(prev, angle_deg);
        if completed > 0 {
            self.grind_count = self.grind_count.saturating_add(completed);
            self.grind_angle_sum += FULL_TURN_DEG * completed as f32;
            tracing::debug!(grind_count = self.grind_count, "rotation completed");
        }
        completed
    }

    /// Close the current grinding stroke; the carry buffer is kept.
    pub fn end_rotation(&mut self) {
        self.grind_prev_angle = None;
    }

    /// Record one finished scraping stroke and return its average deviation.
    pub fn record_scrape_stroke(&mut self, start: Point, end: Point, path: &[Point]) -> f32 {
        let deviation = line_deviation(start, end, path);
        self.scrape_deviation_sum += deviation;
        self.scrape_count = self.scrape_count.saturating_add(1);
        tracing::debug!(
            scrape_count = self.scrape_count,
            deviation,
            "scrape stroke recorded"
        );
        deviation
    }

    /// Counters for UI feedback.
    pub fn progress(&self, material: &MaterialId) -> TrimProgress {
        TrimProgress {
            material: material.clone(),
            chop_count: self.chop_count,
            grind_count: self.grind_count,
            scrape_count: self.scrape_count,
        }
    }
}

/// Progress counters emitted after each discrete sub-action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimProgress {
    pub material: MaterialId,
    pub chop_count: u32,
    pub grind_count: u32,
    pub scrape_count: u32,
}

/// Table of live processing states keyed by material id.
#[derive(Debug, Default)]
pub struct TrimTable {
    states: HashMap<MaterialId, TrimState>,
}

impl TrimTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `id`, created on first touch.
    pub fn entry(&mut self, id: &MaterialId) -> &mut TrimState {
        self.states.entry(id.clone()).or_default()
    }

    pub fn get(&self, id: &MaterialId) -> Option<&TrimState> {
        self.states.get(id)
    }

    /// Remove and return the state for `id`.
    pub fn take(&mut self, id: &MaterialId) -> Option<TrimState> {
        self.states.remove(id)
    }

    /// Drop the state for `id`; returns whether one existed.
    pub fn discard(&mut self, id: &MaterialId) -> bool {
        self.states.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
