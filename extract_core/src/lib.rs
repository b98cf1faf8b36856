#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Scoring engine for the extraction workbench.
//!
//! Turns a stream of discrete trimming inputs (tool touches, cuts, rotation
//! samples, scrape strokes) into a bonus multiplier, grades it into a quality
//! tier and credits a fixed batch to the inventory ledger once the press has
//! been held long enough. Rendering, input capture and persistence live
//! elsewhere; everything here is driven through `Workbench`.
//!
//! ## Architecture
//!
//! - **Geometry**: angle wrapping, rotation counting, line deviation (`geometry`)
//! - **Tracking**: per-material processing state (`trim`)
//! - **Scoring**: classification formulas and tool purity (`scoring`)
//! - **Quality**: bonus thresholds and the Excellent unlock (`quality`)
//! - **Ledger**: quantities per (material, quality) (`ledger`)
//! - **Press**: hold-to-complete gate and frame timing (`press`)
//! - **Workbench**: placement, dispatch and commit (`workbench`, `builder`)
//!
//! All bonuses are `f32` clamped to `[0.5, 1.5]`; durations are `std::time::Duration`.

pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod geometry;
pub mod ledger;
pub mod material;
pub mod mocks;
pub mod press;
pub mod quality;
pub mod scoring;
pub mod status;
pub mod trim;
pub mod util;
pub mod workbench;

pub use builder::{Missing, Set, WorkbenchBuilder};
pub use config::{PressCfg, RindScrapeCfg, RootCutCfg, ScoringCfg, WoodGrindCfg};
pub use error::{BuildError, ExtractError, Report, Result};
pub use geometry::{Point, RotationAccumulator, delta_angle, line_deviation};
pub use ledger::Ledger;
pub use material::{Classification, Material, MaterialId, Tool};
pub use press::{FrameTimer, PressGate, PressPhase, PressTick};
pub use quality::{Quality, UnlockFlag, classify_bonus, grade};
pub use scoring::{Bonus, compute_bonus, is_pure_tool_set};
pub use status::{ExtractEvent, ExtractObserver, PressOutcome, PressStatus};
pub use trim::{TrimProgress, TrimState, TrimTable};
pub use workbench::{Placement, Surface, Workbench};
