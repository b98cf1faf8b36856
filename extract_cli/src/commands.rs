//! Config loading, workbench assembly and the one-shot commands.

use std::path::Path;

use eyre::{Result, WrapErr};
use extract_core::error::ExtractError;
use extract_core::{
    ExtractObserver, MaterialId, Point, Quality, Surface, Tool, Workbench, grade,
};
use serde_json::json;

/// Read, parse and validate the config TOML. Any failure is a config error.
pub fn load_config(path: &Path) -> Result<extract_config::Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| config_error(format!("read config {}: {e}", path.display())))?;
    let cfg = extract_config::load_toml(&text)
        .map_err(|e| config_error(format!("parse config {}: {e}", path.display())))?;
    cfg.validate().map_err(|e| config_error(format!("{e}")))?;
    Ok(cfg)
}

fn config_error(msg: String) -> eyre::Report {
    eyre::Report::new(ExtractError::Config(msg))
}

/// Build the workbench from config and seed it with opening stock.
pub fn assemble(
    cfg: &extract_config::Config,
    stock: Option<&Path>,
    observer: Option<impl ExtractObserver + 'static>,
) -> Result<Workbench> {
    let builder = Workbench::builder().with_config(cfg);
    let builder = match observer {
        Some(obs) => builder.with_observer(obs),
        None => builder,
    };
    let mut wb = builder.build()?;

    if let Some(path) = stock {
        let rows = extract_config::load_stock_csv(path).map_err(|e| config_error(format!("{e}")))?;
        for (idx, row) in rows.iter().enumerate() {
            let id = MaterialId::new(row.material.trim());
            wb.seed_stock(&id, Quality::from(row.quality), row.units)
                .map_err(|_| {
                    config_error(format!(
                        "stock row {}: unknown material {:?}",
                        idx + 1,
                        row.material
                    ))
                })?;
        }
        tracing::info!(rows = rows.len(), "opening stock seeded");
    }
    Ok(wb)
}

/// `check`: print the catalog and the current shelf.
pub fn check(wb: &Workbench, json: bool) {
    let shelf = wb.ledger().materials_in_stock();
    if json {
        let materials: Vec<_> = wb
            .materials()
            .into_iter()
            .map(|m| {
                json!({
                    "id": m.id.as_str(),
                    "name": m.display_name,
                    "classification": m.classification.name(),
                })
            })
            .collect();
        let shelf: Vec<_> = shelf.iter().map(MaterialId::as_str).collect();
        println!(
            "{}",
            json!({ "ok": true, "materials": materials, "in_stock": shelf })
        );
        return;
    }
    println!("config ok: {} materials", wb.materials().len());
    for m in wb.materials() {
        println!("  {:<16} {:<12} {}", m.id, m.classification, m.display_name);
    }
    if !shelf.is_empty() {
        let names: Vec<_> = shelf.iter().map(MaterialId::as_str).collect();
        println!("in stock: {}", names.join(", "));
    }
}

/// Synthetic processing state for `score`.
#[derive(Debug, Clone, Default)]
pub struct ScoreInput {
    pub material: String,
    pub tools: Vec<Tool>,
    pub chops: u32,
    pub rotations: u32,
    pub strokes: u32,
    pub deviation: f32,
}

/// Run the input through a scratch workbench and grade the preview. The ledger is untouched.
pub fn score(wb: &mut Workbench, input: &ScoreInput, json: bool) -> Result<()> {
    if !(input.deviation.is_finite() && input.deviation >= 0.0) {
        eyre::bail!("--deviation must be finite and >= 0");
    }
    let id = MaterialId::new(&input.material);
    wb.place(&id, Surface::Board)?;

    for &tool in &input.tools {
        wb.on_tool_touch(&id, tool);
    }
    for _ in 0..input.chops {
        wb.on_cut(&id);
    }
    // Quarter turns: four deltas of 90° per rotation.
    wb.on_rotation_sample(&id, 0.0);
    for i in 1..=input.rotations.saturating_mul(4) {
        wb.on_rotation_sample(&id, (i % 4) as f32 * 90.0);
    }
    wb.on_rotation_end(&id);
    // Two samples at ±deviation from a 100-unit chord average to exactly `deviation`.
    let d = input.deviation;
    let path = [Point::new(25.0, d), Point::new(75.0, -d)];
    for _ in 0..input.strokes {
        wb.on_scrape_stroke(&id, Point::new(0.0, 0.0), Point::new(100.0, 0.0), &path);
    }

    let bonus = wb
        .preview_bonus(&id)
        .ok_or_else(|| ExtractError::UnknownMaterial(id.to_string()))?;
    let quality = grade(bonus, &wb.unlock_handle());
    let classification = wb
        .material(&id)
        .map(|m| m.classification.name())
        .unwrap_or_default();
    wb.withdraw()
        .ok_or_else(|| eyre::eyre!("scratch material vanished"))
        .wrap_err("score")?;

    if json {
        println!(
            "{}",
            json!({
                "material": id.as_str(),
                "classification": classification,
                "bonus": bonus.value(),
                "quality": quality.name(),
            })
        );
    } else {
        println!("{id} ({classification}): bonus {bonus} -> {quality}");
    }
    Ok(())
}
