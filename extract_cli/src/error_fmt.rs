//! Human-readable error descriptions and structured JSON error formatting.

use extract_core::error::{BuildError, ExtractError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingMaterials => {
                "What happened: The material catalog is empty.\nLikely causes: The config has no [[materials]] entries.\nHow to fix: Add at least one [[materials]] table with id and classification.".to_string()
            }
            BuildError::DuplicateMaterial(id) => format!(
                "What happened: Material id {id:?} is listed more than once.\nLikely causes: Copy-pasted [[materials]] entry.\nHow to fix: Give every material a unique id."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/extract_config.toml for a sample."
            ),
        };
    }

    if let Some(ee) = err.downcast_ref::<ExtractError>() {
        return match ee {
            ExtractError::Config(msg) if msg.to_ascii_lowercase().contains("must have headers") => {
                "Invalid headers in stock CSV. Expected 'material,quality,units'.".to_string()
            }
            ExtractError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML or stock CSV.\nHow to fix: Run `extract_cli check` and fix the reported field."
            ),
            ExtractError::UnknownMaterial(id) => format!(
                "What happened: Unknown material {id:?}.\nLikely causes: Typo in the material id, or the material is missing from [[materials]].\nHow to fix: Run `extract_cli check` to list known ids."
            ),
            ExtractError::Occupied(id) => format!(
                "What happened: The workbench already holds {id:?}.\nLikely causes: A place step without a preceding withdraw or completed press.\nHow to fix: Withdraw or press the current material first."
            ),
            ExtractError::State(msg) => format!(
                "What happened: {msg}.\nLikely causes: Steps out of order in the replay script.\nHow to fix: Place a material on the board before moving it to the press."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("replay script") {
        let mut cause = String::new();
        if let Some(src) = err.source() {
            cause = format!(" Cause: {src}");
        }
        return format!(
            "What happened: The replay script could not be used.{cause}\nHow to fix: Check the [[step]] tables; every step needs an action."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: configuration and build errors 2, workbench state errors 3, anything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<ExtractError>() {
        Some(ExtractError::Config(_)) => 2,
        Some(_) => 3,
        None => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    match err.downcast_ref::<ExtractError>() {
        Some(ExtractError::Config(_)) => "Config",
        Some(ExtractError::UnknownMaterial(_)) => "UnknownMaterial",
        Some(ExtractError::Occupied(_)) => "Occupied",
        Some(ExtractError::State(_)) => "State",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
