//! Scene file loading

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use zorder_core::{Canvas, Scene};

/// Read and parse a scene file
pub fn load(path: &Path) -> Result<Scene> {
    if !path.is_file() {
        anyhow::bail!("No scene file at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Scene::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load a scene, record it and finalize the canvas
pub fn record_and_finalize(path: &Path) -> Result<Canvas> {
    let scene = load(path)?;
    let mut canvas = scene
        .record()
        .with_context(|| format!("Failed to record {}", path.display()))?;
    canvas.finalize()?;

    tracing::info!(
        scene = %path.display(),
        draws = canvas.device().len(),
        "scene finalized"
    );
    Ok(canvas)
}
