// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Start-up initialization for runtime directories and bundled assets
//!
//! Runs once before the server binds. Creates the upload and weights
//! directories and renders the attention overlay sample that UI clients
//! fetch alongside diagnoses. Existing files are never overwritten, so
//! operator-provided assets survive restarts.

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Overlay asset served at /static/heatmap_sample.png
pub const HEATMAP_SAMPLE: &str = "heatmap_sample.png";

const OVERLAY_EDGE: u32 = 512;
const OVERLAY_CENTER: i64 = 250;
const OUTER_RADIUS: i64 = 100;
const INNER_RADIUS: i64 = 50;

/// Prepare the filesystem surface the node needs at runtime
pub fn initialize(static_dir: &Path, weights_dir: &Path) -> Result<()> {
    fs::create_dir_all(static_dir)
        .with_context(|| format!("Failed to create static dir {}", static_dir.display()))?;
    fs::create_dir_all(weights_dir)
        .with_context(|| format!("Failed to create weights dir {}", weights_dir.display()))?;

    let heatmap_path = static_dir.join(HEATMAP_SAMPLE);
    if heatmap_path.exists() {
        debug!("Overlay sample already present at {}", heatmap_path.display());
    } else {
        render_overlay_sample()
            .save(&heatmap_path)
            .with_context(|| format!("Failed to write {}", heatmap_path.display()))?;
        info!("✅ Generated overlay sample at {}", heatmap_path.display());
    }

    Ok(())
}

/// Translucent red disc with a yellow core on a transparent canvas
///
/// The inner disc replaces rather than blends, matching how the asset has
/// always looked to clients.
fn render_overlay_sample() -> RgbaImage {
    let mut img = RgbaImage::new(OVERLAY_EDGE, OVERLAY_EDGE);

    for y in 0..OVERLAY_EDGE {
        for x in 0..OVERLAY_EDGE {
            let dx = x as i64 - OVERLAY_CENTER;
            let dy = y as i64 - OVERLAY_CENTER;
            let d2 = dx * dx + dy * dy;

            if d2 <= INNER_RADIUS * INNER_RADIUS {
                img.put_pixel(x, y, Rgba([255, 255, 0, 150]));
            } else if d2 <= OUTER_RADIUS * OUTER_RADIUS {
                img.put_pixel(x, y, Rgba([255, 0, 0, 100]));
            }
        }
    }

    img
}
