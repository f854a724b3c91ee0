use std::path::Path;

use anyhow::{bail, Context, Result};

use ssp_dataprep::config::DEFAULT_GRID_STEP;
use ssp_dataprep::geometry::read_bounds;
use ssp_dataprep::RoundingMode;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: inspect_boundary <boundary.gpkg|boundary.geojson> [grid-step]");
    };
    let step = match args.next() {
        Some(raw) => raw.parse::<f64>().with_context(|| format!("Invalid grid step '{}'", raw))?,
        None => DEFAULT_GRID_STEP,
    };

    let bounds = read_bounds(Path::new(&path)).with_context(|| format!("Failed to read {}", path))?;
    println!("Raw bounds:");
    println!("  - left {} bottom {} right {} top {}", bounds.left(), bounds.bottom(), bounds.right(), bounds.top());

    for mode in [RoundingMode::Outward, RoundingMode::Legacy] {
        let snapped = bounds.snap(step, mode)?;
        println!("Snapped ({}, grid {}):", mode, step);
        println!("  - left {} bottom {} right {} top {}", snapped.left(), snapped.bottom(), snapped.right(), snapped.top());
        println!("  - contains boundary: {}", snapped.contains(&bounds));
    }

    Ok(())
}
