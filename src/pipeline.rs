//! Staging Pipeline
//!
//! Resolve paths, select inputs, copy them into place, emit metadata.
//! Every input is located and the boundary read before the first output is
//! written, so a bad input tree leaves the outputs untouched.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::bbox::{BoundingBox, RoundingMode};
use crate::config::RunConfig;
use crate::error::Result;
use crate::geometry;
use crate::materialize::{self, StagedFile};
use crate::metadata::{self, METADATA_STEM};
use crate::paths::DataPaths;
use crate::select::{self, FileRef, INPUT_PATTERN};

/// Inputs chosen for the run, before anything is written
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub boundary: PathBuf,
    pub lads: PathBuf,
    pub scenario: FileRef,
    pub raw_bounds: BoundingBox,
    pub snapped_bounds: BoundingBox,
}

/// Everything a completed run wrote
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub boundary: StagedFile,
    pub lads: StagedFile,
    pub scenario: StagedFile,
    pub parameters: PathBuf,
    pub metadata: PathBuf,
    pub raw_bounds: BoundingBox,
    pub snapped_bounds: BoundingBox,
}

/// Locate the inputs and compute the catalog bounding box.
pub fn select_inputs(paths: &DataPaths, config: &RunConfig) -> Result<Selection> {
    let boundary = select::select_single(&paths.boundary_input, INPUT_PATTERN)?;
    let lads = select::select_single(&paths.lads_input, INPUT_PATTERN)?;
    let scenario = select::select_scenario(&paths.ssps_input, &config.scenario)?;

    let raw_bounds = geometry::read_bounds(&boundary)?;
    if config.rounding == RoundingMode::Legacy {
        warn!("⚠️  Legacy bounding box rounding: right/top edges round down and may clip the boundary");
    }
    let snapped_bounds = raw_bounds.snap(config.grid_step, config.rounding)?;

    Ok(Selection {
        boundary,
        lads,
        scenario,
        raw_bounds,
        snapped_bounds,
    })
}

/// Run every stage for one scenario/country.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let paths = DataPaths::resolve(&config.data_root);
    info!(root = %paths.root.display(), scenario = %config.scenario, country = %config.country, "🚀 Staging run started");

    let selection = select_inputs(&paths, config)?;
    info!(
        boundary = %selection.boundary.display(),
        lads = %selection.lads.display(),
        scenario = %selection.scenario.path.display(),
        "Inputs selected"
    );

    paths.create_output_dirs()?;

    let boundary = materialize::stage_file(
        &selection.boundary,
        &materialize::boundary_destination(&paths, config),
    )?;
    let lads = materialize::stage_file(&selection.lads, &materialize::lads_destination(&paths, config))?;
    let scenario = materialize::stage_file(
        &selection.scenario.path,
        &materialize::scenario_destination(&paths, &selection.scenario),
    )?;
    let parameters = materialize::write_parameters(&paths, config)?;

    let metadata = metadata::write_metadata(
        &paths.metadata_output,
        &config.title(),
        &config.description(),
        selection.snapped_bounds.to_polygon(),
        METADATA_STEM,
    )?;

    info!(
        raw = ?selection.raw_bounds,
        snapped = ?selection.snapped_bounds,
        grid = config.grid_step,
        rounding = %config.rounding,
        "✅ Staging run complete"
    );

    Ok(RunReport {
        boundary,
        lads,
        scenario,
        parameters,
        metadata,
        raw_bounds: selection.raw_bounds,
        snapped_bounds: selection.snapped_bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataPrepError;
    use crate::geometry::gpkg::tests::{gp_blob, write_gpkg};
    use crate::geometry::wkb::tests::polygon_le;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn config(root: &Path) -> RunConfig {
        RunConfig {
            data_root: root.to_path_buf(),
            scenario: "ssp2".to_string(),
            country: "Kenya".to_string(),
            admin_level: "1".to_string(),
            lad_name: "NAME_1".to_string(),
            lad_code: "GID_1".to_string(),
            grid_step: 1000.0,
            rounding: RoundingMode::Outward,
        }
    }

    fn seed(root: &Path) {
        let paths = DataPaths::resolve(root);
        for d in [&paths.boundary_input, &paths.lads_input, &paths.ssps_input] {
            fs::create_dir_all(d).unwrap();
        }
        let ring = [(12.0, 34.0), (5678.0, 34.0), (5678.0, 9012.0), (12.0, 34.0)];
        write_gpkg(&paths.boundary_input.join("gadm41_KEN_0.gpkg"), &[gp_blob(&polygon_le(&ring), None)]);
        fs::write(paths.lads_input.join("gadm41_KEN_1.gpkg"), b"lads").unwrap();
        fs::write(paths.ssps_input.join("region_ssp1_2030.zip"), b"ssp1").unwrap();
        fs::write(paths.ssps_input.join("region_ssp2_2050.zip"), b"ssp2").unwrap();
    }

    #[test]
    fn test_select_inputs() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let paths = DataPaths::resolve(dir.path());
        let selection = select_inputs(&paths, &config(dir.path())).unwrap();
        assert_eq!(selection.scenario.token, "region_ssp2_2050");
        assert_eq!(selection.raw_bounds, BoundingBox::new(12.0, 34.0, 5678.0, 9012.0));
        assert_eq!(selection.snapped_bounds, BoundingBox::new(0.0, 0.0, 6000.0, 10000.0));
    }

    #[test]
    fn test_run_writes_layout() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let report = run(&config(dir.path())).unwrap();

        let out = dir.path().join("outputs");
        assert_eq!(report.boundary.destination, out.join("boundary/Kenya.gpkg"));
        assert_eq!(fs::read(out.join("lads/Kenya_LADS.gpkg")).unwrap(), b"lads");
        assert_eq!(fs::read(out.join("ssp/region_ssp2_2050.zip")).unwrap(), b"ssp2");
        assert!(out.join("parameters/Kenya-ssp2-parameters.csv").is_file());
        assert_eq!(report.metadata, out.join("metadata/metadata_ssp_data.json"));
    }

    #[test]
    fn test_missing_scenario_writes_nothing() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let mut cfg = config(dir.path());
        cfg.scenario = "ssp5".to_string();
        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, DataPrepError::ScenarioNotFound { .. }));
        assert!(!dir.path().join("outputs").exists());
    }
}
