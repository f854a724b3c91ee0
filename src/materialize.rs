//! Materializer
//!
//! Copies the selected inputs to their canonical output names and writes the
//! parameter record that travels with the outputs through every later model.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::RunConfig;
use crate::error::{DataPrepError, Result};
use crate::paths::DataPaths;
use crate::select::FileRef;

/// A file copied into the output tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
    /// Hex SHA-256 of the destination content
    pub sha256: String,
}

pub fn boundary_destination(paths: &DataPaths, config: &RunConfig) -> PathBuf {
    paths.boundary_output.join(format!("{}.gpkg", config.country))
}

pub fn lads_destination(paths: &DataPaths, config: &RunConfig) -> PathBuf {
    paths.lads_output.join(format!("{}_LADS.gpkg", config.country))
}

pub fn scenario_destination(paths: &DataPaths, scenario: &FileRef) -> PathBuf {
    let mut name = scenario.stem.clone();
    name.push(".zip");
    paths.ssp_output.join(name)
}

pub fn parameters_destination(paths: &DataPaths, config: &RunConfig) -> PathBuf {
    paths
        .parameters_output
        .join(format!("{}-{}-parameters.csv", config.country, config.scenario))
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| DataPrepError::fs("reading", path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| DataPrepError::fs("hashing", path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Byte-for-byte copy; an existing destination is overwritten.
pub fn stage_file(source: &Path, destination: &Path) -> Result<StagedFile> {
    let bytes = fs::copy(source, destination).map_err(|e| DataPrepError::CopyFailed {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    })?;
    let sha256 = sha256_file(destination)?;
    info!(
        src = %source.display(),
        dst = %destination.display(),
        bytes,
        sha256 = %sha256,
        "📦 Staged input"
    );
    Ok(StagedFile {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        bytes,
        sha256,
    })
}

/// Parameter rows in their fixed order
pub fn parameter_rows(config: &RunConfig) -> [(&'static str, &str); 5] {
    [
        ("COUNTRY", config.country.as_str()),
        ("SSP", config.scenario.as_str()),
        ("ADMIN_LEVEL", config.admin_level.as_str()),
        ("LAD_NAME", config.lad_name.as_str()),
        ("LAD_CODE", config.lad_code.as_str()),
    ]
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_parameters(config: &RunConfig) -> String {
    let mut out = String::from("PARAMETER,VALUE\n");
    for (name, value) in parameter_rows(config) {
        out.push_str(name);
        out.push(',');
        out.push_str(&csv_field(value));
        out.push('\n');
    }
    out
}

/// Write `<country>-<scenario>-parameters.csv`; returns its path.
pub fn write_parameters(paths: &DataPaths, config: &RunConfig) -> Result<PathBuf> {
    let path = parameters_destination(paths, config);
    fs::write(&path, render_parameters(config)).map_err(|e| DataPrepError::fs("writing", &path, e))?;
    info!("📝 Parameters written to {}", path.display());
    Ok(path)
}
