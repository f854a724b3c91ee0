//! Path Resolver
//!
//! The downstream models hard-code this folder layout: the outputs of one
//! stage are the inputs of the next, so the names below are a contract.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DataPrepError, Result};

/// Input and output folders derived from one data root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,

    pub inputs: PathBuf,
    pub ssps_input: PathBuf,
    pub boundary_input: PathBuf,
    pub lads_input: PathBuf,

    pub outputs: PathBuf,
    pub boundary_output: PathBuf,
    pub ssp_output: PathBuf,
    pub lads_output: PathBuf,
    pub parameters_output: PathBuf,
    pub metadata_output: PathBuf,
}

impl DataPaths {
    /// Compute the layout under `root`. Touches nothing on disk.
    pub fn resolve(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let inputs = root.join("inputs");
        let outputs = root.join("outputs");
        Self {
            ssps_input: inputs.join("ssps"),
            boundary_input: inputs.join("boundary"),
            lads_input: inputs.join("lads"),
            boundary_output: outputs.join("boundary"),
            ssp_output: outputs.join("ssp"),
            lads_output: outputs.join("lads"),
            parameters_output: outputs.join("parameters"),
            metadata_output: outputs.join("metadata"),
            inputs,
            outputs,
            root,
        }
    }

    /// Output folders in creation order, parent first.
    pub fn output_dirs(&self) -> [&Path; 6] {
        [
            self.outputs.as_path(),
            self.boundary_output.as_path(),
            self.ssp_output.as_path(),
            self.lads_output.as_path(),
            self.parameters_output.as_path(),
            self.metadata_output.as_path(),
        ]
    }

    /// Create any missing output folder. Existing folders are left alone.
    pub fn create_output_dirs(&self) -> Result<()> {
        for dir in self.output_dirs() {
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(dir).map_err(|e| DataPrepError::fs("creating directory", dir, e))?;
            debug!("Created output directory {}", dir.display());
        }
        Ok(())
    }
}
