//! Run Configuration
//!
//! Selection parameters for one staging run. Read once from the environment
//! at entry, then passed by reference to every stage.

use std::path::PathBuf;

use crate::bbox::RoundingMode;
use crate::error::{DataPrepError, Result};

pub const ENV_DATA: &str = "DATA";
pub const ENV_SSP: &str = "SSP";
pub const ENV_COUNTRY: &str = "COUNTRY";
pub const ENV_LEVEL: &str = "LEVEL";
pub const ENV_LAD_NAME: &str = "LAD_NAME";
pub const ENV_LAD_CODE: &str = "LAD_CODE";
pub const ENV_BBOX_GRID: &str = "BBOX_GRID";
pub const ENV_BBOX_ROUNDING: &str = "BBOX_ROUNDING";

pub const DEFAULT_DATA_ROOT: &str = "/data";
pub const DEFAULT_GRID_STEP: f64 = 1000.0;

// ──────────────────────────────────────────────────────────────────────────────
// CONFIGURATION
// ──────────────────────────────────────────────────────────────────────────────

/// Caller-supplied selection parameters for a single run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Root holding `inputs/` and `outputs/`
    pub data_root: PathBuf,
    /// Scenario token matched against scenario file names (e.g. `ssp2`)
    pub scenario: String,
    pub country: String,
    /// Administrative level label
    pub admin_level: String,
    /// Admin-unit name column, copied verbatim from the LAD dataset header
    pub lad_name: String,
    /// Admin-unit code column, copied verbatim from the LAD dataset header
    pub lad_code: String,
    /// Grid the bounding box is snapped to
    pub grid_step: f64,
    pub rounding: RoundingMode,
}

impl RunConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// Every absent required variable is reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        // blank counts as missing, but present values are kept verbatim
        let mut required = |key: &'static str| -> String {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => v,
                _ => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let scenario = required(ENV_SSP);
        let country = required(ENV_COUNTRY);
        let admin_level = required(ENV_LEVEL);
        let lad_name = required(ENV_LAD_NAME);
        let lad_code = required(ENV_LAD_CODE);

        if !missing.is_empty() {
            return Err(DataPrepError::config(
                missing.join(", "),
                "required environment variable is missing or empty",
            ));
        }

        let data_root = lookup(ENV_DATA)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_ROOT.to_string());

        let grid_step = match lookup(ENV_BBOX_GRID) {
            Some(raw) if !raw.trim().is_empty() => parse_grid_step(raw.trim())?,
            _ => DEFAULT_GRID_STEP,
        };

        let rounding = match lookup(ENV_BBOX_ROUNDING) {
            Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<RoundingMode>()?,
            _ => RoundingMode::default(),
        };

        Ok(Self {
            data_root: PathBuf::from(data_root),
            scenario,
            country,
            admin_level,
            lad_name,
            lad_code,
            grid_step,
            rounding,
        })
    }

    /// Catalog title, e.g. `Kenya - SSP2`
    pub fn title(&self) -> String {
        format!("{} - {}", self.country, self.scenario.to_uppercase())
    }

    /// Catalog description of the staged dataset
    pub fn description(&self) -> String {
        format!(
            "This dataset contains three files detailing urban, rural and population change for {} \
             under the {} scenario. Generated using the downscaled SSP datasets \
             (https://www.nature.com/articles/s41597-021-01052-0) data is collated at the \
             Local Authority level selected by the user.",
            self.country, self.scenario
        )
    }
}

fn parse_grid_step(raw: &str) -> Result<f64> {
    let step: f64 = raw
        .parse()
        .map_err(|_| DataPrepError::config(ENV_BBOX_GRID, format!("'{}' is not a number", raw)))?;
    if !step.is_finite() || step <= 0.0 {
        return Err(DataPrepError::config(
            ENV_BBOX_GRID,
            format!("grid step must be a finite number > 0, got {}", raw),
        ));
    }
    Ok(step)
}
