//! Boundary Geometry Readers
//!
//! Just enough of the GeoPackage and GeoJSON formats to compute the extent of
//! a boundary file. Coordinates are taken as stored; no reprojection.

pub mod geojson;
pub mod gpkg;
pub mod wkb;

use std::path::Path;

use tracing::debug;

use crate::bbox::BoundingBox;
use crate::error::{DataPrepError, Result};

/// Running extent over every coordinate seen so far
#[derive(Debug, Default, Clone, Copy)]
pub struct Extent(Option<BoundingBox>);

impl Extent {
    /// NaN (empty point) and infinite positions are skipped.
    pub fn add_point(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        match &mut self.0 {
            Some(bbox) => bbox.expand_to(x, y),
            None => self.0 = Some(BoundingBox::from_point(x, y)),
        }
    }

    pub fn add_box(&mut self, other: &BoundingBox) {
        if !other.is_finite() {
            return;
        }
        match &mut self.0 {
            Some(bbox) => bbox.union(other),
            None => self.0 = Some(*other),
        }
    }

    pub fn get(&self) -> Option<BoundingBox> {
        self.0
    }
}

/// Formats the boundary reader understands, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryFormat {
    GeoPackage,
    GeoJson,
}

impl BoundaryFormat {
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "gpkg" => Some(BoundaryFormat::GeoPackage),
            "geojson" | "json" => Some(BoundaryFormat::GeoJson),
            _ => None,
        }
    }
}

/// Extent of every geometry in the boundary file.
pub fn read_bounds(path: &Path) -> Result<BoundingBox> {
    let format = BoundaryFormat::detect(path).ok_or_else(|| {
        DataPrepError::geometry(path, "unsupported boundary format (expected .gpkg or .geojson)")
    })?;

    let extent = match format {
        BoundaryFormat::GeoPackage => gpkg::read_extent(path)?,
        BoundaryFormat::GeoJson => geojson::read_extent(path)?,
    };

    let bounds = extent
        .get()
        .filter(BoundingBox::is_finite)
        .ok_or_else(|| DataPrepError::geometry(path, "boundary has no usable bounds"))?;
    debug!(?format, ?bounds, "Boundary bounds computed from {}", path.display());
    Ok(bounds)
}
