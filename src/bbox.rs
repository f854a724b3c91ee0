//! Bounding Box
//!
//! Raw geometry bounds snapped to a grid, and the GeoJSON polygon the catalog
//! record embeds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DataPrepError, Result};

fn check_step(step: f64) -> Result<()> {
    if step.is_finite() && step > 0.0 {
        Ok(())
    } else {
        Err(DataPrepError::InvalidArgument {
            name: "step",
            message: format!("must be a finite number > 0, got {}", step),
        })
    }
}

/// Largest multiple of `step` that is `<= value`.
pub fn round_down(value: f64, step: f64) -> Result<f64> {
    check_step(step)?;
    Ok((value / step).floor() * step)
}

/// Smallest multiple of `step` that is `>= value`.
pub fn round_up(value: f64, step: f64) -> Result<f64> {
    check_step(step)?;
    Ok((value / step).ceil() * step)
}

/// How the box edges are snapped to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// left/bottom round down, right/top round up; the snapped box contains the extent
    #[default]
    Outward,
    /// All four edges round down, as earlier catalog records were produced
    Legacy,
}

impl FromStr for RoundingMode {
    type Err = DataPrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "outward" => Ok(RoundingMode::Outward),
            "legacy" => Ok(RoundingMode::Legacy),
            other => Err(DataPrepError::config(
                crate::config::ENV_BBOX_ROUNDING,
                format!("expected 'outward' or 'legacy', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::Outward => write!(f, "outward"),
            RoundingMode::Legacy => write!(f, "legacy"),
        }
    }
}

/// Axis-aligned extent in the boundary's own coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Degenerate box around a single position
    pub fn from_point(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }

    pub fn expand_to(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn union(&mut self, other: &BoundingBox) {
        self.expand_to(other.min_x, other.min_y);
        self.expand_to(other.max_x, other.max_y);
    }

    pub fn left(&self) -> f64 {
        self.min_x
    }

    pub fn bottom(&self) -> f64 {
        self.min_y
    }

    pub fn right(&self) -> f64 {
        self.max_x
    }

    pub fn top(&self) -> f64 {
        self.max_y
    }

    /// Snap each edge independently to the grid.
    pub fn snap(&self, step: f64, mode: RoundingMode) -> Result<BoundingBox> {
        if !self.is_finite() {
            return Err(DataPrepError::InvalidArgument {
                name: "bounds",
                message: format!("non-finite edge in {:?}", self),
            });
        }
        let (right, top) = match mode {
            RoundingMode::Outward => (round_up(self.max_x, step)?, round_up(self.max_y, step)?),
            RoundingMode::Legacy => (round_down(self.max_x, step)?, round_down(self.max_y, step)?),
        };
        Ok(BoundingBox::new(
            round_down(self.min_x, step)?,
            round_down(self.min_y, step)?,
            right,
            top,
        ))
    }

    pub fn is_finite(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Closed ring: top-left, top-right, bottom-right, bottom-left, top-left.
    pub fn ring(&self) -> [[f64; 2]; 5] {
        let (l, b, r, t) = (self.left(), self.bottom(), self.right(), self.top());
        [[l, t], [r, t], [r, b], [l, b], [l, t]]
    }

    pub fn to_polygon(&self) -> GeoJsonPolygon {
        GeoJsonPolygon {
            kind: PolygonTag::Polygon,
            coordinates: vec![self.ring().to_vec()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolygonTag {
    Polygon,
}

/// GeoJSON `Polygon` geometry object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPolygon {
    #[serde(rename = "type")]
    pub kind: PolygonTag,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}
