//! GeoJSON boundary reader

use std::path::Path;

use serde_json::Value;

use super::Extent;
use crate::error::{DataPrepError, Result};

pub fn read_extent(path: &Path) -> Result<Extent> {
    let text = std::fs::read_to_string(path).map_err(|e| DataPrepError::fs("reading", path, e))?;
    let doc: Value = serde_json::from_str(&text)
        .map_err(|e| DataPrepError::geometry(path, format!("invalid GeoJSON: {}", e)))?;

    let mut extent = Extent::default();
    visit_object(&doc, &mut extent).map_err(|message| DataPrepError::geometry(path, message))?;
    Ok(extent)
}

/// Walk a FeatureCollection, Feature or geometry object.
pub fn visit_object(value: &Value, extent: &mut Extent) -> std::result::Result<(), String> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "GeoJSON object without a 'type'".to_string())?;

    match kind {
        "FeatureCollection" => {
            for feature in value.get("features").and_then(Value::as_array).into_iter().flatten() {
                visit_object(feature, extent)?;
            }
        }
        "Feature" => match value.get("geometry") {
            None | Some(Value::Null) => {}
            Some(geometry) => visit_object(geometry, extent)?,
        },
        "GeometryCollection" => {
            for geometry in value.get("geometries").and_then(Value::as_array).into_iter().flatten() {
                visit_object(geometry, extent)?;
            }
        }
        "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon" | "MultiPolygon" => {
            if let Some(coordinates) = value.get("coordinates") {
                visit_coordinates(coordinates, extent)?;
            }
        }
        other => return Err(format!("unsupported GeoJSON type '{}'", other)),
    }
    Ok(())
}

fn visit_coordinates(value: &Value, extent: &mut Extent) -> std::result::Result<(), String> {
    let Some(items) = value.as_array() else {
        return Err("coordinates must be arrays".to_string());
    };
    match items.first() {
        Some(Value::Number(_)) => {
            let x = items[0].as_f64();
            let y = items.get(1).and_then(Value::as_f64);
            match (x, y) {
                (Some(x), Some(y)) => extent.add_point(x, y),
                _ => return Err("position needs at least two numbers".to_string()),
            }
        }
        _ => {
            for item in items {
                visit_coordinates(item, extent)?;
            }
        }
    }
    Ok(())
}
