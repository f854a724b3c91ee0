//! Synthetic input trees for the end-to-end suites

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use rusqlite::Connection;

use ssp_dataprep::{DataPaths, RunConfig};

/// Little-endian 2D WKB polygon wrapped in a GeoPackage blob without envelope
pub fn gpkg_polygon(ring: &[(f64, f64)]) -> Vec<u8> {
    let mut blob = b"GP".to_vec();
    blob.push(0);
    blob.push(0b0000_0001);
    blob.write_i32::<LittleEndian>(32737).unwrap();

    blob.push(1);
    blob.write_u32::<LittleEndian>(3).unwrap();
    blob.write_u32::<LittleEndian>(1).unwrap();
    blob.write_u32::<LittleEndian>(ring.len() as u32).unwrap();
    for &(x, y) in ring {
        blob.write_f64::<LittleEndian>(x).unwrap();
        blob.write_f64::<LittleEndian>(y).unwrap();
    }
    blob
}

pub fn write_gpkg(path: &Path, rings: &[&[(f64, f64)]]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE gpkg_geometry_columns (
             table_name TEXT NOT NULL, column_name TEXT NOT NULL,
             geometry_type_name TEXT NOT NULL, srs_id INTEGER NOT NULL,
             z TINYINT NOT NULL, m TINYINT NOT NULL);
         CREATE TABLE boundary (fid INTEGER PRIMARY KEY, shape BLOB, name TEXT);
         INSERT INTO gpkg_geometry_columns VALUES ('boundary', 'shape', 'POLYGON', 32737, 0, 0);",
    )
    .unwrap();
    for ring in rings {
        conn.execute(
            "INSERT INTO boundary (shape, name) VALUES (?1, 'Kenya')",
            [gpkg_polygon(ring)],
        )
        .unwrap();
    }
}

/// Boundary with bounds (12, 34, 5678, 9012), one LAD file, two scenarios
pub fn seed_inputs(root: &Path) -> DataPaths {
    let paths = DataPaths::resolve(root);
    for dir in [&paths.boundary_input, &paths.lads_input, &paths.ssps_input] {
        fs::create_dir_all(dir).unwrap();
    }
    write_gpkg(
        &paths.boundary_input.join("gadm41_KEN_0.gpkg"),
        &[&[(12.0, 34.0), (5678.0, 34.0), (5678.0, 9012.0), (12.0, 34.0)]],
    );
    fs::write(paths.lads_input.join("gadm41_KEN_1.gpkg"), b"lad polygons").unwrap();
    fs::write(paths.ssps_input.join("region_ssp1_2030.zip"), b"ssp1 2030 payload").unwrap();
    fs::write(paths.ssps_input.join("region_ssp2_2050.zip"), b"ssp2 2050 payload").unwrap();
    paths
}

pub fn kenya_env(root: &Path) -> HashMap<String, String> {
    [
        ("DATA", root.to_string_lossy().into_owned()),
        ("SSP", "ssp2".to_string()),
        ("COUNTRY", "Kenya".to_string()),
        ("LEVEL", "1".to_string()),
        ("LAD_NAME", "NAME_1".to_string()),
        ("LAD_CODE", "GID_1".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

pub fn config_from(vars: &HashMap<String, String>) -> RunConfig {
    RunConfig::from_lookup(|k| vars.get(k).cloned()).unwrap()
}

/// Relative path -> bytes for every file under `dir`
pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in fs::read_dir(&d).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(dir).unwrap().to_string_lossy().into_owned();
                files.push((rel, fs::read(&path).unwrap()));
            }
        }
    }
    files.sort();
    files
}
