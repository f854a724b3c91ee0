//! GeoPackage boundary reader
//!
//! A GeoPackage is an SQLite database. Feature tables are listed in
//! `gpkg_geometry_columns`; each geometry value is a GeoPackage binary blob:
//! `GP` magic, version, flags, srs id, optional envelope, then WKB.

use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

use super::wkb;
use super::Extent;
use crate::bbox::BoundingBox;
use crate::error::{DataPrepError, Result};

const MAGIC: &[u8; 2] = b"GP";
const HEADER_LEN: usize = 8;

const FLAG_LITTLE_ENDIAN: u8 = 0b0000_0001;
const FLAG_ENVELOPE_MASK: u8 = 0b0000_1110;
const FLAG_EMPTY: u8 = 0b0001_0000;

/// Decoded fixed part of a GeoPackage geometry blob
#[derive(Debug, Clone, PartialEq)]
pub struct BlobHeader {
    pub srs_id: i32,
    pub empty: bool,
    pub envelope: Option<BoundingBox>,
    /// Offset of the WKB body
    pub wkb_offset: usize,
}

/// Parse the blob header, including the envelope when one is stored.
pub fn parse_header(blob: &[u8]) -> std::result::Result<BlobHeader, String> {
    if blob.len() < HEADER_LEN || &blob[..2] != MAGIC {
        return Err("not a GeoPackage geometry blob".to_string());
    }
    let flags = blob[3];
    let little = flags & FLAG_LITTLE_ENDIAN != 0;
    let read_i32 = |b: &[u8]| if little { LittleEndian::read_i32(b) } else { BigEndian::read_i32(b) };
    let read_f64 = |b: &[u8]| if little { LittleEndian::read_f64(b) } else { BigEndian::read_f64(b) };

    let envelope_doubles = match (flags & FLAG_ENVELOPE_MASK) >> 1 {
        0 => 0,
        1 => 4,
        2 | 3 => 6,
        4 => 8,
        other => return Err(format!("invalid envelope indicator {}", other)),
    };
    let wkb_offset = HEADER_LEN + envelope_doubles * 8;
    if blob.len() < wkb_offset {
        return Err("geometry blob shorter than its envelope".to_string());
    }

    // envelope order is minx, maxx, miny, maxy
    let envelope = (envelope_doubles > 0).then(|| {
        let at = |i: usize| read_f64(&blob[HEADER_LEN + i * 8..HEADER_LEN + (i + 1) * 8]);
        BoundingBox::new(at(0), at(2), at(1), at(3))
    });

    Ok(BlobHeader {
        srs_id: read_i32(&blob[4..8]),
        empty: flags & FLAG_EMPTY != 0,
        envelope,
        wkb_offset,
    })
}

/// Add one geometry blob to the extent. Empty geometries contribute nothing.
pub fn add_blob(blob: &[u8], extent: &mut Extent) -> std::result::Result<(), String> {
    let header = parse_header(blob)?;
    if header.empty {
        return Ok(());
    }
    match header.envelope {
        // NaN marks an empty envelope; anything non-finite falls back to the WKB
        Some(envelope) if envelope.is_finite() => {
            extent.add_box(&envelope);
        }
        _ => {
            wkb::visit_positions(&blob[header.wkb_offset..], extent)?;
        }
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Extent over every geometry column of every feature table.
pub fn read_extent(path: &Path) -> Result<Extent> {
    let sql_err = |e: rusqlite::Error| DataPrepError::geometry(path, e.to_string());

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(sql_err)?;

    let columns: Vec<(String, String)> = {
        let mut stmt = conn
            .prepare("SELECT table_name, column_name FROM gpkg_geometry_columns")
            .map_err(sql_err)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(sql_err)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(sql_err)?
    };

    if columns.is_empty() {
        return Err(DataPrepError::geometry(path, "GeoPackage has no geometry columns"));
    }

    let mut extent = Extent::default();
    for (table, column) in &columns {
        let sql = format!("SELECT {} FROM {}", quote_ident(column), quote_ident(table));
        let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
        let mut rows = stmt.query([]).map_err(sql_err)?;

        let mut features = 0usize;
        while let Some(row) = rows.next().map_err(sql_err)? {
            let blob: Option<Vec<u8>> = row.get(0).map_err(sql_err)?;
            let Some(blob) = blob else { continue };
            add_blob(&blob, &mut extent).map_err(|message| {
                DataPrepError::geometry(path, format!("{}.{}: {}", table, column, message))
            })?;
            features += 1;
        }

        if features == 0 {
            warn!("GeoPackage table '{}' has no geometries", table);
        }
        debug!(table = %table, column = %column, features, "Scanned geometry column");
    }

    Ok(extent)
}
