//! Well-Known Binary coordinate walker
//!
//! Visits every XY position of a WKB geometry. Accepts ISO type codes
//! (Z = +1000, M = +2000, ZM = +3000) and EWKB flag bits, including an
//! embedded SRID.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use super::Extent;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Nesting bound for collections; real boundaries stay well below it.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Big,
    Little,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => GeometryKind::Point,
            2 => GeometryKind::LineString,
            3 => GeometryKind::Polygon,
            4 => GeometryKind::MultiPoint,
            5 => GeometryKind::MultiLineString,
            6 => GeometryKind::MultiPolygon,
            7 => GeometryKind::GeometryCollection,
            _ => return None,
        })
    }
}

struct Header {
    kind: GeometryKind,
    order: Order,
    /// Ordinates per position (2..=4)
    dims: usize,
}

struct Walker<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Walker<'a> {
    fn u32(&mut self, order: Order) -> Result<u32, String> {
        match order {
            Order::Big => self.cursor.read_u32::<BigEndian>(),
            Order::Little => self.cursor.read_u32::<LittleEndian>(),
        }
        .map_err(|e| format!("truncated WKB at byte {}: {}", self.cursor.position(), e))
    }

    fn f64(&mut self, order: Order) -> Result<f64, String> {
        match order {
            Order::Big => self.cursor.read_f64::<BigEndian>(),
            Order::Little => self.cursor.read_f64::<LittleEndian>(),
        }
        .map_err(|e| format!("truncated WKB at byte {}: {}", self.cursor.position(), e))
    }

    fn header(&mut self) -> Result<Header, String> {
        let mut flag = [0u8; 1];
        self.cursor
            .read_exact(&mut flag)
            .map_err(|_| "empty WKB geometry".to_string())?;
        let order = match flag[0] {
            0 => Order::Big,
            1 => Order::Little,
            other => return Err(format!("invalid WKB byte order marker {}", other)),
        };

        let raw = self.u32(order)?;
        let mut dims = 2;
        if raw & EWKB_Z != 0 {
            dims += 1;
        }
        if raw & EWKB_M != 0 {
            dims += 1;
        }
        if raw & EWKB_SRID != 0 {
            self.u32(order)?;
        }

        let code = raw & 0x0FFF_FFFF;
        dims += match code / 1000 {
            0 => 0,
            1 | 2 => 1,
            3 => 2,
            _ => return Err(format!("unsupported WKB geometry type {}", code)),
        };
        let kind = GeometryKind::from_code(code % 1000)
            .ok_or_else(|| format!("unsupported WKB geometry type {}", code))?;

        if dims > 4 {
            return Err(format!("WKB geometry type {:#x} declares too many dimensions", raw));
        }
        Ok(Header { kind, order, dims })
    }

    fn position(&mut self, header: &Header, extent: &mut Extent) -> Result<(), String> {
        let x = self.f64(header.order)?;
        let y = self.f64(header.order)?;
        for _ in 2..header.dims {
            self.f64(header.order)?;
        }
        extent.add_point(x, y);
        Ok(())
    }

    fn positions(&mut self, header: &Header, extent: &mut Extent) -> Result<(), String> {
        let count = self.u32(header.order)?;
        for _ in 0..count {
            self.position(header, extent)?;
        }
        Ok(())
    }

    fn geometry(&mut self, extent: &mut Extent, depth: usize) -> Result<GeometryKind, String> {
        if depth > MAX_DEPTH {
            return Err("WKB geometry nested too deeply".to_string());
        }
        let header = self.header()?;
        match header.kind {
            GeometryKind::Point => self.position(&header, extent)?,
            GeometryKind::LineString => self.positions(&header, extent)?,
            GeometryKind::Polygon => {
                let rings = self.u32(header.order)?;
                for _ in 0..rings {
                    self.positions(&header, extent)?;
                }
            }
            GeometryKind::MultiPoint
            | GeometryKind::MultiLineString
            | GeometryKind::MultiPolygon
            | GeometryKind::GeometryCollection => {
                let parts = self.u32(header.order)?;
                for _ in 0..parts {
                    self.geometry(extent, depth + 1)?;
                }
            }
        }
        Ok(header.kind)
    }
}

/// Add every position of `bytes` to `extent`; returns the top-level geometry kind.
pub fn visit_positions(bytes: &[u8], extent: &mut Extent) -> Result<GeometryKind, String> {
    let mut walker = Walker {
        cursor: Cursor::new(bytes),
    };
    walker.geometry(extent, 0)
}
