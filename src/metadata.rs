//! Metadata Emitter
//!
//! Catalog record describing the staged dataset. Key names are read by the
//! hosting platform's catalog and must not change.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bbox::GeoJsonPolygon;
use crate::error::{DataPrepError, Result};

pub const METADATA_STEM: &str = "metadata_ssp_data";
pub const KEYWORD: &str = "UDM";
pub const LICENSE_URL: &str = "https://creativecommons.org/licences/by/4.0/";
pub const CONTACT_NAME: &str = "DAFNI";
pub const CONTACT_EMAIL: &str = "support@dafni.ac.uk";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "rdfs:label")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(rename = "@type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "vcard:fn")]
    pub name: String,
    #[serde(rename = "vcard:hasEmail")]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodOfTime {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "time:hasBeginning")]
    pub beginning: Option<String>,
    #[serde(rename = "time:hasEnd")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialLabel {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "rdfs:label")]
    pub label: Option<String>,
}

/// DCAT dataset record as the catalog expects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "dct:language")]
    pub language: String,
    #[serde(rename = "dct:title")]
    pub title: String,
    #[serde(rename = "dct:description")]
    pub description: String,
    #[serde(rename = "dcat:keyword")]
    pub keywords: Vec<String>,
    #[serde(rename = "dct:subject")]
    pub subject: String,
    #[serde(rename = "dct:license")]
    pub license: License,
    #[serde(rename = "dct:creator")]
    pub creator: Vec<Creator>,
    #[serde(rename = "dcat:contactPoint")]
    pub contact_point: ContactPoint,
    /// ISO-8601 UTC with a `Z` suffix
    #[serde(rename = "dct:created")]
    pub created: String,
    #[serde(rename = "dct:PeriodOfTime")]
    pub period_of_time: PeriodOfTime,
    pub dafni_version_note: String,
    #[serde(rename = "dct:spatial")]
    pub spatial: SpatialLabel,
    pub geojson: GeoJsonPolygon,
}

impl MetadataRecord {
    /// Record stamped with the current wall-clock time.
    pub fn new(title: &str, description: &str, bounds: GeoJsonPolygon) -> Self {
        Self::created_at(title, description, bounds, Utc::now())
    }

    pub fn created_at(title: &str, description: &str, bounds: GeoJsonPolygon, created: DateTime<Utc>) -> Self {
        Self {
            context: vec!["metadata-v1".to_string()],
            kind: "dcat:Dataset".to_string(),
            language: "en".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            keywords: vec![KEYWORD.to_string()],
            subject: "Environment".to_string(),
            license: License {
                kind: "LicenseDocument".to_string(),
                id: LICENSE_URL.to_string(),
                label: None,
            },
            creator: vec![Creator {
                kind: "foaf:Organization".to_string(),
            }],
            contact_point: ContactPoint {
                kind: "vcard:Organization".to_string(),
                name: CONTACT_NAME.to_string(),
                email: CONTACT_EMAIL.to_string(),
            },
            created: created.to_rfc3339_opts(SecondsFormat::Micros, true),
            period_of_time: PeriodOfTime {
                kind: "dct:PeriodOfTime".to_string(),
                beginning: None,
                end: None,
            },
            dafni_version_note: "created".to_string(),
            spatial: SpatialLabel {
                kind: "dct:Location".to_string(),
                label: None,
            },
            geojson: bounds,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self).map_err(|e| DataPrepError::InvalidArgument {
            name: "metadata",
            message: e.to_string(),
        })?;
        text.push('\n');
        Ok(text)
    }
}

/// Render the record and write it to `<output_dir>/<stem>.json`.
pub fn write_metadata(
    output_dir: &Path,
    title: &str,
    description: &str,
    bounds: GeoJsonPolygon,
    stem: &str,
) -> Result<PathBuf> {
    let record = MetadataRecord::new(title, description, bounds);
    write_record(output_dir, &record, stem)
}

pub fn write_record(output_dir: &Path, record: &MetadataRecord, stem: &str) -> Result<PathBuf> {
    let path = output_dir.join(format!("{}.json", stem));
    fs::write(&path, record.to_json()?).map_err(|e| DataPrepError::fs("writing", &path, e))?;
    info!("🗂️  Metadata written to {}", path.display());
    Ok(path)
}
