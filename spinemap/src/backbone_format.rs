//! Reading and writing backbone files.
//!
//! Two formats are understood:
//!
//! - **TSV**: one sample per line, whitespace separated `z y x edge_distance`.
//!   Blank lines and lines starting with `#` are skipped.
//! - **JSON**: `{"bbpoints": [[x, y, z, edge_distance], ...]}`, note the
//!   reversed axis order.
//!
//! The format is picked once at the boundary, either explicitly or from the
//! file extension through [`BackboneFormat::from_path`]; the rest of the crate
//! only ever sees [`Backbone`] values.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use serde::Deserialize;

use crate::backbone::{Backbone, BackbonePoint};
use crate::error::{Result, SpineError};

/// Supported backbone file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackboneFormat {
    Tsv,
    Json,
}

impl BackboneFormat {
    /// Detects the format from the extension of `path`.
    ///
    /// # Errors
    /// [`SpineError::UnsupportedFormat`] for anything but `.tsv` and `.json`.
    ///
    /// # Examples
    /// ```
    /// # use spinemap::backbone_format::BackboneFormat;
    /// assert_eq!(BackboneFormat::from_path("frame42.json").unwrap(), BackboneFormat::Json);
    /// assert!(BackboneFormat::from_path("frame42.csv").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<BackboneFormat> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        match extension.to_ascii_lowercase().as_str() {
            "tsv" => Ok(BackboneFormat::Tsv),
            "json" => Ok(BackboneFormat::Json),
            _ => Err(SpineError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct BackboneDocument {
    bbpoints: Vec<[f64; 4]>,
}

fn read_tsv(reader: impl BufRead) -> Result<Vec<BackbonePoint>> {
    let mut points = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parse_error = |message: String| SpineError::Parse {
            line: i + 1,
            message,
        };
        let fields = trimmed
            .split_whitespace()
            .map(|f| match f.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                Ok(_) => Err(parse_error(format!("'{f}' is not finite"))),
                Err(e) => Err(parse_error(format!("'{f}': {e}"))),
            })
            .collect::<Result<Vec<f64>>>()?;
        if fields.len() != 4 {
            return Err(parse_error(format!(
                "expected 4 columns (z y x edge_distance), got {}",
                fields.len()
            )));
        }
        points.push(BackbonePoint::new(fields[0], fields[1], fields[2], fields[3]));
    }
    Ok(points)
}

fn read_json(reader: impl Read) -> Result<Vec<BackbonePoint>> {
    let doc: BackboneDocument =
        serde_json::from_reader(reader).map_err(|err| SpineError::Parse {
            line: err.line(),
            message: err.to_string(),
        })?;
    Ok(doc
        .bbpoints
        .into_iter()
        .map(|[x, y, z, edge]| BackbonePoint::new(z, y, x, edge))
        .collect())
}

/// Reads a backbone in the given format and orients it canonically
/// (see [`Backbone::canonically_oriented`]).
///
/// # Examples
/// ```
/// # use spinemap::backbone_format::{read_backbone, BackboneFormat};
/// let json = r#"{"bbpoints": [[30, 5, 0, 4], [10, 6, 0, 3]]}"#;
/// let bb = read_backbone(json.as_bytes(), BackboneFormat::Json).unwrap();
/// // Reoriented so that x increases.
/// assert_eq!(bb.first().x, 10.0);
/// assert_eq!(bb.first().edge_distance, 3.0);
/// ```
pub fn read_backbone(reader: impl Read, format: BackboneFormat) -> Result<Backbone> {
    let points = match format {
        BackboneFormat::Tsv => read_tsv(BufReader::new(reader))?,
        BackboneFormat::Json => read_json(reader)?,
    };
    Ok(Backbone::new(points)?.canonically_oriented())
}

/// Loads a backbone file, choosing the format by its extension.
pub fn load_backbone(path: impl AsRef<Path>) -> Result<Backbone> {
    let path = path.as_ref();
    let format = BackboneFormat::from_path(path)?;
    let file = File::open(path)?;
    let backbone = read_backbone(file, format)?;
    log::info!(
        "loaded backbone of {} points from {}",
        backbone.len(),
        path.display()
    );
    Ok(backbone)
}

/// Writes `backbone` as TSV rows `z y x edge_distance`, in sequence order.
pub fn write_backbone_tsv(mut writer: impl Write, backbone: &Backbone) -> Result<()> {
    for p in backbone.points() {
        writeln!(writer, "{} {} {} {}", p.z, p.y, p.x, p.edge_distance)?;
    }
    Ok(())
}
