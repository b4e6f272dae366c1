use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::{Result, SpineError};

/// A landmark (typically a neuron soma) in the straightened body model.
///
/// `position` is `(x_depth, y, z)`: `y` runs along the body axis, `z` across
/// it in the imaging plane, and `x_depth` is the depth that the pose rotation
/// swings into view.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPoint {
    pub name: String,
    pub position: Vector3<f64>,
    pub diameter: f64,
}

impl ModelPoint {
    pub fn new(name: impl Into<String>, x_depth: f64, y: f64, z: f64, diameter: f64) -> Self {
        ModelPoint {
            name: name.into(),
            position: Vector3::new(x_depth, y, z),
            diameter,
        }
    }
}

#[derive(Deserialize)]
struct NeuronDocument {
    neurons: Vec<NeuronRecord>,
}

#[derive(Deserialize)]
struct NeuronRecord {
    name: String,
    pos: [f64; 3],
    diameter: f64,
}

/// Reads a neuron document of the form
/// `{"neurons": [{"name": "AVAL", "pos": [x, y, z], "diameter": d}, ...]}`.
///
/// # Examples
/// ```
/// # use spinemap::model_points::read_model_points;
/// let json = r#"{"neurons": [{"name": "AVAL", "pos": [1.0, -270.5, 8.0], "diameter": 3.2}]}"#;
/// let points = read_model_points(json.as_bytes()).unwrap();
/// assert_eq!(points[0].name, "AVAL");
/// assert_eq!(points[0].position.y, -270.5);
/// ```
pub fn read_model_points(reader: impl Read) -> Result<Vec<ModelPoint>> {
    let doc: NeuronDocument =
        serde_json::from_reader(reader).map_err(|err| SpineError::Parse {
            line: err.line(),
            message: err.to_string(),
        })?;

    Ok(doc
        .neurons
        .into_iter()
        .map(|n| ModelPoint::new(n.name, n.pos[0], n.pos[1], n.pos[2], n.diameter))
        .collect())
}

/// Loads model points from a neuron JSON file.
pub fn load_model_points(path: impl AsRef<Path>) -> Result<Vec<ModelPoint>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let points = read_model_points(BufReader::new(file))?;
    log::info!("loaded {} model points from {}", points.len(), path.display());
    Ok(points)
}
