//! Placement of straightened-model points into a curved, imaged body.
//!
//! A point is first projected by the [`PoseInfo`] (zoom, rotation about the
//! body axis, flattening) into a coordinate measured along and across the
//! spine, and then bent onto the traced spine by [`locate_on_spine`].

use std::f64::consts::PI;
use std::str::FromStr;

use nalgebra::Point2;

use crate::curve_tracer::TracedPoint;
use crate::error::SpineError;
use crate::model_points::ModelPoint;

/// How the idealized body model sits in a particular frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseInfo {
    /// Scale applied to all model axes. Negative values reverse the direction
    /// of the body axis.
    pub zoom: f64,
    /// Offset of the model origin along the spine, in traced pixels.
    pub shift: f64,
    /// Rotation around the body's long axis, in degrees.
    pub angle: f64,
}

impl Default for PoseInfo {
    fn default() -> Self {
        PoseInfo {
            zoom: 1.0,
            shift: 0.0,
            angle: 0.0,
        }
    }
}

impl PoseInfo {
    pub fn new(zoom: f64, shift: f64, angle: f64) -> Self {
        PoseInfo { zoom, shift, angle }
    }
}

impl FromStr for PoseInfo {
    type Err = SpineError;

    /// Parses `zoom[,shift[,angle]]`; omitted fields default to `0`.
    ///
    /// # Examples
    /// ```
    /// # use spinemap::pose::PoseInfo;
    /// let pose: PoseInfo = "-1.5,20,30".parse().unwrap();
    /// assert_eq!(pose, PoseInfo::new(-1.5, 20.0, 30.0));
    /// let pose: PoseInfo = "2".parse().unwrap();
    /// assert_eq!(pose, PoseInfo::new(2.0, 0.0, 0.0));
    /// assert!("0,1,2".parse::<PoseInfo>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |message: String| SpineError::PoseParse {
            input: s.to_string(),
            message,
        };

        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() > 3 {
            return Err(err(format!("expected at most 3 fields, got {}", fields.len())));
        }

        let mut values = [1.0, 0.0, 0.0];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field
                .parse::<f64>()
                .map_err(|e| err(format!("'{field}': {e}")))?;
            if !slot.is_finite() {
                return Err(err(format!("'{field}' is not finite")));
            }
        }

        if values[0] == 0.0 {
            return Err(err("zoom must be non-zero".to_string()));
        }
        Ok(PoseInfo::new(values[0], values[1], values[2]))
    }
}

/// A model point flattened into spine-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedCoord {
    /// Distance along the body axis, in traced pixels before the pose shift.
    pub along: f64,
    /// Offset across the body, along the spine normal.
    pub transverse: f64,
}

/// Projects a model point onto the imaging plane according to `pose`.
///
/// The position is scaled by `zoom`, rotated in the depth/z plane by
/// `pose.angle` and flattened by dropping the depth axis. A point on the
/// rotation axis (zero depth and zero z) is left unrotated.
///
/// # Examples
/// ```
/// # use spinemap::model_points::ModelPoint;
/// # use spinemap::pose::{project_point, PoseInfo};
/// let p = ModelPoint::new("AVAL", 0.0, 12.0, 3.0, 2.0);
/// let c = project_point(&p, &PoseInfo::new(2.0, 0.0, 0.0));
/// assert_eq!((c.along, c.transverse), (24.0, 6.0));
/// ```
pub fn project_point(point: &ModelPoint, pose: &PoseInfo) -> ProjectedCoord {
    let scaled = point.position * pose.zoom;
    let (depth, y, z) = (scaled.x, scaled.y, scaled.z);

    let d = (depth * depth + z * z).sqrt();
    let z = if d > 0.0 {
        let alpha = pose.angle * PI / 180.0;
        let beta = (z / d).clamp(-1.0, 1.0).asin();
        d * (alpha + beta).sin()
    } else {
        z
    };

    ProjectedCoord {
        along: y,
        transverse: z,
    }
}

/// Projects a model diameter; diameters only scale.
pub fn project_diameter(diameter: f64, pose: &PoseInfo) -> f64 {
    diameter * pose.zoom
}

/// Bends a projected coordinate onto the traced spine.
///
/// `coord.along + pose.shift` selects a point between two traced samples,
/// whose positions and tangents are blended linearly; the result is then
/// moved `coord.transverse` pixels along the blended [`TracedPoint::normal`].
/// The returned point is in frame coordinates (`x` = column, `y` = row).
///
/// # Parameters
/// - `coord`: The projected model coordinate, see [`project_point`].
/// - `traced`: The traced spine, indexed by spine coordinate.
/// - `pose`: Only `pose.shift` is used here.
///
/// # Returns
/// `None` when the spine coordinate is negative or does not have a
/// following traced sample, i.e. the point falls outside the traced body in
/// this pose. Callers should skip such points.
pub fn locate_on_spine(
    coord: ProjectedCoord,
    traced: &[TracedPoint],
    pose: &PoseInfo,
) -> Option<Point2<f64>> {
    let spine = coord.along + pose.shift;
    if !(spine >= 0.0) {
        return None;
    }

    let index = spine.floor();
    if index + 1.0 >= traced.len() as f64 {
        return None;
    }
    let index = index as usize;
    let beta = spine - index as f64;

    let base = traced[index].lerp(&traced[index + 1], beta);
    Some(base.position + base.normal() * coord.transverse)
}

/// A model point placed in frame coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPoint {
    pub name: String,
    /// Frame position, `x` = column and `y` = row.
    pub position: Point2<f64>,
    /// Projected radius in pixels.
    pub radius: f64,
}

impl PlacedPoint {
    pub fn row(&self) -> f64 {
        self.position.y
    }

    pub fn col(&self) -> f64 {
        self.position.x
    }
}

/// Places every model point on the traced spine.
///
/// Points that do not land on the spine in this pose are omitted; the
/// remaining points keep their input order.
pub fn place_model_points(
    points: &[ModelPoint],
    traced: &[TracedPoint],
    pose: &PoseInfo,
) -> Vec<PlacedPoint> {
    let placed: Vec<PlacedPoint> = points
        .iter()
        .filter_map(|point| {
            let coord = project_point(point, pose);
            match locate_on_spine(coord, traced, pose) {
                Some(position) => Some(PlacedPoint {
                    name: point.name.clone(),
                    position,
                    radius: project_diameter(point.diameter, pose).abs() / 2.0,
                }),
                None => {
                    log::debug!(
                        "{} at spine coordinate {:.2} is not placeable",
                        point.name,
                        coord.along + pose.shift
                    );
                    None
                }
            }
        })
        .collect();

    log::info!("placed {} of {} model points", placed.len(), points.len());
    placed
}
