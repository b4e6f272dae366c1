use crate::error::{Result, SpineError};

/// A single sample of the body axis as delivered by the pose extraction.
///
/// Coordinates are in frame pixels and kept in the `(z, y, x)` order of the
/// flat backbone files. `edge_distance` is the half-width of the body at this
/// sample, i.e. the distance from the axis to the body edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackbonePoint {
    pub z: f64,
    pub y: f64,
    pub x: f64,
    pub edge_distance: f64,
}

impl BackbonePoint {
    pub fn new(z: f64, y: f64, x: f64, edge_distance: f64) -> Self {
        BackbonePoint {
            z,
            y,
            x,
            edge_distance,
        }
    }

    /// Euclidean distance between the 3D positions of two samples.
    ///
    /// The edge distance does not take part.
    ///
    /// # Examples
    /// ```
    /// # use spinemap::backbone::BackbonePoint;
    /// let a = BackbonePoint::new(0.0, 0.0, 0.0, 1.0);
    /// let b = BackbonePoint::new(0.0, 3.0, 4.0, 2.0);
    /// assert_eq!(a.distance(&b), 5.0);
    /// ```
    pub fn distance(&self, other: &BackbonePoint) -> f64 {
        let dz = self.z - other.z;
        let dy = self.y - other.y;
        let dx = self.x - other.x;
        (dz * dz + dy * dy + dx * dx).sqrt()
    }
}

/// An ordered sequence of [`BackbonePoint`]s running front to back along the
/// body. The order defines the direction of travel along the spine.
///
/// A backbone always holds at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Backbone {
    points: Vec<BackbonePoint>,
}

impl Backbone {
    /// Wraps `points`, rejecting sequences that cannot describe a direction.
    ///
    /// # Errors
    /// [`SpineError::TooFewPoints`] if fewer than two points are given.
    pub fn new(points: Vec<BackbonePoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(SpineError::TooFewPoints {
                count: points.len(),
            });
        }
        Ok(Backbone { points })
    }

    pub fn points(&self) -> &[BackbonePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &BackbonePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &BackbonePoint {
        &self.points[self.points.len() - 1]
    }

    /// The per-sample half-widths, in backbone order.
    pub fn edge_distances(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.edge_distance)
    }

    /// The widest half-width along the body, `0.0` if every edge distance is
    /// zero or negative.
    pub fn max_edge_distance(&self) -> f64 {
        self.edge_distances().fold(0.0, f64::max)
    }

    /// Returns the backbone traversed in the opposite direction.
    ///
    /// Points and their edge distances travel together, so each sample keeps
    /// its own half-width.
    ///
    /// # Examples
    /// ```
    /// # use spinemap::backbone::{Backbone, BackbonePoint};
    /// let bb = Backbone::new(vec![
    ///     BackbonePoint::new(0.0, 0.0, 0.0, 1.0),
    ///     BackbonePoint::new(0.0, 0.0, 5.0, 3.0),
    /// ]).unwrap();
    /// let rev = bb.reversed();
    /// assert_eq!(rev.first().x, 5.0);
    /// assert_eq!(rev.first().edge_distance, 3.0);
    /// ```
    pub fn reversed(&self) -> Backbone {
        Backbone {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    /// Returns the backbone oriented so that `x` does not decrease from the
    /// first to the last sample. Already oriented backbones are returned as-is.
    pub fn canonically_oriented(self) -> Backbone {
        if self.first().x > self.last().x {
            self.reversed()
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Backbone {
        Backbone::new(vec![
            BackbonePoint::new(0.0, 4.0, 9.0, 1.0),
            BackbonePoint::new(0.0, 5.0, 6.0, 2.5),
            BackbonePoint::new(0.0, 6.0, 2.0, 0.5),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_short_backbones() {
        assert!(matches!(
            Backbone::new(vec![]),
            Err(SpineError::TooFewPoints { count: 0 })
        ));
        assert!(matches!(
            Backbone::new(vec![BackbonePoint::new(0.0, 0.0, 0.0, 1.0)]),
            Err(SpineError::TooFewPoints { count: 1 })
        ));
    }

    #[test]
    fn canonical_orientation_reverses_points_and_edges_together() {
        let bb = sample().canonically_oriented();
        let xs: Vec<f64> = bb.points().iter().map(|p| p.x).collect();
        let edges: Vec<f64> = bb.edge_distances().collect();
        assert_eq!(xs, vec![2.0, 6.0, 9.0]);
        assert_eq!(edges, vec![0.5, 2.5, 1.0]);

        // Orienting twice is a no-op.
        assert_eq!(bb.clone().canonically_oriented(), bb);
    }

    #[test]
    fn max_edge_distance() {
        assert_eq!(sample().max_edge_distance(), 2.5);
    }

    #[test]
    fn reversing_twice_restores_order() {
        let bb = sample();
        assert_eq!(bb.reversed().reversed(), bb);
    }
}
