use crate::backbone::Backbone;
use crate::curve_fitter::fit_backbone;
use crate::curve_tracer::{trace_curve, TracedPoint};
use crate::error::Result;
use crate::frame::Frame;
use crate::model_points::ModelPoint;
use crate::pose::{place_model_points, PlacedPoint, PoseInfo};
use crate::restack::{restack_by_spline, RestackedFrame};

/// Runs the backbone pipeline once and keeps what the consumers need.
///
/// The steps are:
/// 1. Fit a [`crate::curve_fitter::FittedCurve`] through the backbone samples.
/// 2. Trace it at pixel resolution into [`TracedPoint`]s.
/// 3. Serve both straightening ([`Spine::straighten`]) and model point
///    placement ([`Spine::place`]) from the same traced points.
#[derive(Debug, Clone)]
pub struct Spine {
    traced: Vec<TracedPoint>,
    edge_distances: Vec<f64>,
}

impl Spine {
    /// Fits and traces `backbone`.
    ///
    /// # Errors
    /// Fails with the fitting or tracing error; nothing downstream is
    /// meaningful without a traced spine.
    ///
    /// # Examples
    /// ```
    /// # use spinemap::backbone::{Backbone, BackbonePoint};
    /// # use spinemap::spine::Spine;
    /// let bb = Backbone::new(vec![
    ///     BackbonePoint::new(0.0, 5.0, 0.0, 2.0),
    ///     BackbonePoint::new(0.0, 5.0, 10.0, 2.0),
    /// ]).unwrap();
    /// let spine = Spine::from_backbone(&bb).unwrap();
    /// assert_eq!(spine.traced().len(), 11);
    /// ```
    pub fn from_backbone(backbone: &Backbone) -> Result<Spine> {
        let curve = fit_backbone(backbone)?;
        let traced = trace_curve(&curve)?;
        Ok(Spine {
            traced,
            edge_distances: backbone.edge_distances().collect(),
        })
    }

    /// The traced points, indexed by spine coordinate.
    pub fn traced(&self) -> &[TracedPoint] {
        &self.traced
    }

    /// Straightens `frame` along this spine.
    pub fn straighten(&self, frame: &Frame) -> RestackedFrame {
        restack_by_spline(&self.traced, frame, self.edge_distances.iter().copied())
    }

    /// Places `points` for the given pose, omitting those off the spine.
    pub fn place(&self, points: &[ModelPoint], pose: &PoseInfo) -> Vec<PlacedPoint> {
        place_model_points(points, &self.traced, pose)
    }
}
