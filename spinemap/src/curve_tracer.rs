use nalgebra::{Point2, Vector2};

use crate::curve_fitter::FittedCurve;
use crate::error::{Result, SpineError};

/// One pixel step along the traced spine.
///
/// `position` is in frame coordinates (`x` = column, `y` = row) and
/// `tangent` is the unit direction of travel at that point. The index of a
/// traced point in its sequence is its spine coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracedPoint {
    pub position: Point2<f64>,
    pub tangent: Vector2<f64>,
}

impl TracedPoint {
    /// Unit vector perpendicular to the tangent, pointing to the left of the
    /// direction of travel in frame coordinates (towards decreasing rows for a
    /// spine running along increasing columns).
    ///
    /// Both the straightened frame and the model point placement measure
    /// transverse offsets along this vector.
    ///
    /// # Examples
    /// ```
    /// # use nalgebra::{Point2, Vector2};
    /// # use spinemap::curve_tracer::TracedPoint;
    /// let p = TracedPoint { position: Point2::new(0.0, 0.0), tangent: Vector2::new(1.0, 0.0) };
    /// assert_eq!(p.normal(), Vector2::new(0.0, -1.0));
    /// ```
    pub fn normal(&self) -> Vector2<f64> {
        Vector2::new(self.tangent.y, -self.tangent.x)
    }

    /// Linear blend of two traced points, `beta = 0` giving `self`.
    ///
    /// The blended tangent is not renormalized.
    pub fn lerp(&self, other: &TracedPoint, beta: f64) -> TracedPoint {
        TracedPoint {
            position: Point2::from(self.position.coords.lerp(&other.position.coords, beta)),
            tangent: self.tangent.lerp(&other.tangent, beta),
        }
    }
}

/// Samples `curve` at unit-pixel steps of its estimated length.
///
/// The parameter runs over `t_i = i / L` for `i = 0..=L`, where `L` is
/// `curve.estimated_length`, so the result holds `L + 1` points and the last
/// one sits exactly on the curve end.
///
/// # Parameters
/// - `curve`: A curve from [`crate::curve_fitter::fit_backbone`].
///
/// # Returns
/// The traced points in curve order, each with a unit tangent.
///
/// # Errors
/// [`SpineError::DegenerateTangent`] if both spline derivatives vanish at a
/// sample.
pub fn trace_curve(curve: &FittedCurve) -> Result<Vec<TracedPoint>> {
    let length = curve.estimated_length.max(1);
    let step = 1.0 / length as f64;

    let traced = (0..=length)
        .map(|i| {
            let t = if i == length { 1.0 } else { i as f64 * step };
            trace_at(curve, i, t)
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!("traced {} spine points", traced.len());
    Ok(traced)
}

fn trace_at(curve: &FittedCurve, index: usize, t: f64) -> Result<TracedPoint> {
    let position = Point2::new(curve.x.evaluate(t), curve.y.evaluate(t));
    let derivative = Vector2::new(curve.x.derivative(t), curve.y.derivative(t));

    let magnitude = derivative.norm();
    if !(magnitude > 0.0) || !magnitude.is_finite() {
        return Err(SpineError::DegenerateTangent {
            index,
            parameter: t,
        });
    }

    Ok(TracedPoint {
        position,
        tangent: derivative / magnitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backbone::{Backbone, BackbonePoint};
    use crate::curve_fitter::fit_backbone;
    use crate::spline::CubicSpline;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn backbone(points: &[(f64, f64)]) -> Backbone {
        Backbone::new(
            points
                .iter()
                .map(|&(y, x)| BackbonePoint::new(0.0, y, x, 3.0))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn straight_line_along_x() {
        let curve = fit_backbone(&backbone(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)])).unwrap();
        let traced = trace_curve(&curve).unwrap();

        assert_eq!(traced.len(), 3);
        for (i, p) in traced.iter().enumerate() {
            assert_abs_diff_eq!(p.position.x, i as f64, epsilon = 1e-9);
            assert_abs_diff_eq!(p.position.y, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(p.tangent.x, 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(p.tangent.y, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn random_backbones_have_unit_tangents_and_expected_length() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..30 {
            // A gently wiggling body, increasing in x so the curve never stalls.
            let n = rng.random_range(4..20);
            let mut x = 10.0;
            let pts: Vec<(f64, f64)> = (0..n)
                .map(|_| {
                    x += rng.random_range(5.0..15.0);
                    (50.0 + rng.random_range(-4.0..4.0), x)
                })
                .collect();
            let curve = fit_backbone(&backbone(&pts)).unwrap();
            let traced = trace_curve(&curve).unwrap();

            let expected = curve.estimated_length + 1;
            assert!(traced.len().abs_diff(expected) <= 1);
            for p in &traced {
                assert_abs_diff_eq!(p.tangent.norm_squared(), 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn reversed_backbone_traces_same_path_backwards() {
        let bb = backbone(&[(20.0, 5.0), (24.0, 15.0), (22.0, 27.0), (15.0, 35.0), (12.0, 46.0)]);
        let forward = trace_curve(&fit_backbone(&bb).unwrap()).unwrap();
        let backward = trace_curve(&fit_backbone(&bb.reversed()).unwrap()).unwrap();

        assert_eq!(forward.len(), backward.len());
        let n = forward.len();
        for i in 0..n {
            let f = &forward[i];
            let b = &backward[n - 1 - i];
            assert_abs_diff_eq!(f.position.x, b.position.x, epsilon = 1e-6);
            assert_abs_diff_eq!(f.position.y, b.position.y, epsilon = 1e-6);
            assert_abs_diff_eq!(f.tangent.x, -b.tangent.x, epsilon = 1e-6);
            assert_abs_diff_eq!(f.tangent.y, -b.tangent.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn stationary_curve_reports_degenerate_tangent() {
        let flat = CubicSpline::interpolate(&[0.0, 1.0], &[4.0, 4.0]).unwrap();
        let curve = FittedCurve {
            x: flat.clone(),
            y: flat,
            estimated_length: 5,
        };
        assert!(matches!(
            trace_curve(&curve),
            Err(SpineError::DegenerateTangent { index: 0, .. })
        ));
    }

    #[test]
    fn lerp_blends_position_and_tangent() {
        let a = TracedPoint {
            position: Point2::new(0.0, 0.0),
            tangent: Vector2::new(1.0, 0.0),
        };
        let b = TracedPoint {
            position: Point2::new(2.0, 4.0),
            tangent: Vector2::new(0.0, 1.0),
        };
        let m = a.lerp(&b, 0.25);
        assert_abs_diff_eq!(m.position.x, 0.5);
        assert_abs_diff_eq!(m.position.y, 1.0);
        assert_abs_diff_eq!(m.tangent.x, 0.75);
        assert_abs_diff_eq!(m.tangent.y, 0.25);
    }
}
