use crate::backbone::Backbone;
use crate::error::{Result, SpineError};
use crate::spline::CubicSpline;

/// A smooth curve through the backbone, parameterized by normalized arc
/// length `t` in `[0, 1]`.
///
/// Each image axis is an independent 1D spline over `t`: `x` follows the
/// backbone `x` coordinate (frame column), `y` the backbone `y` coordinate
/// (frame row). The depth axis `z` contributes to the arc length only.
#[derive(Debug, Clone)]
pub struct FittedCurve {
    /// Frame column as a function of `t`.
    pub x: CubicSpline,
    /// Frame row as a function of `t`.
    pub y: CubicSpline,
    /// Truncated total arc length in pixels; the curve is traced with this
    /// many unit steps.
    pub estimated_length: usize,
}

/// Cumulative point-to-point distances, normalized so that the first sample
/// is at `0.0` and the last at exactly `1.0`.
///
/// Returns the parameters together with the unnormalized total length.
///
/// # Errors
/// [`SpineError::DegenerateCurve`] if all points coincide.
///
/// # Examples
/// ```
/// # use spinemap::backbone::{Backbone, BackbonePoint};
/// # use spinemap::curve_fitter::arc_length_parameters;
/// let bb = Backbone::new(vec![
///     BackbonePoint::new(0.0, 0.0, 0.0, 1.0),
///     BackbonePoint::new(0.0, 0.0, 1.0, 1.0),
///     BackbonePoint::new(0.0, 0.0, 4.0, 1.0),
/// ]).unwrap();
/// let (params, total) = arc_length_parameters(&bb).unwrap();
/// assert_eq!(params, vec![0.0, 0.25, 1.0]);
/// assert_eq!(total, 4.0);
/// ```
pub fn arc_length_parameters(backbone: &Backbone) -> Result<(Vec<f64>, f64)> {
    let points = backbone.points();

    let mut cumulative = Vec::with_capacity(points.len());
    let mut running = 0.0;
    cumulative.push(running);
    for pair in points.windows(2) {
        running += pair[0].distance(&pair[1]);
        cumulative.push(running);
    }

    let total = running;
    if !(total > 0.0) || !total.is_finite() {
        return Err(SpineError::DegenerateCurve {
            total_length: total,
        });
    }

    let last = cumulative.len() - 1;
    for (i, d) in cumulative.iter_mut().enumerate() {
        *d = if i == last { 1.0 } else { *d / total };
    }
    Ok((cumulative, total))
}

/// Fits a [`FittedCurve`] through the backbone samples.
///
/// Consecutive duplicate points share a parameter value; only the first of
/// them becomes a spline knot.
///
/// # Parameters
/// - `backbone`: The ordered samples; their `x`, `y` and `z` all count
///   towards the arc length.
///
/// # Returns
/// One spline per image axis over `t` in `[0, 1]`, plus the total length
/// truncated to whole pixels as `estimated_length`.
///
/// # Errors
/// - [`SpineError::DegenerateCurve`] if the backbone has zero length, or is
///   shorter than one pixel and therefore cannot be traced.
pub fn fit_backbone(backbone: &Backbone) -> Result<FittedCurve> {
    let (params, total) = arc_length_parameters(backbone)?;

    let estimated_length = total.trunc() as usize;
    if estimated_length == 0 {
        return Err(SpineError::DegenerateCurve {
            total_length: total,
        });
    }

    let mut knots = Vec::with_capacity(params.len());
    let mut xs = Vec::with_capacity(params.len());
    let mut ys = Vec::with_capacity(params.len());
    for (&t, p) in params.iter().zip(backbone.points()) {
        if knots.last().is_some_and(|&prev| t <= prev) {
            continue;
        }
        knots.push(t);
        xs.push(p.x);
        ys.push(p.y);
    }
    if knots.len() < params.len() {
        log::debug!(
            "collapsed {} duplicate backbone samples",
            params.len() - knots.len()
        );
    }

    let degenerate = || SpineError::DegenerateCurve {
        total_length: total,
    };
    let x = CubicSpline::interpolate(&knots, &xs).ok_or_else(degenerate)?;
    let y = CubicSpline::interpolate(&knots, &ys).ok_or_else(degenerate)?;

    log::debug!(
        "fitted backbone of {} samples, estimated length {} px",
        backbone.len(),
        estimated_length
    );

    Ok(FittedCurve {
        x,
        y,
        estimated_length,
    })
}
