use crate::curve_tracer::TracedPoint;
use crate::frame::Frame;

/// The straightened body: one column per traced spine point, the spine itself
/// running along the middle row.
#[derive(Debug, Clone, PartialEq)]
pub struct RestackedFrame {
    /// Truncated intensities in row-major order, `width * height` entries.
    /// Pixels whose source fell outside the frame stay `0`.
    pub data: Vec<i32>,
    pub width: usize,
    pub height: usize,
}

impl RestackedFrame {
    fn zeroed(width: usize, height: usize) -> Self {
        RestackedFrame {
            data: vec![0; width * height],
            width,
            height,
        }
    }

    /// The row holding the spine.
    pub fn base_row(&self) -> usize {
        self.height / 2
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.height || col >= self.width {
            None
        } else {
            Some(self.data[row * self.width + col])
        }
    }

    fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[row * self.width + col] = value;
    }
}

/// Straightens `frame` along the traced spine.
///
/// The output is `traced.len()` columns wide and `2 * ceil(max edge
/// distance)` rows high. For column `x` the source is walked from the traced
/// position along [`TracedPoint::normal`]: `k` steps along the normal land in
/// row `base_row - k` (for `k = 0..=base_row`), `k` steps against it in row
/// `base_row + k` (for `k = 1..base_row`), so every row is visited once.
///
/// Samples with a negative coordinate or outside the frame leave the pixel at
/// `0`; the rest of the image is unaffected.
///
/// # Parameters
/// - `traced`: The traced spine, one output column per point.
/// - `frame`: The curved source frame.
/// - `edge_distances`: Backbone edge distances; only the maximum is used.
///
/// # Returns
/// The straightened raster. It is empty (zero rows) when the maximum edge
/// distance is zero or its pixel count does not fit in `usize`.
///
/// # Examples
/// ```
/// # use nalgebra::{Point2, Vector2};
/// # use spinemap::curve_tracer::TracedPoint;
/// # use spinemap::frame::Frame;
/// # use spinemap::restack::restack_by_spline;
/// let frame = Frame::from_fn(10, 10, |r, _| r as f32);
/// let traced: Vec<TracedPoint> = (2..6)
///     .map(|c| TracedPoint {
///         position: Point2::new(c as f64, 5.0),
///         tangent: Vector2::new(1.0, 0.0),
///     })
///     .collect();
/// let out = restack_by_spline(&traced, &frame, [1.5, 2.0]);
/// assert_eq!((out.height, out.width), (4, 4));
/// // Spine row, then one pixel "up" (towards row 4) and one "down".
/// assert_eq!(out.get(2, 0), Some(5));
/// assert_eq!(out.get(1, 0), Some(4));
/// assert_eq!(out.get(3, 0), Some(6));
/// ```
pub fn restack_by_spline(
    traced: &[TracedPoint],
    frame: &Frame,
    edge_distances: impl IntoIterator<Item = f64>,
) -> RestackedFrame {
    let max_edge = edge_distances.into_iter().fold(0.0, f64::max);
    let width = traced.len();
    let height = match raster_height(max_edge, width) {
        Some(height) => height,
        None => {
            log::warn!("restack: edge distance {max_edge} gives no representable raster");
            return RestackedFrame::zeroed(width, 0);
        }
    };

    let mut out = RestackedFrame::zeroed(width, height);
    if height == 0 {
        log::warn!("restack: backbone has no positive edge distance, output is empty");
        return out;
    }
    let base_row = out.base_row();
    let mut skipped = 0usize;

    for (col, point) in traced.iter().enumerate() {
        let normal = point.normal();

        for k in 0..=base_row {
            let source = point.position + normal * k as f64;
            match frame.point_interpolate(source.y, source.x) {
                Some(v) => out.set(base_row - k, col, v as i32),
                None => skipped += 1,
            }
        }
        for k in 1..base_row {
            let source = point.position - normal * k as f64;
            match frame.point_interpolate(source.y, source.x) {
                Some(v) => out.set(base_row + k, col, v as i32),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        log::debug!("restack: {skipped} samples fell outside the frame");
    }
    out
}

/// `2 * ceil(max_edge)`, or `None` when that or the pixel count overflows.
fn raster_height(max_edge: f64, width: usize) -> Option<usize> {
    if !max_edge.is_finite() {
        return None;
    }
    let height = (max_edge.ceil() as usize).checked_mul(2)?;
    width.checked_mul(height)?;
    Some(height)
}
