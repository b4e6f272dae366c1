use crate::error::{Result, SpineError};

/// A single-channel microscopy frame with floating-point intensities.
///
/// Pixels are stored row by row; `(row, col)` addresses `data[row * width + col]`.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Intensities in row-major order, `width * height` entries.
    pub data: Vec<f32>,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Default for Frame {
    /// An empty `Frame` with zero width and height.
    fn default() -> Frame {
        Frame {
            data: Vec::new(),
            width: 0,
            height: 0,
        }
    }
}

impl Frame {
    /// Wraps a row-major intensity buffer.
    ///
    /// # Errors
    /// [`SpineError::FrameSize`] if `data.len() != width * height`.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Result<Frame> {
        if data.len() != width * height {
            return Err(SpineError::FrameSize {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Frame {
            data,
            width,
            height,
        })
    }

    /// Builds a frame by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Frame {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Frame {
            data,
            width,
            height,
        }
    }

    /// Returns the intensity at integer `(row, col)`, `None` outside the frame.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height || col >= self.width {
            None
        } else {
            Some(self.data[row * self.width + col])
        }
    }

    /// Bilinearly interpolated intensity at the fractional `(row, col)`.
    ///
    /// Returns `None` for negative or non-finite coordinates and whenever one
    /// of the neighbors that contributes to the result lies outside the frame.
    /// A coordinate exactly on the last row or column only needs that row or
    /// column and is therefore in range.
    ///
    /// # Examples
    /// ```
    /// # use spinemap::frame::Frame;
    /// let frame = Frame::new(vec![0.0, 10.0, 20.0, 30.0], 2, 2).unwrap();
    /// assert_eq!(frame.point_interpolate(0.5, 0.5), Some(15.0));
    /// assert_eq!(frame.point_interpolate(1.0, 1.0), Some(30.0));
    /// assert_eq!(frame.point_interpolate(1.5, 0.0), None);
    /// assert_eq!(frame.point_interpolate(-0.1, 0.0), None);
    /// ```
    pub fn point_interpolate(&self, row: f64, col: f64) -> Option<f32> {
        if !(row >= 0.0 && col >= 0.0) || !row.is_finite() || !col.is_finite() {
            return None;
        }
        if self.width == 0
            || self.height == 0
            || row > (self.height - 1) as f64
            || col > (self.width - 1) as f64
        {
            return None;
        }

        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let fr = (row - r0 as f64) as f32;
        let fc = (col - c0 as f64) as f32;

        // A zero weight does not need the far neighbor.
        let r1 = if fr > 0.0 { r0 + 1 } else { r0 };
        let c1 = if fc > 0.0 { c0 + 1 } else { c0 };

        let p00 = self.get(r0, c0)?;
        let p01 = self.get(r0, c1)?;
        let p10 = self.get(r1, c0)?;
        let p11 = self.get(r1, c1)?;

        let top = p00 * (1.0 - fc) + p01 * fc;
        let bottom = p10 * (1.0 - fc) + p11 * fc;
        Some(top * (1.0 - fr) + bottom * fr)
    }
}
