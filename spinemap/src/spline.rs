use nalgebra::{DMatrix, DVector};

/// An interpolating cubic spline `f(t)` through samples `(t_i, v_i)`.
///
/// The spline is stored by its knots, the sampled values and the second
/// derivative ("moment") at every knot. Ends use the not-a-knot condition:
/// the third derivative is continuous across the second and the penultimate
/// knot, so the first two and the last two pieces are the same cubic.
/// Three samples therefore yield the interpolating parabola and two samples
/// the straight segment between them.
///
/// Outside `[t_0, t_n]` the first and last pieces are extended.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    moments: Vec<f64>,
}

impl CubicSpline {
    /// Fits the spline through `(knots[i], values[i])`.
    ///
    /// `knots` must be strictly increasing and hold at least two entries;
    /// `values` must have the same length. Returns `None` when these
    /// preconditions are violated or the moment system is singular.
    ///
    /// # Examples
    /// ```
    /// # use spinemap::spline::CubicSpline;
    /// let s = CubicSpline::interpolate(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 8.0, 27.0]).unwrap();
    /// // Not-a-knot reproduces cubics exactly.
    /// assert!((s.evaluate(1.5) - 3.375).abs() < 1e-9);
    /// assert!((s.derivative(2.5) - 18.75).abs() < 1e-9);
    /// ```
    pub fn interpolate(knots: &[f64], values: &[f64]) -> Option<CubicSpline> {
        let n = knots.len();
        if n < 2 || values.len() != n {
            return None;
        }
        if knots.windows(2).any(|w| !(w[1] > w[0])) {
            return None;
        }

        let moments = match n {
            2 => vec![0.0, 0.0],
            _ => Self::solve_moments(knots, values)?,
        };

        Some(CubicSpline {
            knots: knots.to_vec(),
            values: values.to_vec(),
            moments,
        })
    }

    /// Sets up and solves the `n x n` linear system for the knot moments.
    fn solve_moments(knots: &[f64], values: &[f64]) -> Option<Vec<f64>> {
        let n = knots.len();
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();

        let mut a = DMatrix::<f64>::zeros(n, n);
        let mut b = DVector::<f64>::zeros(n);

        // Continuity of the first derivative at interior knots.
        for i in 1..n - 1 {
            a[(i, i - 1)] = h[i - 1];
            a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            a[(i, i + 1)] = h[i];
            b[i] = 6.0
                * ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1]);
        }

        if n == 3 {
            // Single parabola: constant second derivative.
            a[(0, 0)] = 1.0;
            a[(0, 1)] = -1.0;
            a[(2, 1)] = 1.0;
            a[(2, 2)] = -1.0;
        } else {
            // Not-a-knot at t_1 and t_{n-2}.
            a[(0, 0)] = h[1];
            a[(0, 1)] = -(h[0] + h[1]);
            a[(0, 2)] = h[0];
            a[(n - 1, n - 3)] = h[n - 2];
            a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
            a[(n - 1, n - 1)] = h[n - 3];
        }

        let solution = a.lu().solve(&b)?;
        Some(solution.iter().copied().collect())
    }

    /// Index `i` of the piece `[t_i, t_{i+1}]` used for `t`.
    fn segment(&self, t: f64) -> usize {
        let last = self.knots.len() - 2;
        self.knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(last)
    }

    /// Value of the spline at `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        let i = self.segment(t);
        let (t0, t1) = (self.knots[i], self.knots[i + 1]);
        let (m0, m1) = (self.moments[i], self.moments[i + 1]);
        let h = t1 - t0;
        let a = t1 - t;
        let b = t - t0;

        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (self.values[i] / h - m0 * h / 6.0) * a
            + (self.values[i + 1] / h - m1 * h / 6.0) * b
    }

    /// First derivative of the spline at `t`.
    pub fn derivative(&self, t: f64) -> f64 {
        let i = self.segment(t);
        let (t0, t1) = (self.knots[i], self.knots[i + 1]);
        let (m0, m1) = (self.moments[i], self.moments[i + 1]);
        let h = t1 - t0;
        let a = t1 - t;
        let b = t - t0;

        -m0 * a * a / (2.0 * h) + m1 * b * b / (2.0 * h)
            + (self.values[i + 1] - self.values[i]) / h
            - (m1 - m0) * h / 6.0
    }

    /// The parameter range `[t_0, t_n]` covered by the samples.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn passes_through_samples() {
        let knots = [0.0, 0.1, 0.35, 0.5, 0.8, 1.0];
        let values = [3.0, -1.0, 2.0, 2.5, 0.0, 4.0];
        let s = CubicSpline::interpolate(&knots, &values).unwrap();
        for (&t, &v) in knots.iter().zip(values.iter()) {
            assert_abs_diff_eq!(s.evaluate(t), v, epsilon = 1e-9);
        }
    }

    #[test]
    fn two_samples_give_a_line() {
        let s = CubicSpline::interpolate(&[0.0, 1.0], &[2.0, 6.0]).unwrap();
        assert_abs_diff_eq!(s.evaluate(0.25), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.derivative(0.7), 4.0, epsilon = 1e-12);
        // Extended past the end.
        assert_abs_diff_eq!(s.evaluate(1.5), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn three_samples_give_the_parabola() {
        // v = t^2 sampled at uneven knots.
        let s = CubicSpline::interpolate(&[0.0, 0.3, 1.0], &[0.0, 0.09, 1.0]).unwrap();
        assert_abs_diff_eq!(s.evaluate(0.6), 0.36, epsilon = 1e-9);
        assert_abs_diff_eq!(s.derivative(0.6), 1.2, epsilon = 1e-9);
    }

    #[test]
    fn reproduces_cubic_with_uneven_knots() {
        let f = |t: f64| 2.0 * t.powi(3) - t * t + 0.5 * t - 1.0;
        let df = |t: f64| 6.0 * t * t - 2.0 * t + 0.5;
        let knots = [0.0, 0.05, 0.2, 0.45, 0.7, 1.0];
        let values: Vec<f64> = knots.iter().map(|&t| f(t)).collect();
        let s = CubicSpline::interpolate(&knots, &values).unwrap();
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert_abs_diff_eq!(s.evaluate(t), f(t), epsilon = 1e-9);
            assert_abs_diff_eq!(s.derivative(t), df(t), epsilon = 1e-8);
        }
    }

    #[test]
    fn rejects_non_increasing_knots() {
        assert!(CubicSpline::interpolate(&[0.0, 0.5, 0.5, 1.0], &[0.0; 4]).is_none());
        assert!(CubicSpline::interpolate(&[0.0], &[1.0]).is_none());
        assert!(CubicSpline::interpolate(&[0.0, 1.0], &[1.0]).is_none());
    }
}
