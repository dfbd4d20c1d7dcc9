//! One-dimensional interpolation helpers used to resample beam stations.

use nalgebra::Vector3;

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be non-decreasing. Values outside `[xp[0], xp[last]]` are clamped
/// to the end values.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    let n = xp.len();
    if n == 0 {
        return 0.0;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    // First station strictly beyond x
    let hi = xp.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let dx = xp[hi] - xp[lo];
    if dx <= 0.0 {
        return fp[hi];
    }
    let t = (x - xp[lo]) / dx;
    fp[lo] + t * (fp[hi] - fp[lo])
}

/// Interpolate at every point of `x`.
pub fn interp_many(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    x.iter().map(|&xi| interp(xi, xp, fp)).collect()
}

/// `n` evenly spaced values from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Midpoints of consecutive values.
pub fn midpoints(x: &[f64]) -> Vec<f64> {
    x.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Cumulative arclength along a polyline, starting at zero.
pub fn cumulative_arclength(points: &[Vector3<f64>]) -> Vec<f64> {
    let mut s = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            acc += (p - points[i - 1]).norm();
        }
        s.push(acc);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interp_inside_and_clamped() {
        let xp = [0.0, 1.0, 3.0];
        let fp = [10.0, 20.0, 0.0];
        assert_eq!(interp(-1.0, &xp, &fp), 10.0);
        assert_eq!(interp(0.5, &xp, &fp), 15.0);
        assert_eq!(interp(1.0, &xp, &fp), 20.0);
        assert_eq!(interp(2.0, &xp, &fp), 10.0);
        assert_eq!(interp(5.0, &xp, &fp), 0.0);
    }

    #[test]
    fn linspace_includes_end_points() {
        let v = linspace(0.0, 10.0, 5);
        assert_eq!(v, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn arclength_of_polyline() {
        let pts = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(3.0, 4.0, 0.0),
            Vector3::new(3.0, 4.0, 2.0),
        ];
        assert_eq!(cumulative_arclength(&pts), vec![0.0, 5.0, 7.0]);
        assert_eq!(midpoints(&[0.0, 5.0, 7.0]), vec![2.5, 6.0]);
    }
}
