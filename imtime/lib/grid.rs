//! Construction of regular rectilinear coordinate grids from per-axis
//! "range-style" specifications.
//!
//! ```
//! use imtime::grid::{ AxisSpec, Grid };
//!
//! let grid = Grid::new(&[
//!     AxisSpec::new(0.0, 1.0, 0.25),
//!     AxisSpec::new(-1.0, 1.0, 0.5),
//! ]).unwrap();
//! assert_eq!(grid.shape(), &[5, 5]);
//! assert_eq!(grid.get_x(1)[4], 1.0);
//! assert_eq!(grid.dv(), 0.125);
//! ```

use ndarray as nd;
use crate::error::{ AxisError, RelaxError };

pub type AxisResult<T> = Result<T, AxisError>;

// relative tolerance on `(end - start) / step` being an integer
const DIV_EPSILON: f64 = 1e-9;

/// Immutable (start, end, step) triple describing a single uniformly sampled
/// axis, inclusive of both endpoints.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AxisSpec {
    /// First coordinate.
    pub start: f64,
    /// Last coordinate.
    pub end: f64,
    /// Spacing between adjacent coordinates.
    pub step: f64,
}

impl AxisSpec {
    /// Create a new `AxisSpec`. No validation is performed until the point
    /// count or coordinates are requested.
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// Return the number of points on the axis, `(end - start) / step + 1`.
    ///
    /// The ratio is rounded to the nearest integer if it lies within a small
    /// floating-point tolerance of one; otherwise [`AxisError::Uneven`] is
    /// returned.
    pub fn npoints(&self) -> AxisResult<usize> {
        let Self { start, end, step } = *self;
        if !(start.is_finite() && end.is_finite() && step.is_finite()) {
            return Err(AxisError::NonFinite(start, end, step));
        }
        if step <= 0.0 { return Err(AxisError::BadStep(step)); }
        if end <= start { return Err(AxisError::Empty(start, end)); }
        let r = (end - start) / step;
        let k = r.round();
        if (r - k).abs() > DIV_EPSILON * k.max(1.0) {
            return Err(AxisError::Uneven { start, end, step });
        }
        Ok(k as usize + 1)
    }

    /// Generate the coordinate array.
    ///
    /// Coordinates are computed as `start + i * step`, with the last one
    /// pinned to exactly `end`.
    pub fn coords(&self) -> AxisResult<nd::Array1<f64>> {
        let n = self.npoints()?;
        let mut x: nd::Array1<f64>
            = (0..n).map(|i| self.start + i as f64 * self.step).collect();
        x[n - 1] = self.end;
        Ok(x)
    }
}

impl From<(f64, f64, f64)> for AxisSpec {
    fn from(xargs: (f64, f64, f64)) -> Self { Self::new(xargs.0, xargs.1, xargs.2) }
}

/// Coordinate arrays for a regular rectilinear grid in 1–3 spatial dimensions.
///
/// The shape of the grid is fixed at construction.
#[derive(Clone, Debug)]
pub struct Grid {
    // coordinate arrays, one per axis
    x: Vec<nd::Array1<f64>>,
    // grid spacing along each axis
    dx: Vec<f64>,
    // number of points along each axis
    shape: Vec<usize>,
}

impl Grid {
    /// Build a new grid from one `AxisSpec` per spatial dimension.
    pub fn new(axes: &[AxisSpec]) -> Result<Self, RelaxError> {
        if !(1..=3).contains(&axes.len()) {
            return Err(RelaxError::BadDim(axes.len()));
        }
        let x: Vec<nd::Array1<f64>>
            = axes.iter()
            .map(|ax| ax.coords())
            .collect::<AxisResult<_>>()?;
        let dx: Vec<f64> = axes.iter().map(|ax| ax.step).collect();
        let shape: Vec<usize> = x.iter().map(|xk| xk.len()).collect();
        Ok(Self { x, dx, shape })
    }

    /// Return a new zero-initialized field matching the grid's shape.
    pub fn zeros(&self) -> nd::ArrayD<f64> {
        nd::ArrayD::zeros(nd::IxDyn(&self.shape))
    }

    /// Get the number of points along each axis.
    pub fn shape(&self) -> &[usize] { &self.shape }

    /// Get the number of spatial dimensions.
    pub fn ndim(&self) -> usize { self.shape.len() }

    /// Get the total number of grid points.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.shape.iter().product() }

    /// Get a reference to the coordinate array for axis `k`.
    ///
    /// *Panics if `k` is not less than the number of dimensions*.
    pub fn get_x(&self, k: usize) -> &nd::Array1<f64> { &self.x[k] }

    /// Get references to all coordinate arrays.
    pub fn axes(&self) -> &[nd::Array1<f64>] { &self.x }

    /// Get the grid spacing along each axis.
    pub fn steps(&self) -> &[f64] { &self.dx }

    /// Get the volume element, i.e. the product of all grid spacings.
    pub fn dv(&self) -> f64 { self.dx.iter().product() }

    /// Write the coordinates of the grid point at `idx` into `buf`.
    ///
    /// *Panics if `idx` or `buf` are shorter than the number of dimensions*.
    pub fn point_into(&self, idx: &[usize], buf: &mut [f64]) {
        buf.iter_mut().zip(idx).zip(&self.x)
            .for_each(|((bk, ik), xk)| { *bk = xk[*ik]; });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npoints_inclusive() {
        assert_eq!(AxisSpec::new(0.0, 1.0, 0.01).npoints().unwrap(), 101);
        assert_eq!(AxisSpec::new(-2.0, 2.0, 0.5).npoints().unwrap(), 9);
        assert_eq!(AxisSpec::new(0.0, 0.3, 0.1).npoints().unwrap(), 4);
    }

    #[test]
    fn coords_hit_both_endpoints() {
        let ax = AxisSpec::new(0.0, 1.0, 0.01);
        let x = ax.coords().unwrap();
        assert_eq!(x.len(), 101);
        assert_eq!(x[0], 0.0);
        assert_eq!(x[100], 1.0);
        x.iter().zip(x.iter().skip(1))
            .for_each(|(xk, xkp1)| assert!((xkp1 - xk - 0.01).abs() < 1e-12));
    }

    #[test]
    fn bad_axes() {
        assert!(matches!(
            AxisSpec::new(0.0, 1.0, 0.3).npoints(),
            Err(AxisError::Uneven { .. })
        ));
        assert!(matches!(
            AxisSpec::new(0.0, 1.0, 0.0).npoints(),
            Err(AxisError::BadStep(_))
        ));
        assert!(matches!(
            AxisSpec::new(1.0, 1.0, 0.1).npoints(),
            Err(AxisError::Empty(..))
        ));
        assert!(matches!(
            AxisSpec::new(0.0, f64::NAN, 0.1).npoints(),
            Err(AxisError::NonFinite(..))
        ));
    }

    #[test]
    fn grid_shape() {
        let grid = Grid::new(&[
            AxisSpec::new(0.0, 1.0, 0.01),
            AxisSpec::new(0.0, 2.0, 0.05),
            AxisSpec::new(-1.0, 1.0, 0.1),
        ]).unwrap();
        assert_eq!(grid.shape(), &[101, 41, 21]);
        assert_eq!(grid.ndim(), 3);
        assert_eq!(grid.len(), 101 * 41 * 21);
        assert_eq!(grid.zeros().shape(), &[101, 41, 21]);
        assert!((grid.dv() - 0.01 * 0.05 * 0.1).abs() < 1e-15);
        grid.axes().iter()
            .zip([(0.0, 1.0), (0.0, 2.0), (-1.0, 1.0)])
            .for_each(|(x, (a, b))| {
                assert_eq!(x[0], a);
                assert_eq!(x[x.len() - 1], b);
            });
        let mut buf = [0.0; 3];
        grid.point_into(&[100, 0, 10], &mut buf);
        assert_eq!(buf[0], 1.0);
        assert_eq!(buf[1], 0.0);
        assert!(buf[2].abs() < 1e-12);
    }

    #[test]
    fn grid_dims() {
        assert!(matches!(Grid::new(&[]), Err(RelaxError::BadDim(0))));
        let ax = AxisSpec::new(0.0, 1.0, 0.5);
        assert!(matches!(Grid::new(&[ax; 4]), Err(RelaxError::BadDim(4))));
        assert!(matches!(
            Grid::new(&[ax, AxisSpec::new(0.0, 1.0, 0.4)]),
            Err(RelaxError::Axis(_))
        ));
    }
}
