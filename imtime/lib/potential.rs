//! Scalar potentials and their sampling over a [`Grid`].
//!
//! Closures are wrapped in [`ArrayFn`] (taking `&[f64; N]`) or [`Fixed`]
//! (taking `&[f64]` with a declared length), so that their dimensionality is
//! always checked against the grid before they are evaluated. [`Zero`],
//! [`Quartic`], and [`SoftCoulomb`] depend only on `|x|` and are valid in any
//! number of dimensions.

use ndarray::{ self as nd, Dimension };
use crate::{ error::RelaxError, grid::Grid };

/// A real-valued potential energy function of position.
pub trait Potential {
    /// Evaluate the potential at a single point.
    fn eval(&self, x: &[f64]) -> f64;

    /// Number of spatial dimensions the potential is defined for, if fixed.
    fn dim(&self) -> Option<usize> { None }
}

/// Evaluate a potential at every point of a grid, exactly once per point.
///
/// Returns [`RelaxError::PotentialDim`] if the potential declares a
/// dimensionality different from the grid's.
pub fn sample<P>(grid: &Grid, pot: &P) -> Result<nd::ArrayD<f64>, RelaxError>
where P: Potential + ?Sized
{
    if let Some(d) = pot.dim() {
        if d != grid.ndim() {
            return Err(RelaxError::PotentialDim(d, grid.ndim()));
        }
    }
    let mut x: Vec<f64> = vec![0.0; grid.ndim()];
    let V: nd::ArrayD<f64>
        = nd::ArrayD::from_shape_fn(nd::IxDyn(grid.shape()), |idx| {
            grid.point_into(idx.slice(), &mut x);
            pot.eval(&x)
        });
    Ok(V)
}

/// Identically zero potential, valid in any number of dimensions.
///
/// Together with [`Boundary::Dirichlet`][crate::boundary::Boundary::Dirichlet]
/// this describes an infinite square well spanning the grid.
#[derive(Copy, Clone, Debug, Default)]
pub struct Zero;

impl Potential for Zero {
    fn eval(&self, _x: &[f64]) -> f64 { 0.0 }
}

/// Wraps a closure over points of a fixed, compile-time number of dimensions.
///
/// ```
/// use imtime::{ grid::AxisSpec, potential::ArrayFn, solve::System };
///
/// let pot = ArrayFn::new(|x: &[f64; 2]| x[0] * x[1]);
/// let space = [AxisSpec::new(0.0, 1.0, 0.1)];
/// assert!(System::new(&space, &pot).is_err());
/// ```
#[derive(Copy, Clone, Debug)]
pub struct ArrayFn<const N: usize, F> {
    f: F,
}

impl<const N: usize, F> ArrayFn<N, F>
where F: Fn(&[f64; N]) -> f64
{
    /// Create a new `ArrayFn`.
    pub fn new(f: F) -> Self { Self { f } }
}

impl<const N: usize, F> Potential for ArrayFn<N, F>
where F: Fn(&[f64; N]) -> f64
{
    /// *Panics if `x` has fewer than `N` elements*.
    fn eval(&self, x: &[f64]) -> f64 {
        let x: [f64; N] = std::array::from_fn(|k| x[k]);
        (self.f)(&x)
    }

    fn dim(&self) -> Option<usize> { Some(N) }
}

/// Wraps a closure over slices with a declared number of dimensions.
#[derive(Copy, Clone, Debug)]
pub struct Fixed<F> {
    dim: usize,
    f: F,
}

impl<F> Fixed<F>
where F: Fn(&[f64]) -> f64
{
    /// Create a new `Fixed`.
    pub fn new(dim: usize, f: F) -> Self { Self { dim, f } }
}

impl<F> Potential for Fixed<F>
where F: Fn(&[f64]) -> f64
{
    fn eval(&self, x: &[f64]) -> f64 { (self.f)(x) }

    fn dim(&self) -> Option<usize> { Some(self.dim) }
}

/// Anisotropic harmonic trap,
/// ```text
/// V(x) = Σ_k ω_k² (x_k - c_k)² / 2
/// ```
#[derive(Clone, Debug)]
pub struct Harmonic {
    // trap frequency along each axis
    omega: Vec<f64>,
    // trap center
    center: Vec<f64>,
}

impl Harmonic {
    /// Create a new trap with frequencies `omega` centered on `center`.
    ///
    /// Fails if `omega` and `center` have different lengths.
    pub fn new(omega: Vec<f64>, center: Vec<f64>) -> Result<Self, RelaxError> {
        if center.len() != omega.len() {
            return Err(RelaxError::ParamLen {
                what: "center",
                expected: omega.len(),
                got: center.len(),
            });
        }
        Ok(Self { omega, center })
    }

    /// Create an isotropic trap centered on the origin.
    pub fn isotropic(dim: usize, omega: f64) -> Self {
        Self { omega: vec![omega; dim], center: vec![0.0; dim] }
    }

    /// Get the trap frequencies.
    pub fn omega(&self) -> &[f64] { &self.omega }

    /// Get the trap center.
    pub fn center(&self) -> &[f64] { &self.center }

    /// Return the exact ground state energy, `Σ_k ω_k / 2`.
    pub fn ground_energy(&self) -> f64 { self.omega.iter().sum::<f64>() / 2.0 }
}

impl Potential for Harmonic {
    fn eval(&self, x: &[f64]) -> f64 {
        x.iter().zip(&self.omega).zip(&self.center)
            .map(|((xk, wk), ck)| 0.5 * (wk * (xk - ck)).powi(2))
            .sum()
    }

    fn dim(&self) -> Option<usize> { Some(self.omega.len()) }
}

/// Isotropic quartic well, `V(x) = a |x|⁴`, in any number of dimensions.
#[derive(Copy, Clone, Debug)]
pub struct Quartic {
    pub a: f64,
}

impl Potential for Quartic {
    fn eval(&self, x: &[f64]) -> f64 {
        self.a * x.iter().map(|xk| xk.powi(2)).sum::<f64>().powi(2)
    }
}

/// Smoothed Coulomb attraction about the origin,
/// ```text
/// V(x) = z / √(|x|² + a²)
/// ```
/// where `z` is the signed charge product (negative for attraction) and `a`
/// is the smoothing parameter, which keeps the potential finite at the origin.
/// Valid in any number of dimensions.
#[derive(Copy, Clone, Debug)]
pub struct SoftCoulomb {
    pub z: f64,
    pub a: f64,
}

impl Potential for SoftCoulomb {
    fn eval(&self, x: &[f64]) -> f64 {
        let r2: f64 = x.iter().map(|xk| xk.powi(2)).sum();
        self.z / (r2 + self.a.powi(2)).sqrt()
    }
}

/// Finite square well: `depth` (usually negative) inside the box
/// `[lo, hi]` along every axis, zero outside.
#[derive(Clone, Debug)]
pub struct SquareWell {
    lo: Vec<f64>,
    hi: Vec<f64>,
    depth: f64,
}

impl SquareWell {
    /// Create a new `SquareWell`.
    ///
    /// Fails if `lo` and `hi` have different lengths.
    pub fn new(lo: Vec<f64>, hi: Vec<f64>, depth: f64)
        -> Result<Self, RelaxError>
    {
        if hi.len() != lo.len() {
            return Err(RelaxError::ParamLen {
                what: "hi",
                expected: lo.len(),
                got: hi.len(),
            });
        }
        Ok(Self { lo, hi, depth })
    }
}

impl Potential for SquareWell {
    fn eval(&self, x: &[f64]) -> f64 {
        let inside
            = x.iter().zip(&self.lo).zip(&self.hi)
            .all(|((xk, lk), hk)| (*lk..=*hk).contains(xk));
        if inside { self.depth } else { 0.0 }
    }

    fn dim(&self) -> Option<usize> { Some(self.lo.len()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::AxisSpec;

    fn grid2() -> Grid {
        Grid::new(&[
            AxisSpec::new(-1.0, 1.0, 0.1),
            AxisSpec::new(0.0, 2.0, 0.25),
        ]).unwrap()
    }

    #[test]
    fn sample_values() {
        let grid = grid2();
        let pot = ArrayFn::new(|x: &[f64; 2]| x[0] + 10.0 * x[1]);
        let V = sample(&grid, &pot).unwrap();
        assert_eq!(V.shape(), grid.shape());
        for (idx, v) in V.indexed_iter() {
            let expected = grid.get_x(0)[idx[0]] + 10.0 * grid.get_x(1)[idx[1]];
            assert_eq!(*v, expected);
        }
    }

    #[test]
    fn sample_evaluates_once_per_point() {
        use std::cell::Cell;
        let grid = grid2();
        let count = Cell::new(0_usize);
        let pot = Fixed::new(2, |x: &[f64]| { count.set(count.get() + 1); x[0] });
        sample(&grid, &pot).unwrap();
        assert_eq!(count.get(), grid.len());
    }

    #[test]
    fn resample_bit_identical() {
        let grid = grid2();
        let pot = SoftCoulomb { z: -1.0, a: 0.3 };
        let V1 = sample(&grid, &pot).unwrap();
        let V2 = sample(&grid, &pot).unwrap();
        assert!(
            V1.iter().zip(&V2).all(|(a, b)| a.to_bits() == b.to_bits())
        );
    }

    #[test]
    fn dim_mismatch() {
        let grid = grid2();
        let pot = Harmonic::isotropic(3, 1.0);
        assert!(matches!(
            sample(&grid, &pot),
            Err(RelaxError::PotentialDim(3, 2))
        ));
        let pot = Fixed::new(1, |x: &[f64]| x[0]);
        assert!(matches!(
            sample(&grid, &pot),
            Err(RelaxError::PotentialDim(1, 2))
        ));
        assert!(sample(&grid, &Fixed::new(2, |x: &[f64]| x[1])).is_ok());
        assert!(sample(&grid, &Zero).is_ok());
    }

    #[test]
    fn array_fn_dim_mismatch() {
        let grid = grid2();
        // a closure reading x[2] must never be called on a 2D grid
        let pot = ArrayFn::new(|x: &[f64; 3]| x[2]);
        assert!(matches!(
            sample(&grid, &pot),
            Err(RelaxError::PotentialDim(3, 2))
        ));
        let pot = ArrayFn::new(|x: &[f64; 1]| x[0]);
        assert!(matches!(
            sample(&grid, &pot),
            Err(RelaxError::PotentialDim(1, 2))
        ));
        let pot = ArrayFn::new(|x: &[f64; 2]| x[1]);
        assert_eq!(pot.dim(), Some(2));
        assert_eq!(pot.eval(&[1.0, 2.0]), 2.0);
    }

    #[test]
    fn param_len_mismatch() {
        assert!(matches!(
            Harmonic::new(vec![1.0, 2.0], vec![0.0]),
            Err(RelaxError::ParamLen { what: "center", expected: 2, got: 1 })
        ));
        assert!(matches!(
            SquareWell::new(vec![-1.0], vec![1.0, 1.0], -5.0),
            Err(RelaxError::ParamLen { what: "hi", expected: 1, got: 2 })
        ));
        let h = Harmonic::new(vec![1.0, 2.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(h.dim(), Some(2));
        assert_eq!(h.center(), &[0.0, 1.0]);
    }

    #[test]
    fn builtin_values() {
        let h = Harmonic::new(vec![1.0, 2.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(h.eval(&[1.0, 2.0]), 0.5 + 2.0);
        assert_eq!(h.ground_energy(), 1.5);
        assert_eq!(Quartic { a: 2.0 }.eval(&[1.0, 1.0]), 8.0);
        assert_eq!(SoftCoulomb { z: -1.0, a: 1.0 }.eval(&[0.0]), -1.0);
        let b = SquareWell::new(vec![-1.0], vec![1.0], -5.0).unwrap();
        assert_eq!(b.eval(&[0.5]), -5.0);
        assert_eq!(b.eval(&[1.5]), 0.0);
    }
}
