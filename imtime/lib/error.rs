//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_npy::{ ReadNpyError, WriteNpyError };
use thiserror::Error;

/// Returned when an axis specification cannot describe a uniform, inclusive
/// coordinate grid.
#[derive(Debug, Error)]
pub enum AxisError {
    /// Returned when any of the start, end, or step values is NaN or infinite.
    #[error("axis bounds and step must be finite; got ({0}, {1}, {2})")]
    NonFinite(f64, f64, f64),

    /// Returned when a non-positive step is encountered.
    #[error("axis step must be greater than 0; got {0}")]
    BadStep(f64),

    /// Returned when the end of an axis does not lie strictly after its start.
    #[error("axis end must be greater than start; got start = {0}, end = {1}")]
    Empty(f64, f64),

    /// Returned when the step does not evenly divide the axis length.
    #[error("axis step {step} does not evenly divide the range [{start}, {end}]")]
    Uneven { start: f64, end: f64, step: f64 },
}

/// Returned when an operation requiring arrays of a particular shape
/// encounters an array with a different one.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible shapes; expected {0:?} but got {1:?}")]
pub struct ShapeError(pub Vec<usize>, pub Vec<usize>);

impl ShapeError {
    pub(crate) fn check<S, A>(
        expected: &[usize],
        a: &nd::ArrayBase<S, nd::IxDyn>,
    ) -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        (a.shape() == expected).then_some(())
            .ok_or_else(|| Self(expected.to_vec(), a.shape().to_vec()))
    }
}

/// Returned from grid construction and the relaxation solver.
#[derive(Debug, Error)]
pub enum RelaxError {
    /// [`AxisError`]
    #[error("axis error: {0}")]
    Axis(#[from] AxisError),

    /// [`ShapeError`]
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Returned when a grid is requested with an unsupported number of spatial
    /// dimensions.
    #[error("grids must have between 1 and 3 spatial dimensions; got {0}")]
    BadDim(usize),

    /// Returned when a potential defined for a fixed number of dimensions is
    /// sampled over a grid of a different dimensionality.
    #[error("potential is defined for {0} dimension(s) but the grid has {1}")]
    PotentialDim(usize, usize),

    /// Returned when the per-axis parameters of a potential have mismatched
    /// lengths.
    #[error("potential parameter `{what}` has length {got}; expected {expected}")]
    ParamLen { what: &'static str, expected: usize, got: usize },

    /// Returned when an axis has too few points for the chosen boundary
    /// conditions.
    #[error("axis {axis} has {got} points; at least {min} are required")]
    TooFewPoints { axis: usize, got: usize, min: usize },

    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when a non-positive `maxiters` value is encountered.
    #[error("maxiters must be greater than 0; got {0}")]
    BadMaxiters(usize),

    /// Returned when a wavefunction (initial condition or prior state) with
    /// zero norm is encountered.
    #[error("{0} has zero norm")]
    ZeroNorm(&'static str),

    /// Returned when a non-finite value appears during time evolution.
    #[error("non-finite {what} encountered at step {step}")]
    Numerical { step: usize, what: &'static str },

    /// [`WriteNpyError`]
    #[error("npy write error: {0}")]
    Write(#[from] WriteNpyError),

    /// [`ReadNpyError`]
    #[error("npy read error: {0}")]
    Read(#[from] ReadNpyError),

    /// [`std::io::Error`]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelaxError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(()).ok_or(Self::BadMaxiters(maxiters))
    }

    pub(crate) fn check_finite(x: f64, step: usize, what: &'static str)
        -> Result<(), Self>
    {
        x.is_finite().then_some(()).ok_or(Self::Numerical { step, what })
    }
}
