//! Energy-based convergence detection for imaginary-time relaxation.

use crate::error::RelaxError;

/// Reason a relaxation loop stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stop {
    /// The relative change in energy between successive steps fell below the
    /// configured tolerance.
    Converged,
    /// The iteration limit was reached before (or without) meeting a
    /// tolerance. This is a normal outcome, not an error.
    Exhausted,
}

impl Stop {
    /// Return `true` if `self` is `Converged`.
    pub fn is_converged(&self) -> bool { matches!(self, Self::Converged) }

    /// Return `true` if `self` is `Exhausted`.
    pub fn is_exhausted(&self) -> bool { matches!(self, Self::Exhausted) }
}

/// Relative change between two successive energy estimates,
/// `|1 - prev / cur|`.
///
/// Returns `NaN` or `inf` if `cur` is zero, which never compares as less than
/// a tolerance.
pub fn rel_change(prev: f64, cur: f64) -> f64 { (1.0 - prev / cur).abs() }

/// Stopping rule for the relaxation loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Convergence {
    epsilon: Option<f64>,
    limit: usize,
}

impl Convergence {
    /// Create a new stopping rule.
    ///
    /// `nt` is the number of points on the imaginary-time axis; the loop runs
    /// for at most `min(nt, maxiters)` iterations. Passing `epsilon = None`
    /// disables early stopping.
    pub fn new(nt: usize, maxiters: Option<usize>, epsilon: Option<f64>)
        -> Result<Self, RelaxError>
    {
        if let Some(eps) = epsilon { RelaxError::check_epsilon(eps)?; }
        if let Some(m) = maxiters { RelaxError::check_maxiters(m)?; }
        let limit = maxiters.map(|m| m.min(nt)).unwrap_or(nt);
        Ok(Self { epsilon, limit })
    }

    /// Get the maximum number of iterations.
    pub fn limit(&self) -> usize { self.limit }

    /// Get the stopping tolerance, if any.
    pub fn epsilon(&self) -> Option<f64> { self.epsilon }

    /// Decide whether the loop should stop after the last recorded energy.
    ///
    /// `energies` holds one entry per completed iteration, the most recent
    /// last.
    pub fn check(&self, energies: &[f64]) -> Option<Stop> {
        let n = energies.len();
        if n == 0 { return None; }
        if let Some(eps) = self.epsilon {
            if n > 1 && rel_change(energies[n - 2], energies[n - 1]) < eps {
                return Some(Stop::Converged);
            }
        }
        (n >= self.limit).then_some(Stop::Exhausted)
    }
}
