//! Relaxation of wavefunctions to stationary states by propagation of the
//! Schrödinger equation in imaginary time.
//!
//! Each [`Solver::step`] performs, in order:
//! 1. deflation against all prior states
//! 2. evaluation of the kinetic term `T = ∇²q / 2` by central differences
//! 3. the energy estimate `E = (Σ V q² - Σ T q) / Σ q²`
//! 4. a semi-implicit Euler step `q → α q + δt β T`, with
//!    `β = 1 / (1 + δt V / 2)` and `α = (1 - δt V / 2) β`
//! 5. renormalization
//!
//! Steps 4 and 5 are skipped on the final iteration, so that the energy last
//! recorded is the energy of the returned wavefunction.
//!
//! All sums run over the distinct lattice sites given by
//! [`Boundary::sites`], so that the periodic seam is counted once.

use std::cmp;
use ndarray as nd;
use crate::{
    ArrD,
    boundary::{ Boundary, zero_edges },
    error::{ RelaxError, ShapeError },
    grid::{ AxisSpec, Grid },
    monitor::{ Convergence, Stop },
    potential::{ self, Potential },
    utils::{ wf_dot, wf_norm },
    DEF_EPSILON,
};

pub type RelaxResult<T> = Result<T, RelaxError>;

// an initial state whose norm drops below this fraction of its original value
// under deflation is taken to lie in the span of the priors
const SPAN_EPSILON: f64 = 1e-10;

/// A single converged (or exhausted) relaxation run.
///
/// This struct is usually only returned by [`Solver::into_solution`] or one of
/// the thin interfaces on [`System`]; you probably won't ever instantiate it
/// yourself.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Final energy estimate.
    pub e: f64,
    /// Final wavefunction.
    pub wf: nd::ArrayD<f64>,
    /// Energy estimate at every iteration.
    pub energies: Vec<f64>,
    /// Norm of the wavefunction after every non-final update, prior to
    /// rescaling.
    pub norms: Vec<f64>,
    /// Why the run stopped.
    pub stop: Stop,
}

impl Solution {
    /// Compare two `Solution`s by their energy.
    pub fn cmp_energy(&self, other: &Self) -> Option<cmp::Ordering> {
        self.e.partial_cmp(&other.e)
    }

    /// Number of iterations performed.
    pub fn iters(&self) -> usize { self.energies.len() }

    /// Return `true` if the run stopped by meeting its energy tolerance.
    pub fn converged(&self) -> bool { self.stop.is_converged() }
}

/// Coordinate grid together with a potential sampled over it.
///
/// The potential is sampled exactly once, on construction, and can then be
/// shared by any number of [`Solver`]s.
#[derive(Clone, Debug)]
pub struct System {
    // coordinate grid
    grid: Grid,
    // potential array
    V: nd::ArrayD<f64>,
}

impl System {
    /// Build a grid from per-axis specifications and sample a potential over
    /// it.
    pub fn new<P>(space: &[AxisSpec], pot: &P) -> RelaxResult<Self>
    where P: Potential + ?Sized
    {
        Self::from_grid(Grid::new(space)?, pot)
    }

    /// Sample a potential over an existing grid.
    pub fn from_grid<P>(grid: Grid, pot: &P) -> RelaxResult<Self>
    where P: Potential + ?Sized
    {
        let V = potential::sample(&grid, pot)?;
        Ok(Self { grid, V })
    }

    /// Create a new `System` from a grid and a bare potential array.
    pub fn from_arrays(grid: Grid, V: nd::ArrayD<f64>) -> RelaxResult<Self> {
        ShapeError::check(grid.shape(), &V)?;
        Ok(Self { grid, V })
    }

    /// Get a reference to the coordinate grid.
    pub fn grid(&self) -> &Grid { &self.grid }

    /// Get a reference to the potential array.
    pub fn get_V(&self) -> &nd::ArrayD<f64> { &self.V }

    /// Get the volume element of the grid.
    pub fn dv(&self) -> f64 { self.grid.dv() }

    /// Thin interface to [`Solver`]: relax a single initial state.
    pub fn relax<'a>(
        &'a self,
        time: AxisSpec,
        config: Config<'a>,
        q0: nd::ArrayD<f64>,
    ) -> RelaxResult<Solution>
    {
        let mut solver = Solver::new(self, time, config, q0)?;
        solver.run()?;
        Ok(solver.into_solution())
    }

    /// Thin interface to [`solve_states`].
    pub fn relax_states<F>(
        &self,
        time: AxisSpec,
        config: Config,
        nstates: usize,
        seed: F,
    ) -> RelaxResult<Vec<Solution>>
    where F: FnMut(usize) -> nd::ArrayD<f64>
    {
        solve_states(self, time, config, nstates, seed)
    }
}

/// Solver configuration.
///
/// ```
/// use imtime::{ boundary::Boundary, solve::Config };
///
/// let config = Config::default()
///     .boundary(Boundary::Periodic)
///     .maxiters(Some(5000))
///     .epsilon(None);
/// assert!(config.boundary.is_periodic());
/// assert!(config.priors.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Config<'a> {
    /// Boundary conditions applied along every axis (default: Dirichlet).
    pub boundary: Boundary,
    /// Iteration cap, in addition to the length of the imaginary-time axis
    /// (default: none).
    pub maxiters: Option<usize>,
    /// Relative energy change below which the solver stops early; `None`
    /// disables early stopping (default: `1e-6`).
    pub epsilon: Option<f64>,
    /// Previously found states to project out at every step.
    pub priors: Vec<nd::ArrayViewD<'a, f64>>,
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            boundary: Boundary::default(),
            maxiters: None,
            epsilon: Some(DEF_EPSILON),
            priors: Vec::new(),
        }
    }
}

impl<'a> Config<'a> {
    /// Set the boundary conditions.
    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the iteration cap.
    pub fn maxiters(mut self, maxiters: Option<usize>) -> Self {
        self.maxiters = maxiters;
        self
    }

    /// Set the stopping tolerance.
    pub fn epsilon(mut self, epsilon: Option<f64>) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Add a prior state to project out.
    pub fn prior<S>(mut self, v: &'a ArrD<S>) -> Self
    where S: nd::Data<Elem = f64>
    {
        self.priors.push(v.view());
        self
    }

    /// Add several prior states to project out.
    pub fn priors<I, S>(mut self, vs: I) -> Self
    where
        I: IntoIterator<Item = &'a ArrD<S>>,
        S: nd::Data<Elem = f64> + 'a,
    {
        self.priors.extend(vs.into_iter().map(|v| v.view()));
        self
    }
}

/// Progress of a [`Solver`] after a call to [`Solver::step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// More iterations remain.
    Running,
    /// The solver has stopped; further calls to `step` do nothing.
    Stopped(Stop),
}

impl Status {
    /// Return `true` if `self` is `Running`.
    pub fn is_running(&self) -> bool { matches!(self, Self::Running) }

    /// Return `true` if `self` is `Stopped`.
    pub fn is_stopped(&self) -> bool { matches!(self, Self::Stopped(_)) }
}

/// Imaginary-time relaxation of a single wavefunction.
///
/// The solver borrows its [`System`] and prior states and owns everything
/// else: the evolving wavefunction, scratch space for the kinetic term, the
/// update coefficients, and the energy and norm histories.
#[derive(Clone, Debug)]
pub struct Solver<'a> {
    system: &'a System,
    boundary: Boundary,
    priors: Vec<nd::ArrayViewD<'a, f64>>,
    conv: Convergence,
    // time step
    dt: f64,
    // volume element
    dv: f64,
    // wavefunction
    q: nd::ArrayD<f64>,
    // kinetic term scratch
    T: nd::ArrayD<f64>,
    // update coefficients
    alpha: nd::ArrayD<f64>,
    beta: nd::ArrayD<f64>,
    energies: Vec<f64>,
    norms: Vec<f64>,
    stop: Option<Stop>,
}

impl<'a> Solver<'a> {
    /// Create a new solver and ingest the initial state `q0`.
    ///
    /// The imaginary-time axis `time` sets the time step (its `step`) and the
    /// maximum number of iterations (its point count).
    ///
    /// Fails if any axis has too few points for the boundary conditions, if
    /// `q0` or any prior state does not match the grid's shape, if a prior
    /// state has zero norm, or if `q0` has zero norm after projecting out the
    /// priors. Also fails if the potential and time step produce non-finite
    /// update coefficients.
    pub fn new(
        system: &'a System,
        time: AxisSpec,
        config: Config<'a>,
        q0: nd::ArrayD<f64>,
    ) -> RelaxResult<Self>
    {
        let Config { boundary, maxiters, epsilon, priors } = config;
        let grid = system.grid();
        let min = boundary.min_points();
        if let Some((axis, &got))
            = grid.shape().iter().enumerate().find(|(_, n)| **n < min)
        {
            return Err(RelaxError::TooFewPoints { axis, got, min });
        }
        let nt = time.npoints()?;
        let dt = time.step;
        let conv = Convergence::new(nt, maxiters, epsilon)?;
        let dv = grid.dv();
        for v in priors.iter() {
            ShapeError::check(grid.shape(), v)?;
            let norm = site_norm(v, boundary, dv);
            RelaxError::check_finite(norm, 0, "prior norm")?;
            if norm == 0.0 { return Err(RelaxError::ZeroNorm("prior state")); }
        }

        let V = system.get_V();
        let beta: nd::ArrayD<f64> = V.mapv(|v| (1.0 + 0.5 * dt * v).recip());
        let alpha: nd::ArrayD<f64>
            = nd::Zip::from(V).and(&beta)
            .map_collect(|&v, &b| (1.0 - 0.5 * dt * v) * b);
        if !alpha.iter().chain(beta.iter()).all(|c| c.is_finite()) {
            return Err(RelaxError::Numerical { step: 0, what: "update coefficient" });
        }

        let mut solver = Self {
            system,
            boundary,
            priors,
            conv,
            dt,
            dv,
            q: grid.zeros(),
            T: grid.zeros(),
            alpha,
            beta,
            energies: Vec::new(),
            norms: Vec::new(),
            stop: None,
        };
        solver.reset(q0)?;
        Ok(solver)
    }

    /// Replace the current wavefunction with a new initial state, clearing all
    /// history.
    ///
    /// The boundary conditions are enforced, prior states are projected out,
    /// and the result is normalized. On error the solver is left unchanged.
    ///
    /// Returns [`RelaxError::ZeroNorm`] if nothing remains of `q0` after
    /// projecting out the priors.
    pub fn reset(&mut self, q0: nd::ArrayD<f64>) -> RelaxResult<()> {
        ShapeError::check(self.system.grid().shape(), &q0)?;
        let mut q = q0;
        self.boundary.apply(&mut q);
        let norm0 = site_norm(&q, self.boundary, self.dv);
        RelaxError::check_finite(norm0, 0, "initial norm")?;
        if norm0 == 0.0 { return Err(RelaxError::ZeroNorm("initial state")); }
        deflate(&mut q, &self.priors, self.boundary, self.dv);
        let norm = site_norm(&q, self.boundary, self.dv);
        if norm <= SPAN_EPSILON * norm0 {
            return Err(RelaxError::ZeroNorm("initial state"));
        }
        rescale(&mut q, norm);
        self.q = q;
        self.energies.clear();
        self.norms.clear();
        self.stop = None;
        Ok(())
    }

    /// Perform a single iteration.
    ///
    /// Returns [`Status::Stopped`] on the final iteration and on every call
    /// thereafter. A non-finite energy or norm is returned as
    /// [`RelaxError::Numerical`], after which the state of the solver should
    /// not be relied upon.
    pub fn step(&mut self) -> RelaxResult<Status> {
        if let Some(stop) = self.stop { return Ok(Status::Stopped(stop)); }
        let k = self.energies.len();

        deflate(&mut self.q, &self.priors, self.boundary, self.dv);
        self.kinetic();
        let e = self.rayleigh();
        RelaxError::check_finite(e, k, "energy")?;
        self.energies.push(e);

        if let Some(stop) = self.conv.check(&self.energies) {
            self.stop = Some(stop);
            return Ok(Status::Stopped(stop));
        }

        let dt = self.dt;
        nd::Zip::from(&mut self.q)
            .and(&self.alpha)
            .and(&self.beta)
            .and(&self.T)
            .for_each(|qk, &ak, &bk, &tk| { *qk = ak * *qk + dt * bk * tk; });
        self.boundary.apply(&mut self.q);

        let norm = site_norm(&self.q, self.boundary, self.dv);
        if !(norm.is_finite() && norm > 0.0) {
            return Err(RelaxError::Numerical { step: k, what: "norm" });
        }
        rescale(&mut self.q, norm);
        self.norms.push(norm);
        Ok(Status::Running)
    }

    /// Iterate until the solver stops.
    pub fn run(&mut self) -> RelaxResult<Stop> { self.run_with(|_| Ok(())) }

    /// Iterate until the solver stops, calling `observer` after every
    /// iteration.
    ///
    /// Errors returned by `observer` abort the run.
    pub fn run_with<F>(&mut self, mut observer: F) -> RelaxResult<Stop>
    where F: FnMut(&Self) -> RelaxResult<()>
    {
        if let Some(stop) = self.stop { return Ok(stop); }
        loop {
            let status = self.step()?;
            observer(self)?;
            if let Status::Stopped(stop) = status {
                if stop.is_exhausted() && self.conv.epsilon().is_some() {
                    println!(
                        "solve::Solver::run: WARNING: energy convergence \
                        reached maxiters"
                    );
                }
                return Ok(stop);
            }
        }
    }

    /// Consume `self` to return the final state and its history.
    pub fn into_solution(self) -> Solution {
        Solution {
            e: self.energy(),
            wf: self.q,
            energies: self.energies,
            norms: self.norms,
            stop: self.stop.unwrap_or(Stop::Exhausted),
        }
    }

    /// Get a reference to the current wavefunction.
    pub fn get_q(&self) -> &nd::ArrayD<f64> { &self.q }

    /// Get a reference to the potential array.
    pub fn get_V(&self) -> &nd::ArrayD<f64> { self.system.get_V() }

    /// Get a reference to the coordinate grid.
    pub fn grid(&self) -> &Grid { self.system.grid() }

    /// Get the energy estimate at every completed iteration.
    pub fn energies(&self) -> &[f64] { &self.energies }

    /// Get the norm of the wavefunction after every non-final update, prior
    /// to rescaling.
    pub fn norms(&self) -> &[f64] { &self.norms }

    /// Get the most recent energy estimate, or `NaN` if no iterations have
    /// been performed.
    pub fn energy(&self) -> f64 {
        self.energies.last().copied().unwrap_or(f64::NAN)
    }

    /// Get the number of completed iterations.
    pub fn iters(&self) -> usize { self.energies.len() }

    /// Get the imaginary time step.
    pub fn dt(&self) -> f64 { self.dt }

    /// Get the volume element of the grid.
    pub fn dv(&self) -> f64 { self.dv }

    /// Get the maximum number of iterations.
    pub fn limit(&self) -> usize { self.conv.limit() }

    /// Get the boundary conditions.
    pub fn boundary(&self) -> Boundary { self.boundary }

    /// Get the reason the solver stopped, if it has.
    pub fn stop(&self) -> Option<Stop> { self.stop }

    // accumulate ∇²q / 2 into `self.T`
    fn kinetic(&mut self) {
        self.T.fill(0.0);
        let dx = self.system.grid().steps();
        for (k, &dxk) in dx.iter().enumerate() {
            kinetic_axis(&self.q, &mut self.T, nd::Axis(k), dxk, self.boundary);
        }
        if self.boundary.is_dirichlet() { zero_edges(&mut self.T); }
    }

    // energy expectation value of the current (possibly unnormalized) state
    fn rayleigh(&self) -> f64 {
        let b = self.boundary;
        let (vqq, tq, qq)
            = nd::Zip::from(b.sites(self.system.get_V()))
            .and(b.sites(&self.q))
            .and(b.sites(&self.T))
            .fold((0.0, 0.0, 0.0), |(vqq, tq, qq), &vk, &qk, &tk| {
                (vqq + vk * qk * qk, tq + tk * qk, qq + qk * qk)
            });
        (vqq - tq) / qq
    }
}

// norm over the distinct sites of `q`
fn site_norm<S>(q: &ArrD<S>, boundary: Boundary, dv: f64) -> f64
where S: nd::Data<Elem = f64>
{
    wf_norm(&boundary.sites(q), dv)
}

fn rescale(q: &mut nd::ArrayD<f64>, norm: f64) {
    let scale = norm.recip();
    q.mapv_inplace(|qk| qk * scale);
}

// q → q - (⟨v|q⟩ / ⟨v|v⟩) v for every prior v, then re-apply the boundary
// conditions, since priors need not satisfy them
fn deflate(
    q: &mut nd::ArrayD<f64>,
    priors: &[nd::ArrayViewD<f64>],
    boundary: Boundary,
    dv: f64,
) {
    if priors.is_empty() { return; }
    for v in priors.iter() {
        let vs = boundary.sites(v);
        let vv = wf_dot(&vs, &vs, dv);
        if vv <= 0.0 { continue; }
        let c = wf_dot(&vs, &boundary.sites(&*q), dv) / vv;
        q.scaled_add(-c, v);
    }
    boundary.apply(q);
}

// second-order central difference along one axis, divided by 2 δx²
//
// with periodic boundaries, the first and last points along the axis are the
// same physical point, and take the neighbors q[n - 2] and q[1]
fn kinetic_axis(
    q: &nd::ArrayD<f64>,
    T: &mut nd::ArrayD<f64>,
    ax: nd::Axis,
    dx: f64,
    boundary: Boundary,
) {
    let n = q.len_of(ax);
    let c = 2.0 * dx.powi(2);
    nd::Zip::from(T.slice_axis_mut(ax, nd::Slice::from(1..n - 1)))
        .and(q.slice_axis(ax, nd::Slice::from(0..n - 2)))
        .and(q.slice_axis(ax, nd::Slice::from(1..n - 1)))
        .and(q.slice_axis(ax, nd::Slice::from(2..n)))
        .for_each(|tk, &qm, &q0, &qp| { *tk += (qm + qp - 2.0 * q0) / c; });
    if boundary.is_periodic() {
        for i in [0, n - 1] {
            nd::Zip::from(T.index_axis_mut(ax, i))
                .and(q.index_axis(ax, n - 2))
                .and(q.index_axis(ax, i))
                .and(q.index_axis(ax, 1))
                .for_each(|tk, &qm, &q0, &qp| { *tk += (qm + qp - 2.0 * q0) / c; });
        }
    }
}

/// Successively relax the `nstates` lowest-lying states reachable from the
/// seeds produced by `seed`.
///
/// State `k` is relaxed from `seed(k)` with all states found before it (plus
/// any priors already in `config`) projected out. The potential is sampled
/// only once, in `system`.
pub fn solve_states<F>(
    system: &System,
    time: AxisSpec,
    config: Config,
    nstates: usize,
    mut seed: F,
) -> RelaxResult<Vec<Solution>>
where F: FnMut(usize) -> nd::ArrayD<f64>
{
    let mut found: Vec<Solution> = Vec::with_capacity(nstates);
    for k in 0..nstates {
        let sol = {
            let cfg = Config {
                boundary: config.boundary,
                maxiters: config.maxiters,
                epsilon: config.epsilon,
                priors: config.priors.iter()
                    .map(|v| v.view())
                    .chain(found.iter().map(|s| s.wf.view()))
                    .collect(),
            };
            let mut solver = Solver::new(system, time, cfg, seed(k))?;
            solver.run()?;
            solver.into_solution()
        };
        found.push(sol);
    }
    Ok(found)
}
