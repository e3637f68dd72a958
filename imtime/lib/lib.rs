#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for automated computation of
//! stationary states of the time-independent Schrödinger equation in one to
//! three spatial dimensions via relaxation in imaginary time.
//!
//! Wavefunctions are propagated on a regular rectilinear grid with a
//! semi-implicit finite-difference (FDTD) scheme until the energy estimate
//! stops changing. Excited states are found by repeating the relaxation while
//! projecting out ("deflating") previously converged states.
//!
//! ```
//! use imtime::{ grid::AxisSpec, potential, solve::{ Config, Solver, System } };
//!
//! // 1D infinite square well of width 1
//! let space = [AxisSpec::new(0.0, 1.0, 0.02)];
//! let system = System::new(&space, &potential::Zero).unwrap();
//! let dt = 0.2 * 0.02_f64.powi(2);
//! let time = AxisSpec::new(0.0, 20000.0 * dt, dt);
//! let q0 = imtime::utils::gaussian(system.grid(), &[0.5], 0.2);
//! let mut solver = Solver::new(&system, time, Config::default(), q0).unwrap();
//! solver.run().unwrap();
//! let expected = std::f64::consts::PI.powi(2) / 2.0;
//! assert!((solver.energy() - expected).abs() / expected < 1e-2);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod grid;
pub mod boundary;
pub mod potential;
pub mod monitor;
pub mod solve;
pub mod snapshot;
pub mod utils;

pub mod docs;

pub(crate) const DEF_EPSILON: f64 = 1e-6;

pub type ArrD<S> = ndarray::ArrayBase<S, ndarray::IxDyn>;
