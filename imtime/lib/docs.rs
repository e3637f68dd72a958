//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Discretization](#discretization)
//! - [Energy estimate and convergence](#energy-estimate-and-convergence)
//! - [Excited states](#excited-states)
//! - [Boundary conditions](#boundary-conditions)
//!
//! # Background
//! Stationary states of a quantum system are eigenpairs of the Hamiltonian
//! operator,
//! ```text
//! H ψ = E ψ
//! ```
//! The time-dependent Schrödinger equation `i ∂ψ/∂t = H ψ` evolves each
//! eigenstate *ψ*<sub>*n*</sub> by a pure phase, exp(-*i* *E*<sub>*n*</sub>
//! *t*). Under the substitution *t* → -*i* *τ* ("Wick rotation" to imaginary
//! time), the equation becomes a diffusion equation,
//! ```text
//! ∂ψ
//! -- = -H ψ
//! ∂τ
//! ```
//! and the phases become real exponential factors exp(-*E*<sub>*n*</sub>
//! *τ*). Expanding an arbitrary initial state in the eigenbasis,
//! ```text
//! ψ(τ) = Σ_n c_n exp(-E_n τ) ψ_n
//! ```
//! shows that every component decays, but the component with the lowest energy
//! decays slowest. After renormalizing, ψ(*τ*) therefore tends to the ground
//! state as *τ* → ∞, provided the initial state has nonzero overlap with it.
//! The rate of convergence is set by the gap between the two lowest energies
//! with nonzero overlap: the unwanted components shrink relative to the ground
//! state as exp(-(*E*<sub>1</sub> - *E*<sub>0</sub>) *τ*).
//!
//! # Units
//! All solvers in this crate work in units where *ħ* = *m* = 1, so that the
//! Hamiltonian reads
//! ```text
//!       1
//! H = - - ∇² + V(x)
//!       2
//! ```
//! For a particle of mass *m* and a chosen length scale *a*, lengths are then
//! measured in units of *a*, energies in units of *ħ*²/*m* *a*², and
//! imaginary times in units of *m* *a*²/*ħ*. For example, the ground state of
//! a one-dimensional infinite square well of width 1 has energy *π*²/2 and the
//! ground state of a harmonic trap of frequency *ω* has energy *ω*/2.
//!
//! # Discretization
//! Wavefunctions are sampled on a regular rectilinear grid with spacing
//! *δx*<sub>*k*</sub> along axis *k*. The Laplacian is approximated by the
//! three-point central difference along each axis,
//! ```text
//!          q[.., i - 1, ..] - 2 q[.., i, ..] + q[.., i + 1, ..]
//! ∂²q/∂x² ≈ ----------------------------------------------------
//!                                  δx²
//! ```
//! which has an *O*(*δx*²) error term. Writing *T* = ∇²*q*/2 for the
//! (negated) kinetic term, the imaginary-time equation is `∂q/∂τ = T - V q`.
//!
//! This is integrated with a semi-implicit Euler scheme: the kinetic term is
//! taken explicitly while the potential term is averaged over the old and new
//! values,
//! ```text
//! q' - q              V
//! ------ = T - - (q + q')
//!   δτ              2
//! ```
//! which, solved for *q'*, gives the update
//! ```text
//! q' = α q + δτ β T
//!
//!            1                    δτ V
//! β = ------------ ,     α = (1 - ----) β
//!     1 + δτ V / 2                 2
//! ```
//! The coefficients *α* and *β* depend only on the potential and the time step
//! and are computed once per solver. Treating the potential implicitly removes
//! any stability constraint from large positive values of *V*; the explicit
//! kinetic term still requires roughly *δτ* ≲ *δx*<sup>2</sup>/*d* for *d*
//! spatial dimensions, and `δτ = δx² / 5` is a comfortable choice. Note that
//! if *δτ* *V* = -2 anywhere, *β* is singular and the solver will refuse to
//! start.
//!
//! Because imaginary-time evolution is not unitary, the wavefunction is
//! renormalized after every step,
//! ```text
//! q → q / √(Σ q² δV)
//! ```
//! where *δV* is the product of the grid spacings. The norm prior to
//! rescaling is recorded; in the long-time limit it approaches
//! exp(-*E*<sub>0</sub> *δτ*).
//!
//! # Energy estimate and convergence
//! At each step the energy is estimated by the Rayleigh quotient,
//! ```text
//!     ⟨q|H|q⟩   Σ V q² - Σ T q
//! E = ------- = --------------
//!      ⟨q|q⟩        Σ q²
//! ```
//! using the same discrete kinetic term as the update, so that *E* is exactly
//! the energy of the current wavefunction under the discrete Hamiltonian. For
//! small enough *δτ* this estimate decreases monotonically toward the lowest
//! discrete eigenvalue still present in *q*.
//!
//! The solver stops when the relative change between successive estimates,
//! ```text
//! |1 - E[n - 1] / E[n]|
//! ```
//! falls below a tolerance *ε*, or when it runs out of iterations. The
//! relative change is undefined for *E* = 0, in which case only the iteration
//! limit applies.
//!
//! # Excited states
//! To find the *n*-th excited state, the relaxation is repeated while keeping
//! the evolving wavefunction orthogonal to the *n* states already found
//! ("deflation"). At every step, before anything else, each prior state *v* is
//! projected out:
//! ```text
//!         ⟨v|q⟩
//! q → q - ----- v
//!         ⟨v|v⟩
//! ```
//! With this constraint in place the lowest surviving component of *q* is the
//! next state up, to which the relaxation then converges. Errors in the prior
//! states propagate into later ones, so it pays to converge each state
//! tightly before using it as a prior.
//!
//! Degenerate levels need no special treatment: each member of a degenerate
//! subspace is found in turn, although which basis of the subspace is produced
//! depends on the initial states.
//!
//! # Boundary conditions
//! Two kinds of boundary are supported, applied along every axis at once.
//!
//! *Dirichlet* boundaries hold the wavefunction at zero on the outermost grid
//! points, describing a particle confined to the grid by infinite walls. The
//! kinetic term is never evaluated on these points.
//!
//! *Periodic* boundaries identify the last grid point along each axis with the
//! first, so that an axis of *N* points describes *N* - 1 distinct sites on a
//! ring of length `(N - 1) δx`. The kinetic term at the seam uses the
//! neighbors across the seam. After every update, the last point is
//! extrapolated from the first three interior points on the opposite edge,
//! with the last two interior points as wrap-around corrections,
//! ```text
//!     10 q[1] - 5 q[2] + q[3] + 5 q[N - 2] - q[N - 3]
//! s = -----------------------------------------------
//!                          10
//! ```
//! and the result is copied to `q[0]`. The weights are those of the quartic
//! through `q[N - 3]`, `q[N - 2]`, `q[1]`, `q[2]`, `q[3]`, evaluated at the
//! seam, and the formula requires at least seven points along each periodic
//! axis.
//!
//! Norms, inner products, and the energy estimate are summed over the
//! *N* - 1 distinct sites only, so that the seam is not counted twice.
