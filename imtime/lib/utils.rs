//! Miscellaneous tools.
//!
//! All integrals over a grid are computed as plain sums weighted by the volume
//! element `dv`, i.e. the product of the grid spacings along every axis.

use ndarray::{ self as nd, Dimension };
use num_traits::Float;
use rand::{ prelude as rnd, Rng };
use crate::{ ArrD, grid::Grid };

/// Calculate the norm `√(Σ q² dv)` of a wavefunction.
pub fn wf_norm<S, A>(q: &ArrD<S>, dv: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    (q.iter().fold(A::zero(), |acc, qk| acc + (*qk).powi(2)) * dv).sqrt()
}

/// Calculate the inner product `Σ q p dv` of two wavefunctions.
///
/// *Panics if the arrays have different shapes*.
pub fn wf_dot<S, T, A>(q: &ArrD<S>, p: &ArrD<T>, dv: A) -> A
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Float,
{
    nd::Zip::from(q).and(p)
        .fold(A::zero(), |acc, qk, pk| acc + *qk * *pk) * dv
}

/// Return a normalized copy of a wavefunction.
pub fn wf_normalized<S, A>(q: &ArrD<S>, dv: A) -> nd::ArrayD<A>
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    let norm = wf_norm(q, dv);
    q.mapv(|qk| qk / norm)
}

/// Generate a radially symmetric Gaussian seed state,
/// ```text
/// q(x) = exp(-|x - c|² / (2 w²))
/// ```
/// normalized over the grid.
///
/// *Panics if `center` is shorter than the number of grid dimensions*.
pub fn gaussian(grid: &Grid, center: &[f64], width: f64) -> nd::ArrayD<f64> {
    let mut x: Vec<f64> = vec![0.0; grid.ndim()];
    let q: nd::ArrayD<f64>
        = nd::ArrayD::from_shape_fn(nd::IxDyn(grid.shape()), |idx| {
            grid.point_into(idx.slice(), &mut x);
            let r2: f64
                = x.iter().zip(center)
                .map(|(xk, ck)| (xk - ck).powi(2))
                .sum();
            (-r2 / (2.0 * width.powi(2))).exp()
        });
    wf_normalized(&q, grid.dv())
}

/// Add uniformly distributed noise in `[-amplitude, +amplitude)` to every
/// element of a wavefunction.
pub fn add_noise<S, R>(q: &mut ArrD<S>, amplitude: f64, rng: &mut R)
where
    S: nd::DataMut<Elem = f64>,
    R: Rng,
{
    if amplitude <= 0.0 { return; }
    q.map_inplace(|qk| { *qk += rng.gen_range(-amplitude..amplitude); });
}

/// Like [`add_noise`], but use a thread-local random number generator.
pub fn add_noise_thread<S>(q: &mut ArrD<S>, amplitude: f64)
where S: nd::DataMut<Elem = f64>
{
    let mut rng = rnd::thread_rng();
    add_noise(q, amplitude, &mut rng);
}
