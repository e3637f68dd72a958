//! Boundary conditions applied uniformly to every axis of a grid.

use ndarray as nd;
use crate::ArrD;

/// Boundary condition selector.
///
/// The same condition is applied along every axis and is fixed for the
/// lifetime of a solver.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Boundary {
    /// Hard walls: the wavefunction vanishes at the first and last point along
    /// every axis.
    #[default]
    Dirichlet,
    /// Periodic wrapping: the last point along every axis is the image of the
    /// first, so that the period of axis `k` is `(n_k - 1) δx_k`.
    ///
    /// The last point is extrapolated after every update from the first three
    /// interior points on the opposite edge, corrected by the last two
    /// interior points,
    /// ```text
    /// q[n - 1] = (10 q[1] - 5 q[2] + q[3] + 5 q[n - 2] - q[n - 3]) / 10
    /// ```
    /// and copied to the first point.
    Periodic,
}

impl Boundary {
    /// Return `true` if `self` is `Dirichlet`.
    pub fn is_dirichlet(&self) -> bool { matches!(self, Self::Dirichlet) }

    /// Return `true` if `self` is `Periodic`.
    pub fn is_periodic(&self) -> bool { matches!(self, Self::Periodic) }

    /// Minimum number of points along each axis needed for the condition to
    /// leave at least one independent point and, in the periodic case, five
    /// distinct sites around the seam.
    pub fn min_points(&self) -> usize {
        match self {
            Self::Dirichlet => 3,
            Self::Periodic => 7,
        }
    }

    /// Return a view of the distinct lattice sites of a field.
    ///
    /// With periodic boundaries the last point along every axis is dropped,
    /// since it is the image of the first; sums over the returned view count
    /// every site exactly once. Dirichlet fields are returned whole.
    pub fn sites<'a, S>(&self, q: &'a ArrD<S>) -> nd::ArrayViewD<'a, f64>
    where S: nd::Data<Elem = f64>
    {
        let mut view = q.view();
        if self.is_periodic() {
            for k in 0..view.ndim() {
                let ax = nd::Axis(k);
                let n = view.len_of(ax);
                view.slice_axis_inplace(ax, nd::Slice::from(0..n - 1));
            }
        }
        view
    }

    /// Apply the boundary condition to a field in place.
    ///
    /// *Panics if any axis is shorter than [`Self::min_points`]*.
    pub fn apply<S>(&self, q: &mut ArrD<S>)
    where S: nd::DataMut<Elem = f64>
    {
        match self {
            Self::Dirichlet => zero_edges(q),
            Self::Periodic => {
                (0..q.ndim()).for_each(|k| rebuild_seam(q, nd::Axis(k)));
            },
        }
    }
}

/// Set all values on the outer faces of a field to zero.
pub fn zero_edges<S>(q: &mut ArrD<S>)
where S: nd::DataMut<Elem = f64>
{
    for k in 0..q.ndim() {
        let ax = nd::Axis(k);
        let n = q.len_of(ax);
        q.index_axis_mut(ax, 0).fill(0.0);
        q.index_axis_mut(ax, n - 1).fill(0.0);
    }
}

/// Extrapolate the last point along a periodic axis from the first three
/// interior points `q[1..4]` and the last two interior points
/// `q[n - 3..n - 1]`.
///
/// The formula is exact for polynomials up to fourth degree across the seam.
pub fn seam_value(q1: f64, q2: f64, q3: f64, qnm2: f64, qnm3: f64) -> f64 {
    (10.0 * q1 - 5.0 * q2 + q3 + 5.0 * qnm2 - qnm3) / 10.0
}

// extrapolate the last index along `ax` and copy it to the first
fn rebuild_seam<S>(q: &mut ArrD<S>, ax: nd::Axis)
where S: nd::DataMut<Elem = f64>
{
    let n = q.len_of(ax);
    let seam: nd::ArrayD<f64>
        = nd::Zip::from(q.index_axis(ax, 1))
        .and(q.index_axis(ax, 2))
        .and(q.index_axis(ax, 3))
        .and(q.index_axis(ax, n - 2))
        .and(q.index_axis(ax, n - 3))
        .map_collect(|&q1, &q2, &q3, &qnm2, &qnm3| {
            seam_value(q1, q2, q3, qnm2, qnm3)
        });
    q.index_axis_mut(ax, 0).assign(&seam);
    q.index_axis_mut(ax, n - 1).assign(&seam);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirichlet_zeroes_faces() {
        let mut q: nd::ArrayD<f64> = nd::ArrayD::ones(nd::IxDyn(&[4, 5]));
        Boundary::Dirichlet.apply(&mut q);
        for ((i, j), qij) in q.indexed_iter().map(|(ij, v)| ((ij[0], ij[1]), *v)) {
            let edge = i == 0 || i == 3 || j == 0 || j == 4;
            assert_eq!(qij, if edge { 0.0 } else { 1.0 });
        }
    }

    #[test]
    fn periodic_seam_exact_for_quartics() {
        // the seam sits at s = 0; points past it are images at s - (n - 1)
        let n = 9;
        let f = |s: f64| {
            1.0 + 0.5 * s - 0.25 * s.powi(2) + 0.1 * s.powi(3) - 0.02 * s.powi(4)
        };
        let mut q: nd::ArrayD<f64>
            = nd::ArrayD::from_shape_fn(nd::IxDyn(&[n]), |idx| {
                let i = idx[0];
                if i > n / 2 { f(i as f64 - (n - 1) as f64) } else { f(i as f64) }
            });
        q[[0]] = -100.0;
        q[[n - 1]] = 100.0;
        Boundary::Periodic.apply(&mut q);
        assert!((q[[n - 1]] - f(0.0)).abs() < 1e-12);
        assert_eq!(q[[0]], q[[n - 1]]);
    }

    #[test]
    fn periodic_seam_2d() {
        let (n0, n1) = (7, 8);
        let mut q: nd::ArrayD<f64>
            = nd::ArrayD::from_shape_fn(nd::IxDyn(&[n0, n1]), |idx| {
                ((idx[0] * n1 + idx[1]) as f64).sin()
            });
        Boundary::Periodic.apply(&mut q);
        for i in 0..n0 {
            let row = q.index_axis(nd::Axis(0), i);
            let expected
                = seam_value(row[[1]], row[[2]], row[[3]], row[[n1 - 2]], row[[n1 - 3]]);
            assert!((row[[n1 - 1]] - expected).abs() < 1e-12);
            assert_eq!(row[[0]], row[[n1 - 1]]);
        }
        for j in 0..n1 {
            let col = q.index_axis(nd::Axis(1), j);
            assert_eq!(col[[0]], col[[n0 - 1]]);
        }
    }

    #[test]
    fn periodic_sites_drop_images() {
        let q: nd::ArrayD<f64> = nd::ArrayD::ones(nd::IxDyn(&[7, 9]));
        assert_eq!(Boundary::Periodic.sites(&q).shape(), &[6, 8]);
        assert_eq!(Boundary::Dirichlet.sites(&q).shape(), &[7, 9]);
    }
}
