//! # Proper orthogonal decomposition
//!
//! Snapshot method: the covariance
//! ```text
//! C = sum_i X_i^T X_i / N
//! ```
//! of the snapshot matrices `X_i` (one per velocity component) is
//! decomposed by a singular value decomposition. Its singular vectors
//! are the temporal coefficients of the modes, the singular values
//! their energy.
pub mod modes;
use crate::error::{PodError, Result};
use crate::snapshots::SnapshotSet;
use crate::utils::argsort_descending;
pub use modes::{project, reconstruct_modes, Modes};
use ndarray::linalg::general_mat_mul;
use ndarray::prelude::*;
use ndarray_linalg::SVD;

/// Temporal eigenbasis and energy spectrum
#[derive(Debug, Clone)]
pub struct Eigenbasis {
    /// Orthonormal singular vectors (snapshots x snapshots), one per column
    pub vectors: Array2<f64>,
    /// Singular values, descending
    pub singular_values: Array1<f64>,
}

/// Return snapshot covariance matrix (snapshots x snapshots)
///
/// # Example
/// ```
/// use ndarray::array;
/// use rustpod::pod::covariance;
/// use rustpod::snapshots::SnapshotSet;
/// let u1 = array![[1., 0.], [0., 2.]];
/// let u2 = array![[1., 1.], [0., 0.]];
/// let set = SnapshotSet::from_components(&[u1, u2]).unwrap();
/// let c = covariance(&set);
/// assert_eq!(c, array![[1., 0.5], [0.5, 2.5]]);
/// ```
#[must_use]
pub fn covariance(set: &SnapshotSet) -> Array2<f64> {
    let n = set.n_snapshots();
    let mut c = Array2::<f64>::zeros((n, n));
    for x in set.components() {
        general_mat_mul(1.0, &x.t(), &x, 1.0, &mut c);
    }
    c.mapv_inplace(|v| v / n as f64);
    c
}

/// Singular value decomposition of the covariance matrix.
///
/// Columns of the returned basis are sorted by descending
/// singular value. No truncation takes place.
///
/// # Errors
/// Matrix is not square or lapack fails
pub fn decompose(c: &Array2<f64>) -> Result<Eigenbasis> {
    if !c.is_square() || c.is_empty() {
        return Err(PodError::ShapeMismatch(format!(
            "covariance must be square and not empty, got {:?}",
            c.shape()
        )));
    }
    let (u, s, _) = c.svd(true, false)?;
    let u = u.ok_or(PodError::MissingSingularVectors)?;

    // Lapack sorts already, but this is not part of its contract
    let permut = argsort_descending(&s.to_vec());
    Ok(Eigenbasis {
        vectors: u.select(Axis(1), &permut),
        singular_values: s.select(Axis(0), &permut),
    })
}

/// Share of each mode in the total energy, in percent.
///
/// With `skip_mean` the first mode, which holds the mean flow
/// for snapshots with non-zero mean, is left out of the
/// distribution.
///
/// # Errors
/// Spectrum is empty or holds no energy
///
/// # Example
/// ```
/// use ndarray::array;
/// use rustpod::pod::energy_percent;
/// let s = array![10., 3., 1.];
/// assert_eq!(energy_percent(&s, true).unwrap(), array![75., 25.]);
/// ```
pub fn energy_percent(singular_values: &Array1<f64>, skip_mean: bool) -> Result<Array1<f64>> {
    let start = usize::from(skip_mean);
    if singular_values.len() <= start {
        return Err(PodError::ShapeMismatch(format!(
            "spectrum of length {} has no mode to evaluate",
            singular_values.len()
        )));
    }
    let s = singular_values.slice(s![start..]);
    let total = s.sum();
    if !(total > 0.) {
        return Err(PodError::DegenerateMode {
            mode: start,
            norm: total,
        });
    }
    Ok(s.mapv(|v| v * 100. / total))
}

/// Cumulative energy in percent, see [`energy_percent`]
///
/// # Errors
/// Spectrum is empty or holds no energy
pub fn cumulative_energy(singular_values: &Array1<f64>, skip_mean: bool) -> Result<Array1<f64>> {
    let mut energy = energy_percent(singular_values, skip_mean)?;
    energy.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev);
    Ok(energy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    fn approx_eq<S, D>(result: &ArrayBase<S, D>, expected: &ArrayBase<S, D>)
    where
        S: ndarray::Data<Elem = f64>,
        D: Dimension,
    {
        let dif = 1e-8;
        for (a, b) in expected.iter().zip(result.iter()) {
            if (a - b).abs() > dif {
                panic!("Large difference of values, got {} expected {}.", b, a)
            }
        }
    }

    fn random_set(n_points: usize, n_snaps: usize, n_comp: usize) -> SnapshotSet {
        let components: Vec<Array2<f64>> = (0..n_comp)
            .map(|_| Array2::random((n_points, n_snaps), Uniform::new(-1., 1.)))
            .collect();
        SnapshotSet::from_components(&components).unwrap()
    }

    #[test]
    fn test_covariance_symmetric() {
        let set = random_set(40, 8, 3);
        let c = covariance(&set);
        assert_eq!(c.shape(), &[8, 8]);
        approx_eq(&c, &c.t().to_owned());
        // Sum over components of X^T X / N
        let mut expected = Array2::<f64>::zeros((8, 8));
        for x in set.components() {
            expected = expected + x.t().dot(&x);
        }
        approx_eq(&c, &(expected / 8.));
    }

    #[test]
    fn test_decompose_spectrum_and_orthonormality() {
        let set = random_set(30, 10, 2);
        let c = covariance(&set);
        let basis = decompose(&c).unwrap();
        let s = &basis.singular_values;
        assert_eq!(s.len(), 10);
        assert!(s.iter().all(|&v| v >= 0.));
        assert!(s.windows(2).into_iter().all(|w| w[0] >= w[1]));
        let v = &basis.vectors;
        approx_eq(&v.t().dot(v), &Array2::<f64>::eye(10));
        // C v_j = s_j v_j
        approx_eq(&c.dot(v), &(v * s));
    }

    #[test]
    fn test_decompose_rejects_non_square() {
        let c = Array2::<f64>::zeros((3, 2));
        assert!(matches!(decompose(&c), Err(PodError::ShapeMismatch(_))));
    }

    #[test]
    fn test_cumulative_energy() {
        let s = array![5., 2., 1., 1.];
        let expected = array![500. / 9., 700. / 9., 800. / 9., 100.];
        approx_eq(&cumulative_energy(&s, false).unwrap(), &expected);
        assert!(energy_percent(&array![1.], true).is_err());
        assert!(energy_percent(&array![1., 0.], true).is_err());
    }
}
