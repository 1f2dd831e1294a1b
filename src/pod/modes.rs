//! Spatial modes
use super::Eigenbasis;
use crate::error::{PodError, Result};
use crate::snapshots::SnapshotSet;
use ndarray::prelude::*;
use ndarray::Data;

/// Squared joint norm below which a mode counts as degenerate,
/// relative to the largest squared norm
const DEGENERACY_TOL: f64 = 1e-12;

/// Spatial modes of all velocity components.
///
/// Component `i` is a matrix of shape (points, modes), column `j`
/// holds mode `j`, ordered by descending energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Modes {
    /// (components, points, modes)
    data: Array3<f64>,
}

impl Modes {
    /// Number of velocity components
    #[must_use]
    pub fn n_components(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of points
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.data.shape()[1]
    }

    /// Number of modes
    #[must_use]
    pub fn n_modes(&self) -> usize {
        self.data.shape()[2]
    }

    /// Mode matrix of component `i`
    ///
    /// # Panics
    /// `i` is out of range
    #[must_use]
    pub fn component(&self, i: usize) -> ArrayView2<f64> {
        self.data.index_axis(Axis(0), i)
    }

    /// Iterate over mode matrices of all components
    pub fn components(&self) -> impl Iterator<Item = ArrayView2<'_, f64>> {
        self.data.outer_iter()
    }

    /// Joint L2 norm of every mode, summed over all components
    #[must_use]
    pub fn norms(&self) -> Array1<f64> {
        self.data
            .mapv(|v| v * v)
            .sum_axis(Axis(0))
            .sum_axis(Axis(0))
            .mapv(f64::sqrt)
    }

    /// Keep the first `n_modes` modes
    ///
    /// # Errors
    /// Less than `n_modes` modes exist
    pub fn truncate(self, n_modes: usize) -> Result<Self> {
        if n_modes > self.n_modes() {
            return Err(PodError::ShapeMismatch(format!(
                "can not keep {} of {} modes",
                n_modes,
                self.n_modes()
            )));
        }
        Ok(Self {
            data: self.data.slice(s![.., .., ..n_modes]).to_owned(),
        })
    }

    /// Scale every mode to unit joint norm. All components of
    /// mode `j` share the same factor.
    ///
    /// # Errors
    /// A mode has (numerically) zero energy
    pub fn normalize(&mut self) -> Result<()> {
        let norms = self.norms();
        let max = norms.fold(0., |m: f64, &n| m.max(n));
        for (mode, &norm) in norms.iter().enumerate() {
            if !norm.is_finite() || norm <= 0. || norm * norm <= DEGENERACY_TOL * max * max {
                return Err(PodError::DegenerateMode { mode, norm });
            }
        }
        self.data /= &norms;
        Ok(())
    }
}

/// Project snapshot matrices onto the temporal eigenbasis,
/// `phi_i = X_i V`, without normalization.
///
/// # Errors
/// Rows of `vectors` do not match the number of snapshots
pub fn project<S: Data<Elem = f64>>(
    set: &SnapshotSet,
    vectors: &ArrayBase<S, Ix2>,
) -> Result<Modes> {
    if vectors.nrows() != set.n_snapshots() {
        return Err(PodError::ShapeMismatch(format!(
            "eigenbasis has {} rows, but there are {} snapshots",
            vectors.nrows(),
            set.n_snapshots()
        )));
    }
    let mut data = Array3::<f64>::zeros((set.n_components(), set.n_points(), vectors.ncols()));
    for (x, mut phi) in set.components().zip(data.outer_iter_mut()) {
        phi.assign(&x.dot(vectors));
    }
    Ok(Modes { data })
}

/// Reconstruct and normalize all spatial modes.
///
/// # Errors
/// Shapes do not match or a mode has zero energy
///
/// # Example
/// ```
/// use ndarray::array;
/// use rustpod::pod::{covariance, decompose, reconstruct_modes};
/// use rustpod::snapshots::SnapshotSet;
/// let u1 = array![[1., 0.], [0., 2.], [1., 1.]];
/// let u2 = array![[0., 1.], [1., 0.], [2., 1.]];
/// let set = SnapshotSet::from_components(&[u1, u2]).unwrap();
/// let basis = decompose(&covariance(&set)).unwrap();
/// let modes = reconstruct_modes(&set, &basis).unwrap();
/// for norm in modes.norms().iter() {
///     assert!((norm - 1.).abs() < 1e-10);
/// }
/// ```
pub fn reconstruct_modes(set: &SnapshotSet, basis: &Eigenbasis) -> Result<Modes> {
    let mut modes = project(set, &basis.vectors)?;
    modes.normalize()?;
    Ok(modes)
}

#[cfg(test)]
mod tests {
    use super::super::{covariance, decompose};
    use super::*;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    #[test]
    fn test_unit_joint_norm() {
        let components: Vec<Array2<f64>> = (0..3)
            .map(|_| Array2::random((25, 6), Uniform::new(-1., 1.)))
            .collect();
        let set = SnapshotSet::from_components(&components).unwrap();
        let basis = decompose(&covariance(&set)).unwrap();
        let modes = reconstruct_modes(&set, &basis).unwrap();
        assert_eq!(modes.n_components(), 3);
        assert_eq!(modes.component(0).shape(), &[25, 6]);
        for norm in modes.norms().iter() {
            assert!((norm * norm - 1.).abs() < 1e-6, "norm {}", norm);
        }
        // Modes are orthogonal in the joint inner product
        let mut gram = Array2::<f64>::zeros((6, 6));
        for phi in modes.components() {
            gram = gram + phi.t().dot(&phi);
        }
        for (i, v) in gram.indexed_iter() {
            let expected = if i.0 == i.1 { 1. } else { 0. };
            assert!((v - expected).abs() < 1e-8);
        }
    }

    #[test]
    fn test_shared_normalization_factor() {
        // Two snapshots, mode 0 spans both components
        let u1 = array![[3., 3.], [0., 0.]];
        let u2 = array![[4., 4.], [0., 0.]];
        let set = SnapshotSet::from_components(&[u1, u2]).unwrap();
        let mut modes = project(&set, &array![[1.], [0.]]).unwrap();
        modes.normalize().unwrap();
        assert!((modes.component(0)[[0, 0]] - 0.6).abs() < 1e-12);
        assert!((modes.component(1)[[0, 0]] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_mode() {
        // Identical snapshots, the second singular value is zero
        let u1 = array![[1., 1.], [2., 2.], [3., 3.]];
        let u2 = array![[0.5, 0.5], [-1., -1.], [0., 0.]];
        let set = SnapshotSet::from_components(&[u1, u2]).unwrap();
        let basis = decompose(&covariance(&set)).unwrap();
        assert!(basis.singular_values[1].abs() < 1e-12);
        match reconstruct_modes(&set, &basis) {
            Err(PodError::DegenerateMode { mode, .. }) => assert_eq!(mode, 1),
            other => panic!("expected DegenerateMode, got {:?}", other),
        }
        // The energetic mode alone is fine
        let mut modes = project(&set, &basis.vectors).unwrap().truncate(1).unwrap();
        modes.normalize().unwrap();
        assert!(modes.component(0).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_truncate() {
        let set = SnapshotSet::from_components(&[Array2::<f64>::ones((4, 3))]).unwrap();
        let modes = project(&set, &Array2::<f64>::eye(3)).unwrap();
        assert_eq!(modes.clone().truncate(2).unwrap().n_modes(), 2);
        assert!(modes.truncate(4).is_err());
    }

    #[test]
    fn test_project_shape_mismatch() {
        let set = SnapshotSet::from_components(&[Array2::<f64>::ones((4, 3))]).unwrap();
        assert!(project(&set, &Array2::<f64>::eye(2)).is_err());
    }
}
