//! # Spatial window
//! Axis aligned box in non-dimensional coordinates and the
//! selection of all sample points inside of it.
use crate::error::{PodError, Result};
use ndarray::prelude::*;
use ndarray::Data;

/// Axis aligned box, one `[min, max]` pair per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    bounds: Vec<[f64; 2]>,
}

impl Window {
    /// Return new window
    ///
    /// # Errors
    /// Bounds are not finite, min >= max, or the number
    /// of axis is not 2 or 3.
    pub fn new(bounds: Vec<[f64; 2]>) -> Result<Self> {
        if bounds.len() != 2 && bounds.len() != 3 {
            return Err(PodError::config(format!(
                "window must have 2 or 3 axis, got {}",
                bounds.len()
            )));
        }
        for (i, [min, max]) in bounds.iter().enumerate() {
            if !min.is_finite() || !max.is_finite() {
                return Err(PodError::config(format!(
                    "bounds of x{} must be finite",
                    i + 1
                )));
            }
            if min >= max {
                return Err(PodError::config(format!(
                    "x{0}min must be smaller than x{0}max, got {1} and {2}",
                    i + 1,
                    min,
                    max
                )));
            }
        }
        Ok(Self { bounds })
    }

    /// Number of axis
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.bounds.len()
    }

    /// Bounds of all axis
    #[must_use]
    pub fn bounds(&self) -> &[[f64; 2]] {
        &self.bounds
    }

    /// True if point lies inside (bounds inclusive)
    pub fn contains<S: Data<Elem = f64>>(&self, point: &ArrayBase<S, Ix1>) -> bool {
        self.bounds
            .iter()
            .zip(point.iter())
            .all(|([min, max], x)| min <= x && x <= max)
    }
}

/// Ascending indices of the coordinate rows inside a [`Window`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSet {
    indices: Vec<usize>,
}

impl IndexSet {
    /// Indices, strictly ascending
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Number of points in window (nPts)
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True if no point lies inside the window
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Select rows of `data` which belong to the window
    pub fn select_rows<S: Data<Elem = f64>>(&self, data: &ArrayBase<S, Ix2>) -> Array2<f64> {
        data.select(Axis(0), &self.indices)
    }
}

/// Return indices of all rows in `coords` (points x ndim) which lie
/// inside `window`. The order is ascending, snapshot columns
/// are aligned to it.
///
/// # Errors
/// Dimension of coordinates and window differ.
///
/// # Example
/// ```
/// use ndarray::array;
/// use rustpod::window::{select_indices, Window};
/// let coords = array![[0., 0.], [0.5, 0.5], [2., 2.]];
/// let window = Window::new(vec![[0., 1.], [0., 1.]]).unwrap();
/// let index_set = select_indices(&coords, &window).unwrap();
/// assert_eq!(index_set.as_slice(), &[0, 1]);
/// assert_eq!(index_set.len(), 2);
/// ```
pub fn select_indices<S: Data<Elem = f64>>(
    coords: &ArrayBase<S, Ix2>,
    window: &Window,
) -> Result<IndexSet> {
    if coords.ncols() != window.ndim() {
        return Err(PodError::ShapeMismatch(format!(
            "coordinates have {} columns, window has {} axis",
            coords.ncols(),
            window.ndim()
        )));
    }
    let indices = coords
        .outer_iter()
        .enumerate()
        .filter(|(_, point)| window.contains(point))
        .map(|(i, _)| i)
        .collect();
    Ok(IndexSet { indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_indices_2d() {
        let coords = array![[0., 0.], [0.5, 0.5], [2., 2.]];
        let window = Window::new(vec![[0., 1.], [0., 1.]]).unwrap();
        let index_set = select_indices(&coords, &window).unwrap();
        assert_eq!(index_set.as_slice(), &[0, 1]);
        assert_eq!(index_set.len(), 2);
    }

    #[test]
    fn test_select_indices_inclusive_bounds() {
        let coords = array![[1., 0.], [1.0001, 0.], [0., 1.], [-0.1, 0.5]];
        let window = Window::new(vec![[0., 1.], [0., 1.]]).unwrap();
        let index_set = select_indices(&coords, &window).unwrap();
        assert_eq!(index_set.as_slice(), &[0, 2]);
    }

    #[test]
    fn test_select_indices_3d_ascending() {
        let n = 50;
        let mut coords = Array2::<f64>::zeros((n, 3));
        for (i, mut row) in coords.outer_iter_mut().enumerate() {
            let t = i as f64 / n as f64;
            row.assign(&array![t, 1. - t, (7. * t).sin()]);
        }
        let window = Window::new(vec![[0.2, 0.8], [0., 1.], [-0.5, 0.5]]).unwrap();
        let index_set = select_indices(&coords, &window).unwrap();
        assert!(!index_set.is_empty());
        assert!(index_set.as_slice().windows(2).all(|w| w[0] < w[1]));
        for &i in index_set.as_slice() {
            assert!(window.contains(&coords.row(i)));
        }
        let selected = index_set.select_rows(&coords);
        assert_eq!(selected.shape(), &[index_set.len(), 3]);
    }

    #[test]
    fn test_select_indices_dimension_mismatch() {
        let coords = array![[0., 0., 0.]];
        let window = Window::new(vec![[0., 1.], [0., 1.]]).unwrap();
        assert!(matches!(
            select_indices(&coords, &window),
            Err(PodError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        assert!(Window::new(vec![[1., 0.], [0., 1.]]).is_err());
        assert!(Window::new(vec![[0., 1.]]).is_err());
        assert!(Window::new(vec![[0., f64::NAN], [0., 1.]]).is_err());
    }
}
