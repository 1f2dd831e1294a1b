//! Collection of usefull helper methods
use std::cmp::Ordering;

/// Argsort slice ( smallest -> largest ).
/// Returns permutation vector. NaN's are sorted last.
///
/// ```
/// use rustpod::utils::argsort;
/// use ndarray::{array, Axis};
/// let vec = array![3., 1., 2., 9., 7.];
/// let permut: Vec<usize> = argsort(vec.as_slice().unwrap());
/// let vec = vec.select(Axis(0), &permut);
/// assert_eq!(vec, array![1.0, 2.0, 3.0, 7.0, 9.0]);
/// ```
#[must_use]
pub fn argsort(vec: &[f64]) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..vec.len()).collect();
    perm.sort_by(|i, j| compare(vec[*i], vec[*j]));
    perm
}

/// Argsort slice ( largest -> smallest ).
///
/// Stable, equal values keep their order.
#[must_use]
pub fn argsort_descending(vec: &[f64]) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..vec.len()).collect();
    perm.sort_by(|i, j| compare(vec[*j], vec[*i]));
    perm
}

fn compare(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
