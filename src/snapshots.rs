//! # Snapshot matrices
//! Velocity snapshots of all components, restricted to the
//! snapshot window.
use crate::context::{ExecutionContext, Progress};
use crate::error::{PodError, Result};
use crate::reader::FieldReader;
use crate::time_dirs::TimeDir;
use crate::window::IndexSet;
use ndarray::parallel::prelude::*;
use ndarray::prelude::*;

/// Snapshot matrices of all velocity components.
///
/// Component `i` is a matrix of shape (points, snapshots),
/// column `j` holds snapshot `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSet {
    /// (components, points, snapshots)
    data: Array3<f64>,
}

impl SnapshotSet {
    /// Return set from per component matrices (points x snapshots)
    ///
    /// # Errors
    /// No component given or shapes differ
    pub fn from_components(components: &[Array2<f64>]) -> Result<Self> {
        let views: Vec<ArrayView2<f64>> = components.iter().map(|c| c.view()).collect();
        let data = ndarray::stack(Axis(0), &views)
            .map_err(|e| PodError::ShapeMismatch(format!("snapshot components: {}", e)))?;
        Ok(Self { data })
    }

    /// Number of velocity components
    #[must_use]
    pub fn n_components(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of points in the window
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.data.shape()[1]
    }

    /// Number of snapshots
    #[must_use]
    pub fn n_snapshots(&self) -> usize {
        self.data.shape()[2]
    }

    /// Snapshot matrix of component `i`
    ///
    /// # Panics
    /// `i` is out of range
    #[must_use]
    pub fn component(&self, i: usize) -> ArrayView2<f64> {
        self.data.index_axis(Axis(0), i)
    }

    /// Iterate over snapshot matrices of all components
    pub fn components(&self) -> impl Iterator<Item = ArrayView2<'_, f64>> {
        self.data.outer_iter()
    }
}

/// Read all snapshots and assemble the snapshot matrices.
///
/// Each time directory fills one column. With a parallel context
/// the snapshots are read on a worker pool, columns are disjoint.
///
/// # Errors
/// - A velocity file is missing or can not be parsed
/// - A velocity file has not `n_points_total` rows
/// - The run was interrupted
pub fn assemble<R: FieldReader + Sync>(
    reader: &R,
    time_dirs: &[TimeDir],
    index_set: &IndexSet,
    n_points_total: usize,
    ctx: &ExecutionContext,
    progress: &dyn Progress,
) -> Result<SnapshotSet> {
    let n_comp = reader.n_components();
    let mut data = Array3::<f64>::zeros((n_comp, index_set.len(), time_dirs.len()));

    let fill = |mut column: ArrayViewMut2<f64>, time: &TimeDir| -> Result<()> {
        ctx.check_interrupt()?;
        let velocity = reader.read_velocity(time)?;
        if velocity.nrows() != n_points_total || velocity.ncols() != n_comp {
            return Err(PodError::ShapeMismatch(format!(
                "velocity of time {} has shape {:?}, expected [{}, {}]",
                time.name,
                velocity.shape(),
                n_points_total,
                n_comp
            )));
        }
        column.assign(&index_set.select_rows(&velocity).t());
        progress.advance(time);
        Ok(())
    };

    progress.start(time_dirs.len());
    if ctx.parallel {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ctx.threads.unwrap_or(0))
            .build()?;
        pool.install(|| {
            data.axis_iter_mut(Axis(2))
                .into_par_iter()
                .zip(time_dirs.par_iter())
                .try_for_each(|(column, time)| fill(column, time))
        })?;
    } else {
        for (column, time) in data.axis_iter_mut(Axis(2)).zip(time_dirs) {
            fill(column, time)?;
        }
    }
    progress.finish();

    Ok(SnapshotSet { data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NoProgress;
    use crate::reader::{Reader, SurfaceReader};
    use crate::window::{select_indices, Window};
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::Ordering;

    /// Surface case with velocity u = (t + x, t * x) at points x = 0, 1, .., 4
    fn surface_case(times: &[f64]) -> (tempfile::TempDir, Vec<TimeDir>) {
        let case = tempfile::tempdir().unwrap();
        let root = case.path().join("postProcessing").join("cuttingPlane");
        let mut dirs = vec![];
        for t in times {
            let name = format!("{}", t);
            let patch = root.join(&name).join("plane");
            fs::create_dir_all(patch.join("vectorField")).unwrap();
            let mut points = String::from("5\n(\n");
            let mut u = String::from("5\n(\n");
            for i in 0..5 {
                let x = i as f64;
                points += &format!("({} 0 0)\n", x);
                u += &format!("({} {} 0)\n", t + x, t * x);
            }
            points += ")\n";
            u += ")\n";
            fs::write(patch.join("points"), points).unwrap();
            fs::write(patch.join("vectorField").join("U"), u).unwrap();
            dirs.push(TimeDir {
                name: name.clone(),
                time: *t,
                path: root.join(&name),
            });
        }
        (case, dirs)
    }

    fn reader(case: &Path) -> Reader {
        Reader::Surface(SurfaceReader::new(case, "plane", vec![0, 1], "points"))
    }

    #[test]
    fn test_assemble_shape_and_columns() {
        let times = [1., 2., 3.];
        let (case, dirs) = surface_case(&times);
        let reader = reader(case.path());
        let coords = reader.read_coordinates(&dirs[0]).unwrap();
        let window = Window::new(vec![[1., 3.], [-1., 1.]]).unwrap();
        let index_set = select_indices(&coords, &window).unwrap();
        assert_eq!(index_set.as_slice(), &[1, 2, 3]);

        for ctx in [
            ExecutionContext::new(case.path()).with_threads(2),
            ExecutionContext::new(case.path()).serial(),
        ] {
            let set = assemble(&reader, &dirs, &index_set, 5, &ctx, &NoProgress).unwrap();
            assert_eq!(set.n_components(), 2);
            assert_eq!(set.component(0).shape(), &[3, 3]);
            // column j belongs to time j, row k to point index_set[k]
            for (j, t) in times.iter().enumerate() {
                for (k, &i) in index_set.as_slice().iter().enumerate() {
                    let x = i as f64;
                    assert_eq!(set.component(0)[[k, j]], t + x);
                    assert_eq!(set.component(1)[[k, j]], t * x);
                }
            }
        }
    }

    #[test]
    fn test_missing_snapshot_is_fatal() {
        let (case, mut dirs) = surface_case(&[1., 2.]);
        let reader = reader(case.path());
        let coords = reader.read_coordinates(&dirs[0]).unwrap();
        let window = Window::new(vec![[0., 4.], [-1., 1.]]).unwrap();
        let index_set = select_indices(&coords, &window).unwrap();
        dirs.push(TimeDir {
            name: "3".to_string(),
            time: 3.,
            path: reader.snapshot_root().join("3"),
        });
        let ctx = ExecutionContext::new(case.path());
        assert!(matches!(
            assemble(&reader, &dirs, &index_set, 5, &ctx, &NoProgress),
            Err(PodError::MissingFile(_))
        ));
    }

    #[test]
    fn test_point_count_mismatch() {
        let (case, dirs) = surface_case(&[1.]);
        let reader = reader(case.path());
        let coords = reader.read_coordinates(&dirs[0]).unwrap();
        let window = Window::new(vec![[0., 4.], [-1., 1.]]).unwrap();
        let index_set = select_indices(&coords, &window).unwrap();
        let ctx = ExecutionContext::new(case.path()).serial();
        assert!(matches!(
            assemble(&reader, &dirs, &index_set, 6, &ctx, &NoProgress),
            Err(PodError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_interrupted() {
        let (case, dirs) = surface_case(&[1., 2.]);
        let reader = reader(case.path());
        let coords = reader.read_coordinates(&dirs[0]).unwrap();
        let window = Window::new(vec![[0., 4.], [-1., 1.]]).unwrap();
        let index_set = select_indices(&coords, &window).unwrap();
        let ctx = ExecutionContext::new(case.path());
        ctx.interrupt_handle().store(true, Ordering::Relaxed);
        assert!(matches!(
            assemble(&reader, &dirs, &index_set, 5, &ctx, &NoProgress),
            Err(PodError::Interrupted)
        ));
    }

    #[test]
    fn test_from_components_shape_mismatch() {
        let a = Array2::<f64>::zeros((4, 3));
        let b = Array2::<f64>::zeros((4, 2));
        assert!(SnapshotSet::from_components(&[a.clone(), b]).is_err());
        let set = SnapshotSet::from_components(&[a.clone(), a]).unwrap();
        assert_eq!(set.n_points(), 4);
        assert_eq!(set.n_snapshots(), 3);
    }
}
