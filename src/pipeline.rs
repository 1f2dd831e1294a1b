//! # Pod run
//! Time directories -> snapshot matrices -> covariance -> svd -> modes
use crate::config::PodConfig;
use crate::context::{ExecutionContext, Progress};
use crate::error::{PodError, Result};
use crate::pod::{covariance, decompose, reconstruct_modes, Modes};
use crate::reader::{FieldReader, Reader};
use crate::snapshots::assemble;
use crate::time_dirs::{latest_time_dirs, TimeDir};
use crate::window::{select_indices, IndexSet};
use ndarray::prelude::*;

/// Result of a pod run
#[derive(Debug, Clone)]
pub struct PodResult {
    /// Snapshot time directories, oldest first
    pub time_dirs: Vec<TimeDir>,
    /// Non-dimensional coordinates of the points in the window (points x ndim)
    pub coordinates: Array2<f64>,
    /// Indices of the window points in the field files
    pub index_set: IndexSet,
    /// Normalized modes, truncated to `n_modes`
    pub modes: Modes,
    /// Singular values, truncated to `n_modes`
    pub singular_values: Array1<f64>,
    /// Full spectrum, one singular value per snapshot
    pub spectrum: Array1<f64>,
}

/// Run proper orthogonal decomposition on the case of `ctx`.
///
/// All modes are normalized before the `n_modes` most energetic
/// ones are kept, a zero energy mode fails the run.
///
/// # Errors
/// Missing or malformed input, or degenerate modes. Nothing is
/// returned partially.
pub fn run(config: &PodConfig, ctx: &ExecutionContext, progress: &dyn Progress) -> Result<PodResult> {
    let reader = Reader::new(&ctx.case, config);

    let time_dirs = latest_time_dirs(reader.snapshot_root(), config.n_snaps)?;
    let first = time_dirs
        .first()
        .ok_or_else(|| PodError::config("nSnaps must be positive"))?;

    // Geometry does not change in time
    tracing::info!("reading coordinates of time {}", first.name);
    let mut coords = reader.read_coordinates(first)?;
    coords.mapv_inplace(|x| x / config.h);
    let index_set = select_indices(&coords, &config.window)?;
    if index_set.is_empty() {
        return Err(PodError::EmptyWindow(config.window.bounds().to_vec()));
    }
    tracing::info!(
        "{} of {} points inside the snapshot window",
        index_set.len(),
        coords.nrows()
    );

    tracing::info!("importing {} velocity snapshots", time_dirs.len());
    let set = assemble(
        &reader,
        &time_dirs,
        &index_set,
        coords.nrows(),
        ctx,
        progress,
    )?;

    tracing::info!("performing svd");
    let basis = decompose(&covariance(&set))?;
    let modes = reconstruct_modes(&set, &basis)?;

    // Spectrum and modes are cut together
    let modes = modes.truncate(config.n_modes)?;
    let singular_values = basis.singular_values.slice(s![..config.n_modes]).to_owned();

    Ok(PodResult {
        coordinates: index_set.select_rows(&coords),
        time_dirs,
        index_set,
        modes,
        singular_values,
        spectrum: basis.singular_values,
    })
}
