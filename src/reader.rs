//! # Field readers
//!
//! Two layouts of a case are supported:
//! - **Surface** (2-D): `<case>/postProcessing/cuttingPlane/<time>/<patch>/`
//!   with the coordinate file (`points`) and `vectorField/U`
//! - **Volume** (3-D): `<case>/<time>/` with `cellCentres` and `U`
//!
//! Both implement [`FieldReader`], [`Reader`] dispatches between them.
pub mod field_file;
pub mod internal_field;
use crate::config::{Dimensionality, PodConfig};
use crate::error::{PodError, Result};
use crate::time_dirs::TimeDir;
use enum_dispatch::enum_dispatch;
pub use field_file::read_columns;
pub use internal_field::read_internal_field;
use ndarray::prelude::*;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Read coordinates and velocities of a snapshot
#[enum_dispatch]
pub trait FieldReader {
    /// Directory which holds the time directories
    fn snapshot_root(&self) -> &Path;
    /// Coordinates (points x ndim), in units of the case
    ///
    /// # Errors
    /// Coordinate file is missing or unreadable
    fn read_coordinates(&self, time: &TimeDir) -> Result<Array2<f64>>;
    /// Velocity (points x components)
    ///
    /// # Errors
    /// Velocity file is missing or unreadable
    fn read_velocity(&self, time: &TimeDir) -> Result<Array2<f64>>;
    /// Number of velocity components
    fn n_components(&self) -> usize;
}

/// Reader for plane or volume
#[enum_dispatch(FieldReader)]
#[derive(Debug, Clone)]
pub enum Reader {
    /// Sampled cutting plane
    Surface(SurfaceReader),
    /// Internal field
    Volume(VolumeReader),
}

impl Reader {
    /// Return reader of a case, which matches the configuration
    #[must_use]
    pub fn new<P: AsRef<Path>>(case: P, config: &PodConfig) -> Self {
        match config.dim {
            Dimensionality::Two(_) => Reader::Surface(SurfaceReader::new(
                case,
                config.patch_name.as_deref().unwrap_or_default(),
                config.dim.columns(),
                &config.coordinate_file,
            )),
            Dimensionality::Three => Reader::Volume(VolumeReader::new(
                case,
                config.skip_rows,
                &config.cell_centres_command,
            )),
        }
    }
}

/// Reader of a sampled surface
#[derive(Debug, Clone)]
pub struct SurfaceReader {
    /// `<case>/postProcessing/cuttingPlane`
    root: PathBuf,
    /// Name of the surface
    patch_name: String,
    /// Columns of coordinates and velocity which are read
    columns: Vec<usize>,
    /// File name of the coordinates
    coordinate_file: String,
}

impl SurfaceReader {
    /// Return new surface reader
    #[must_use]
    pub fn new<P: AsRef<Path>>(
        case: P,
        patch_name: &str,
        columns: Vec<usize>,
        coordinate_file: &str,
    ) -> Self {
        Self {
            root: case.as_ref().join("postProcessing").join("cuttingPlane"),
            patch_name: patch_name.to_string(),
            columns,
            coordinate_file: coordinate_file.to_string(),
        }
    }

    fn read(&self, path: &Path) -> Result<Array2<f64>> {
        let data = read_columns(path, &self.columns)?;
        if data.ncols() == 0 {
            return Err(PodError::EmptyField(path.to_path_buf()));
        }
        Ok(data.reversed_axes())
    }
}

impl FieldReader for SurfaceReader {
    fn snapshot_root(&self) -> &Path {
        &self.root
    }

    fn read_coordinates(&self, time: &TimeDir) -> Result<Array2<f64>> {
        self.read(&time.path.join(&self.patch_name).join(&self.coordinate_file))
    }

    fn read_velocity(&self, time: &TimeDir) -> Result<Array2<f64>> {
        self.read(
            &time
                .path
                .join(&self.patch_name)
                .join("vectorField")
                .join("U"),
        )
    }

    fn n_components(&self) -> usize {
        self.columns.len()
    }
}

/// Reader of volumetric fields
#[derive(Debug, Clone)]
pub struct VolumeReader {
    /// Case directory
    case: PathBuf,
    /// Header lines of field files
    skip_rows: usize,
    /// Command which writes `cellCentres`, leading arguments
    /// separated by whitespace
    command: String,
}

impl VolumeReader {
    /// Return new volume reader
    #[must_use]
    pub fn new<P: AsRef<Path>>(case: P, skip_rows: usize, command: &str) -> Self {
        Self {
            case: case.as_ref().to_path_buf(),
            skip_rows,
            command: command.to_string(),
        }
    }

    /// Read vector field and keep the first three columns
    fn read_vectors(&self, path: &Path) -> Result<Array2<f64>> {
        let data = read_internal_field(path, self.skip_rows)?;
        if data.ncols() < 3 {
            return Err(PodError::ShapeMismatch(format!(
                "{:?} holds {} columns, expected a vector field",
                path,
                data.ncols()
            )));
        }
        Ok(data.slice(s![.., ..3]).to_owned())
    }

    /// Let the external tool write `cellCentres` of `time`
    fn export_cell_centres(&self, time: &TimeDir) -> Result<()> {
        tracing::info!(
            "cellCentres missing in {}, running {}",
            time.name,
            self.command
        );
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or_else(|| PodError::ExportTool {
            command: self.command.clone(),
            reason: "empty command".to_string(),
        })?;
        let status = Command::new(program)
            .args(parts)
            .arg("-time")
            .arg(&time.name)
            .current_dir(&self.case)
            .stdout(Stdio::null())
            .status()
            .map_err(|e| PodError::ExportTool {
                command: self.command.clone(),
                reason: e.to_string(),
            })?;
        if !status.success() {
            return Err(PodError::ExportTool {
                command: self.command.clone(),
                reason: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

impl FieldReader for VolumeReader {
    fn snapshot_root(&self) -> &Path {
        &self.case
    }

    fn read_coordinates(&self, time: &TimeDir) -> Result<Array2<f64>> {
        let path = time.path.join("cellCentres");
        if !path.is_file() {
            self.export_cell_centres(time)?;
            if !path.is_file() {
                return Err(PodError::ExportTool {
                    command: self.command.clone(),
                    reason: format!("{:?} still missing", path),
                });
            }
        }
        self.read_vectors(&path)
    }

    fn read_velocity(&self, time: &TimeDir) -> Result<Array2<f64>> {
        self.read_vectors(&time.path.join("U"))
    }

    fn n_components(&self) -> usize {
        3
    }
}
