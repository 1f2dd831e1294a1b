//! Error types of the pod pipeline
use std::path::PathBuf;
use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, PodError>;

/// Everything that aborts a run.
///
/// Malformed lines inside a field file are not errors, the
/// reader skips them. Only the consequences (empty fields,
/// wrong point counts) surface here.
#[derive(Debug, Error)]
pub enum PodError {
    /// Missing or invalid configuration entry
    #[error("configuration error: {0}")]
    Config(String),

    /// Fewer numeric time directories than requested snapshots
    #[error("found {found} time directories in {root:?}, but {requested} snapshots are requested")]
    MissingTimeDirs {
        /// Directory that was searched
        root: PathBuf,
        /// Number of time directories found
        found: usize,
        /// Requested number of snapshots
        requested: usize,
    },

    /// Field file of a selected snapshot does not exist
    #[error("missing field file {0:?}")]
    MissingFile(PathBuf),

    /// External geometry export failed
    #[error("geometry export `{command}` failed: {reason}")]
    ExportTool {
        /// Command that was invoked
        command: String,
        /// What went wrong
        reason: String,
    },

    /// Declared and parsed number of points disagree
    #[error("{path:?} declares {declared} points, but {parsed} could be parsed")]
    PointCount {
        /// Field file
        path: PathBuf,
        /// Point count from the file header
        declared: usize,
        /// Number of parsed data lines
        parsed: usize,
    },

    /// Header line with the point count is missing or not an integer
    #[error("{path:?}: no point count in line {line}")]
    MissingPointCount {
        /// Field file
        path: PathBuf,
        /// Line number (1-based) which should hold the count
        line: usize,
    },

    /// No data line could be parsed
    #[error("no numeric data found in {0:?}")]
    EmptyField(PathBuf),

    /// No sample point lies inside the snapshot window
    #[error("no sample point inside the snapshot window {0:?}")]
    EmptyWindow(Vec<[f64; 2]>),

    /// Array dimensions do not fit together
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Mode without energy, normalization would produce NaN
    #[error("mode {mode} has zero energy (norm {norm:e}), cannot normalize")]
    DegenerateMode {
        /// Index of the mode
        mode: usize,
        /// Joint L2 norm of the mode
        norm: f64,
    },

    /// Failure inside lapack
    #[error("linear algebra error: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),

    /// Decomposition returned without singular vectors
    #[error("svd did not return singular vectors")]
    MissingSingularVectors,

    /// Worker pool could not be created
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Run stopped by the interrupt flag
    #[error("interrupted")]
    Interrupted,

    /// Delimited output could not be written or read back
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Io error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PodError {
    /// Shorthand for configuration errors
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        PodError::Config(msg.into())
    }
}
