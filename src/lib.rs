#![warn(missing_docs)]
//! # rustpod: Proper orthogonal decomposition of OpenFOAM snapshots
//!
//! Extracts the dominant flow structures from a series of velocity
//! snapshots, written by OpenFOAM either on a sampled cutting plane (2-D)
//! or as full internal field (3-D).
//!
//! Pipeline:
//! 1. Take the `nSnaps` most recent time directories of a case
//! 2. Read the coordinates once and select all points inside the
//!    snapshot window
//! 3. Assemble one snapshot matrix (points x snapshots) per velocity
//!    component
//! 4. Decompose the covariance `C = sum_i X_i^T X_i / N` by a svd
//! 5. Project the snapshots onto the singular vectors and normalize
//!    the resulting modes
//!
//! # Example
//! ```no_run
//! use rustpod::{run, ExecutionContext, NoProgress, PodConfig};
//! let config = PodConfig::from_file("podDict").unwrap();
//! let ctx = ExecutionContext::new(".");
//! let result = run(&config, &ctx, &NoProgress).unwrap();
//! println!("{:?}", result.singular_values);
//! ```
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod pod;
pub mod reader;
pub mod snapshots;
pub mod time_dirs;
pub mod utils;
pub mod window;
pub use config::PodConfig;
pub use context::{ExecutionContext, NoProgress, Progress};
pub use error::{PodError, Result};
pub use pipeline::{run, PodResult};
