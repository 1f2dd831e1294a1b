//! # Time directories
//! A case writes one directory per output time, named by the time
//! value. Snapshots are the most recent `n` of them.
use crate::error::{PodError, Result};
use crate::utils::argsort;
use std::path::{Path, PathBuf};

/// Output time directory of a case
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDir {
    /// Directory name, as written by the solver
    pub name: String,
    /// Numeric time
    pub time: f64,
    /// Full path
    pub path: PathBuf,
}

/// Returns time value if `name` is a finite number,
/// scientific notation included
///
/// ```
/// use rustpod::time_dirs::parse_time_name;
/// assert_eq!(parse_time_name("1e-3"), Some(0.001));
/// assert_eq!(parse_time_name("constant"), None);
/// ```
#[must_use]
pub fn parse_time_name(name: &str) -> Option<f64> {
    name.parse::<f64>().ok().filter(|t| t.is_finite())
}

/// List all time directories in root, sorted by time (ascending).
///
/// # Errors
/// Root can not be read
pub fn list_time_dirs<P: AsRef<Path>>(root: P) -> Result<Vec<TimeDir>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(PodError::MissingFile(root.to_path_buf()));
    }
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        if let Some(time) = parse_time_name(&name) {
            dirs.push(TimeDir { name, time, path });
        }
    }
    let times: Vec<f64> = dirs.iter().map(|d| d.time).collect();
    let mut sorted: Vec<Option<TimeDir>> = dirs.into_iter().map(Some).collect();
    Ok(argsort(&times)
        .into_iter()
        .filter_map(|i| sorted[i].take())
        .collect())
}

/// Return the `n_snaps` most recent time directories, oldest first.
///
/// # Errors
/// Less than `n_snaps` time directories exist
pub fn latest_time_dirs<P: AsRef<Path>>(root: P, n_snaps: usize) -> Result<Vec<TimeDir>> {
    let mut dirs = list_time_dirs(&root)?;
    if dirs.len() < n_snaps {
        return Err(PodError::MissingTimeDirs {
            root: root.as_ref().to_path_buf(),
            found: dirs.len(),
            requested: n_snaps,
        });
    }
    let dirs = dirs.split_off(dirs.len() - n_snaps);
    if let (Some(first), Some(last)) = (dirs.first(), dirs.last()) {
        tracing::debug!(
            "selected {} time directories from {} to {}",
            dirs.len(),
            first.name,
            last.name
        );
    }
    Ok(dirs)
}
