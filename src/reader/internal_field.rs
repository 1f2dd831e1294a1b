//! Reader for volumetric fields (internalField of a time directory)
//!
//! Layout, line numbers 1-based:
//! - `1 ..= skip_rows - 2`: header, ignored
//! - `skip_rows - 1`: number of points
//! - `skip_rows`: opening bracket
//! - `skip_rows + 1 ..= skip_rows + count`: one point per line
//! - everything behind: ignored
use super::field_file::is_delimiter;
use crate::error::{PodError, Result};
use ndarray::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read internal field of a volumetric field file.
///
/// Returns array of shape (points, columns). The number of
/// columns is taken from the first parsable data line.
///
/// # Errors
/// - File is missing or unreadable
/// - Header holds no point count
/// - Number of parsed points differs from the declared count
///
/// # Example
/// ```
/// use rustpod::reader::read_internal_field;
/// use std::io::Write;
/// let mut file = tempfile::NamedTempFile::new().unwrap();
/// write!(file, "header\n2\n(\n(1 2 3)\n(4 5 6)\n)\nboundaryField\n").unwrap();
/// let data = read_internal_field(file.path(), 3).unwrap();
/// assert_eq!(data, ndarray::array![[1., 2., 3.], [4., 5., 6.]]);
/// ```
pub fn read_internal_field<P: AsRef<Path>>(path: P, skip_rows: usize) -> Result<Array2<f64>> {
    let path = path.as_ref();
    if skip_rows < 2 {
        return Err(PodError::config(format!(
            "skipRows must be at least 2, got {}",
            skip_rows
        )));
    }
    if !path.is_file() {
        return Err(PodError::MissingFile(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);

    let count_line = skip_rows - 1;
    let mut declared: Option<usize> = None;
    let mut n_cols: Option<usize> = None;
    let mut data: Vec<f64> = Vec::new();
    let mut rows = 0;

    for (i, line) in reader.lines().enumerate() {
        let num = i + 1;
        if num < count_line {
            continue;
        }
        let line = line?;
        if num == count_line {
            declared = line
                .split_whitespace()
                .next()
                .and_then(|t| t.parse::<usize>().ok());
            if declared.is_none() {
                return Err(PodError::MissingPointCount {
                    path: path.to_path_buf(),
                    line: num,
                });
            }
            continue;
        }
        let count = declared.unwrap_or(0);
        if num <= skip_rows {
            continue;
        }
        if num > skip_rows + count {
            break;
        }

        let tokens: Vec<&str> = line.split(is_delimiter).filter(|t| !t.is_empty()).collect();
        let n = match n_cols {
            Some(n) => n,
            None => {
                if tokens.first().and_then(|t| t.parse::<f64>().ok()).is_none() {
                    continue;
                }
                n_cols = Some(tokens.len());
                tokens.len()
            }
        };
        let values: Option<Vec<f64>> = tokens
            .iter()
            .take(n)
            .map(|t| t.parse::<f64>().ok())
            .collect();
        match values {
            Some(values) if values.len() == n => {
                data.extend(values);
                rows += 1;
            }
            _ => tracing::warn!("{:?}: skipping malformed line {}", path, num),
        }
    }

    let declared = declared.ok_or_else(|| PodError::MissingPointCount {
        path: path.to_path_buf(),
        line: count_line,
    })?;
    if declared == 0 || rows == 0 {
        return Err(PodError::EmptyField(path.to_path_buf()));
    }
    if rows != declared {
        return Err(PodError::PointCount {
            path: path.to_path_buf(),
            declared,
            parsed: rows,
        });
    }
    Array2::from_shape_vec((rows, n_cols.unwrap_or(0)), data)
        .map_err(|e| PodError::ShapeMismatch(e.to_string()))
}
