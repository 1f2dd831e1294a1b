//! Column reader for sampled surface files
//!
//! Surface files of OpenFOAM hold one tuple per line, wrapped in
//! boilerplate:
//! ```text
//! 3
//! (
//! (0.1 0.2 0.0)
//! (0.3 0.2 0.0)
//! (0.5 0.2 0.0)
//! )
//! ```
//! Every line which does not deliver all requested columns is skipped.
use crate::error::{PodError, Result};
use ndarray::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Delimiters of a field file line
pub(crate) fn is_delimiter(c: char) -> bool {
    c == '(' || c == ')' || c.is_whitespace()
}

/// Numeric tokens after the leading token.
///
/// The text in front of the first delimiter (empty for a bare tuple,
/// a label or count otherwise) is dropped, as are empty tokens.
/// Indentation does not count as a delimiter.
fn value_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.trim_start()
        .split(is_delimiter)
        .skip(1)
        .filter(|t| !t.is_empty())
}

/// Parse requested columns of a line, `None` if any of them fails
fn parse_line(line: &str, cols: &[usize], buf: &mut Vec<f64>) -> Option<()> {
    let tokens: Vec<&str> = value_tokens(line).collect();
    buf.clear();
    for &c in cols {
        buf.push(tokens.get(c)?.parse::<f64>().ok()?);
    }
    Some(())
}

/// Read columns `cols` (0-based, counted behind the leading token)
/// of every parsable line.
///
/// Returns array of shape (cols.len(), number of parsed lines).
/// A file without a single parsable line gives an empty array, it is
/// up to the caller to reject it.
///
/// # Errors
/// File does not exist or can not be read
///
/// # Example
/// ```
/// use rustpod::reader::read_columns;
/// use std::io::Write;
/// let mut file = tempfile::NamedTempFile::new().unwrap();
/// write!(file, "2\n(\n(1 2 3)\n(4 5 6)\n)\n").unwrap();
/// let data = read_columns(file.path(), &[0, 2]).unwrap();
/// assert_eq!(data, ndarray::array![[1., 4.], [3., 6.]]);
/// ```
pub fn read_columns<P: AsRef<Path>>(path: P, cols: &[usize]) -> Result<Array2<f64>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PodError::MissingFile(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);

    let mut data: Vec<f64> = Vec::new();
    let mut buf: Vec<f64> = Vec::with_capacity(cols.len());
    let mut rows = 0;
    let mut skipped = 0;
    for line in reader.split(b'\n') {
        let line = line?;
        // Binary or otherwise non-utf8 boilerplate is skipped like any
        // other unparsable line
        let parsed = std::str::from_utf8(&line)
            .ok()
            .and_then(|line| parse_line(line, cols, &mut buf));
        if parsed.is_some() {
            data.extend_from_slice(&buf);
            rows += 1;
        } else {
            skipped += 1;
        }
    }
    tracing::debug!(
        "{:?}: parsed {} lines, skipped {} lines",
        path,
        rows,
        skipped
    );

    // Stored row by row, return columns first
    let data = Array2::from_shape_vec((rows, cols.len()), data)
        .map_err(|e| PodError::ShapeMismatch(e.to_string()))?;
    Ok(data.reversed_axes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_with(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_skips_header_and_malformed_lines() {
        let file = file_with(
            "FoamFile header\n4\n(\n(0.1 0.2 0.3)\n(0.4 abc 0.6)\n(0.7 0.8 0.9)\n)\n",
        );
        let data = read_columns(file.path(), &[0, 1]).unwrap();
        assert_eq!(data.shape(), &[2, 2]);
        assert_eq!(data, array![[0.1, 0.7], [0.2, 0.8]]);
    }

    #[test]
    fn test_leading_token_is_skipped() {
        let file = file_with("0 1.5 2.5\n1 3.5 4.5\n");
        let data = read_columns(file.path(), &[1]).unwrap();
        assert_eq!(data, array![[2.5, 4.5]]);
    }

    #[test]
    fn test_indented_leading_token_is_skipped() {
        let file = file_with("  0 1.5 2.5\n\t1 3.5 4.5\n  (5.5 6.5)\n");
        let data = read_columns(file.path(), &[0]).unwrap();
        assert_eq!(data, array![[1.5, 3.5, 5.5]]);
    }

    #[test]
    fn test_non_utf8_lines_are_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xfe header\n(1 2 3)\n\x80(4 5 6)\n(7 8 9)\n")
            .unwrap();
        let data = read_columns(file.path(), &[0, 2]).unwrap();
        assert_eq!(data, array![[1., 7.], [3., 9.]]);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let file = file_with("(1 2)\n(1 2 3)\n");
        let data = read_columns(file.path(), &[2]).unwrap();
        assert_eq!(data, array![[3.]]);
    }

    #[test]
    fn test_no_parsable_line_gives_empty_array() {
        let file = file_with("header\n(\n)\n");
        let data = read_columns(file.path(), &[0, 1, 2]).unwrap();
        assert_eq!(data.shape(), &[3, 0]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_columns(dir.path().join("U"), &[0]),
            Err(PodError::MissingFile(_))
        ));
    }
}
