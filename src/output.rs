//! # Output files
//! Comma delimited text files in `<case>/postProcessing/POD`:
//! - `x{k}_coord_<id>_<nSnaps>.csv`: coordinates of axis k
//! - `phi{k}_<id>_<nSnaps>.csv`: modes of component k, one column per mode
//! - `singVals_<id>_<nSnaps>.csv`: singular values of the kept modes
//! - `singValsAll_<id>_<nSnaps>.csv`: full spectrum, one value per snapshot
use crate::config::PodConfig;
use crate::error::{PodError, Result};
use crate::pipeline::PodResult;
use ndarray::prelude::*;
use ndarray::Data;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::{Path, PathBuf};

/// Directory of the output files
pub fn output_dir<P: AsRef<Path>>(case: P) -> PathBuf {
    case.as_ref().join("postProcessing").join("POD")
}

/// File name `<prefix>_<id>_<nSnaps>.csv`
fn file_name(prefix: &str, config: &PodConfig) -> String {
    format!("{}_{}_{}.csv", prefix, config.identifier(), config.n_snaps)
}

/// Path of the singular value file
pub fn singular_values_path<P: AsRef<Path>>(dir: P, config: &PodConfig) -> PathBuf {
    dir.as_ref().join(file_name("singVals", config))
}

/// Path of the full spectrum, which the energy shares refer to
pub fn spectrum_path<P: AsRef<Path>>(dir: P, config: &PodConfig) -> PathBuf {
    dir.as_ref().join(file_name("singValsAll", config))
}

/// Format number with four digits after the point and at least two
/// exponent digits, `0.123456` -> `1.2346e-01`
///
/// ```
/// use rustpod::output::format_sci;
/// assert_eq!(format_sci(0.123456), "1.2346e-01");
/// assert_eq!(format_sci(-25000.), "-2.5000e+04");
/// assert_eq!(format_sci(0.), "0.0000e+00");
/// ```
#[must_use]
pub fn format_sci(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }
    let s = format!("{:.4e}", value);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}

/// Write vector, one value per line
///
/// # Errors
/// File can not be written
pub fn write_vector<P, S>(path: P, data: &ArrayBase<S, Ix1>) -> Result<()>
where
    P: AsRef<Path>,
    S: Data<Elem = f64>,
{
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    for v in data {
        wtr.write_record(&[format_sci(*v)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write matrix, one comma delimited record per row
///
/// # Errors
/// File can not be written
pub fn write_matrix<P, S>(path: P, data: &ArrayBase<S, Ix2>) -> Result<()>
where
    P: AsRef<Path>,
    S: Data<Elem = f64>,
{
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    for row in data.rows() {
        wtr.write_record(row.iter().map(|v| format_sci(*v)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read vector written by [`write_vector`], the first field of every
/// record is taken
///
/// # Errors
/// File can not be read or holds a non-numeric value
pub fn read_vector<P: AsRef<Path>>(path: P) -> Result<Array1<f64>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PodError::MissingFile(path.to_path_buf()));
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut data = Vec::new();
    for (num, record) in rdr.records().enumerate() {
        let record = record?;
        let token = record.get(0).unwrap_or_default().trim();
        if token.is_empty() {
            continue;
        }
        let v = token.parse::<f64>().map_err(|_| {
            PodError::ShapeMismatch(format!(
                "{:?} record {}: {:?} is not a number",
                path,
                num + 1,
                token
            ))
        })?;
        data.push(v);
    }
    Ok(Array1::from(data))
}

/// Read the full spectrum of a run from `dir`
///
/// # Errors
/// Spectrum file is missing or malformed
pub fn read_spectrum<P: AsRef<Path>>(dir: P, config: &PodConfig) -> Result<Array1<f64>> {
    read_vector(spectrum_path(dir, config))
}

/// Write coordinates, modes and singular values of a run to `dir`.
/// The directory is created if necessary.
///
/// Returns paths of all written files.
///
/// # Errors
/// Directory or files can not be written
pub fn write_results<P: AsRef<Path>>(
    dir: P,
    config: &PodConfig,
    result: &PodResult,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for (k, x) in result.coordinates.columns().into_iter().enumerate() {
        let path = dir.join(file_name(&format!("x{}_coord", k + 1), config));
        write_vector(&path, &x)?;
        written.push(path);
    }
    for (k, phi) in result.modes.components().enumerate() {
        let path = dir.join(file_name(&format!("phi{}", k + 1), config));
        write_matrix(&path, &phi)?;
        written.push(path);
    }
    let path = singular_values_path(dir, config);
    write_vector(&path, &result.singular_values)?;
    written.push(path);
    let path = spectrum_path(dir, config);
    write_vector(&path, &result.spectrum)?;
    written.push(path);

    for path in &written {
        tracing::debug!("wrote {:?}", path);
    }
    Ok(written)
}
