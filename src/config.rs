//! # Run configuration
//!
//! Plain text format, one `key value` pair per line:
//! ```text
//! # POD of the wake behind a cylinder
//! patchName   zNormal
//! nSnaps      100
//! nModes      10
//! nDim        2
//! direction1  x
//! direction2  y
//! h           0.01
//! x1min       0.5
//! x1max       4.0
//! x2min       -1.5
//! x2max       1.5
//! modes       (1,2,3)
//! point       (0.0,0.5)
//! ```
//! `modes` and `point` entries belong to the plotting tools, they are
//! kept but not used here. Unknown keys are ignored.
//!
//! All required keys are validated at once, before any file is read.
use crate::error::{PodError, Result};
use crate::window::Window;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default number of header lines of a volumetric field file
pub const DEFAULT_SKIP_ROWS: usize = 22;
/// Default file with sample point coordinates of a cutting plane
pub const DEFAULT_COORDINATE_FILE: &str = "points";
/// Default command which writes cell centres of a case
pub const DEFAULT_CELL_CENTRES_COMMAND: &str = "myWriteCellCentres";

/// Cartesian direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Direction {
    /// x-axis
    X,
    /// y-axis
    Y,
    /// z-axis
    Z,
}

impl Direction {
    /// Column of this direction in a vector field
    #[must_use]
    pub fn column(self) -> usize {
        match self {
            Direction::X => 0,
            Direction::Y => 1,
            Direction::Z => 2,
        }
    }
}

impl FromStr for Direction {
    type Err = PodError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" | "X" => Ok(Direction::X),
            "y" | "Y" => Ok(Direction::Y),
            "z" | "Z" => Ok(Direction::Z),
            _ => Err(PodError::config(format!(
                "unknown direction {:?}, expected x, y or z",
                s
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Direction::X => "x",
            Direction::Y => "y",
            Direction::Z => "z",
        };
        write!(f, "{}", s)
    }
}

/// Sampled cutting plane or full volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensionality {
    /// Cutting plane spanned by two directions
    Two([Direction; 2]),
    /// Volumetric internal field
    Three,
}

impl Dimensionality {
    /// Return new 2-D plane, directions may come in any order
    ///
    /// # Errors
    /// Both directions are the same
    pub fn plane(dir1: Direction, dir2: Direction) -> Result<Self> {
        if dir1 == dir2 {
            return Err(PodError::config(format!(
                "direction1 and direction2 must differ, both are {}",
                dir1
            )));
        }
        let mut dirs = [dir1, dir2];
        dirs.sort();
        Ok(Dimensionality::Two(dirs))
    }

    /// Number of spatial dimensions
    #[must_use]
    pub fn ndim(&self) -> usize {
        match self {
            Dimensionality::Two(_) => 2,
            Dimensionality::Three => 3,
        }
    }

    /// Number of velocity components
    #[must_use]
    pub fn n_components(&self) -> usize {
        self.ndim()
    }

    /// Columns of coordinates and velocities which are used,
    /// always ascending
    #[must_use]
    pub fn columns(&self) -> Vec<usize> {
        match self {
            Dimensionality::Two(dirs) => dirs.iter().map(|d| d.column()).collect(),
            Dimensionality::Three => vec![0, 1, 2],
        }
    }
}

/// Validated configuration of a pod run
#[derive(Debug, Clone, PartialEq)]
pub struct PodConfig {
    /// Name of the sampled surface (required in 2-D)
    pub patch_name: Option<String>,
    /// Number of snapshots
    pub n_snaps: usize,
    /// Number of modes which are kept, `<= n_snaps`
    pub n_modes: usize,
    /// Plane or volume
    pub dim: Dimensionality,
    /// Non-dimensionalization length
    pub h: f64,
    /// Snapshot window in non-dimensional coordinates
    pub window: Window,
    /// Header lines of volumetric field files
    pub skip_rows: usize,
    /// Coordinate file of a cutting plane
    pub coordinate_file: String,
    /// Command which exports cell centres, if they are missing
    pub cell_centres_command: String,
    /// Modes requested by the plotting tools
    pub plot_modes: Vec<usize>,
    /// Geometry outline for the plotting tools
    pub points: Vec<Vec<f64>>,
}

impl PodConfig {
    /// Read and validate configuration file
    ///
    /// # Errors
    /// File can not be read or is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    /// Lists every missing or invalid key
    ///
    /// # Example
    /// ```
    /// use rustpod::config::{Dimensionality, PodConfig};
    /// let text = "patchName zNormal\nnSnaps 4\nnDim 3\nh 0.5\n\
    ///     x1min 0\nx1max 1\nx2min 0\nx2max 1\nx3min 0\nx3max 1\n";
    /// let config = PodConfig::parse(text).unwrap();
    /// assert_eq!(config.dim, Dimensionality::Three);
    /// assert_eq!(config.n_modes, 4);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let raw = RawConfig::parse(text)?;
        raw.validate()
    }

    /// Identifier used in output file names
    #[must_use]
    pub fn identifier(&self) -> String {
        match self.dim {
            Dimensionality::Two(_) => self.patch_name.clone().unwrap_or_default(),
            Dimensionality::Three => format!(
                "{}_3D",
                self.patch_name.as_deref().unwrap_or("internalField")
            ),
        }
    }
}

/// Unvalidated key value pairs
#[derive(Debug, Default)]
struct RawConfig {
    entries: HashMap<String, String>,
    modes: Vec<usize>,
    points: Vec<Vec<f64>>,
}

impl RawConfig {
    fn parse(text: &str) -> Result<Self> {
        let mut raw = RawConfig::default();
        for (num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let key: &str = line
                .split(|c: char| c.is_whitespace() || c == '(')
                .next()
                .unwrap_or_default();
            match key {
                "modes" => {
                    raw.modes = parse_list(line, num)?;
                }
                "point" => {
                    raw.points.push(parse_list(line, num)?);
                }
                _ => {
                    let mut tokens = line.split_whitespace();
                    let key = tokens.next().unwrap_or_default();
                    let value = tokens.next().ok_or_else(|| {
                        PodError::config(format!("line {}: key {:?} has no value", num + 1, key))
                    })?;
                    raw.entries.insert(key.to_string(), value.to_string());
                }
            }
        }
        Ok(raw)
    }

    fn validate(mut self) -> Result<PodConfig> {
        let mut problems: Vec<String> = Vec::new();

        let n_dim: Option<usize> = self.required("nDim", &mut problems);
        let n_snaps: Option<usize> = self.required("nSnaps", &mut problems);
        let n_modes: Option<usize> = self.optional("nModes", &mut problems);
        let h: Option<f64> = self.required("h", &mut problems);
        let skip_rows: Option<usize> = self.optional("skipRows", &mut problems);
        let patch_name = self.entries.remove("patchName");
        let coordinate_file = self.entries.remove("coordinateFile");
        let cell_centres_command = self.entries.remove("cellCentresCommand");

        if n_snaps == Some(0) {
            problems.push("nSnaps must be positive".to_string());
        }
        let n_modes = match (n_modes, n_snaps) {
            (Some(0), _) => {
                problems.push("nModes must be positive".to_string());
                None
            }
            (Some(m), Some(n)) if m > n => {
                problems.push(format!("nModes ({}) must not exceed nSnaps ({})", m, n));
                None
            }
            (Some(m), _) => Some(m),
            (None, n) => n,
        };
        if let Some(h) = h {
            if !(h.is_finite() && h > 0.) {
                problems.push(format!("h must be positive, got {}", h));
            }
        }

        let dim = match n_dim {
            Some(2) => {
                if patch_name.is_none() {
                    problems.push("missing key patchName".to_string());
                }
                let dir1: Option<Direction> = self.required("direction1", &mut problems);
                let dir2: Option<Direction> = self.required("direction2", &mut problems);
                match (dir1, dir2) {
                    (Some(d1), Some(d2)) => match Dimensionality::plane(d1, d2) {
                        Ok(dim) => Some(dim),
                        Err(e) => {
                            problems.push(message(e));
                            None
                        }
                    },
                    _ => None,
                }
            }
            Some(3) => Some(Dimensionality::Three),
            Some(n) => {
                problems.push(format!("nDim must be 2 or 3, got {}", n));
                None
            }
            None => None,
        };

        let mut bounds = Vec::new();
        if let Some(dim) = dim {
            for axis in 1..=dim.ndim() {
                let min: Option<f64> = self.required(&format!("x{}min", axis), &mut problems);
                let max: Option<f64> = self.required(&format!("x{}max", axis), &mut problems);
                if let (Some(min), Some(max)) = (min, max) {
                    bounds.push([min, max]);
                }
            }
        }
        let window = if bounds.len() == dim.map_or(0, |d| d.ndim()) && !bounds.is_empty() {
            match Window::new(bounds) {
                Ok(w) => Some(w),
                Err(e) => {
                    problems.push(message(e));
                    None
                }
            }
        } else {
            None
        };

        for key in self.entries.keys() {
            tracing::debug!("ignoring configuration key {:?}", key);
        }

        match (dim, n_snaps, n_modes, h, window) {
            (Some(dim), Some(n_snaps), Some(n_modes), Some(h), Some(window))
                if problems.is_empty() =>
            {
                Ok(PodConfig {
                    patch_name,
                    n_snaps,
                    n_modes,
                    dim,
                    h,
                    window,
                    skip_rows: skip_rows.unwrap_or(DEFAULT_SKIP_ROWS),
                    coordinate_file: coordinate_file
                        .unwrap_or_else(|| DEFAULT_COORDINATE_FILE.to_string()),
                    cell_centres_command: cell_centres_command
                        .unwrap_or_else(|| DEFAULT_CELL_CENTRES_COMMAND.to_string()),
                    plot_modes: self.modes,
                    points: self.points,
                })
            }
            _ => Err(PodError::Config(problems.join("; "))),
        }
    }

    /// Remove and parse key, record a problem if it is missing or invalid
    fn required<T: FromStr>(&mut self, key: &str, problems: &mut Vec<String>) -> Option<T> {
        if !self.entries.contains_key(key) {
            problems.push(format!("missing key {}", key));
            return None;
        }
        self.optional(key, problems)
    }

    /// Remove and parse key, record a problem if it is invalid
    fn optional<T: FromStr>(&mut self, key: &str, problems: &mut Vec<String>) -> Option<T> {
        let value = self.entries.remove(key)?;
        match value.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                problems.push(format!("invalid value {:?} for key {}", value, key));
                None
            }
        }
    }
}

/// Parse `key (a,b,c)`
fn parse_list<T: FromStr>(line: &str, num: usize) -> Result<Vec<T>> {
    let inner = line
        .split_once('(')
        .and_then(|(_, rest)| rest.rsplit_once(')'))
        .map(|(inner, _)| inner)
        .ok_or_else(|| PodError::config(format!("line {}: expected a list in (..)", num + 1)))?;
    inner
        .split(',')
        .map(|x| {
            x.trim().parse::<T>().map_err(|_| {
                PodError::config(format!("line {}: invalid list entry {:?}", num + 1, x))
            })
        })
        .collect()
}

fn message(e: PodError) -> String {
    match e {
        PodError::Config(msg) => msg,
        other => other.to_string(),
    }
}
