use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Named vectors
// ---------------------------------------------------------------------------

/// A named numeric vector: dimension or parameter name → value.
///
/// `BTreeMap` keeps iteration order stable. The correlation matrix reorders
/// dimensions by [`dimension_rank`]; parameters stay alphabetical.
pub type Vector = BTreeMap<String, f64>;

// ---------------------------------------------------------------------------
// GPS error dimensions
// ---------------------------------------------------------------------------

/// One of the 18 fixed GPS-error input dimensions.
///
/// Raw values live at `gpsError.<group>.<axis>`, fuzziness at
/// `gpsError.<group>Fuzziness.<axis>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsDimension {
    pub name: &'static str,
    pub group: &'static str,
    pub fuzziness: bool,
    pub axis: &'static str,
}

impl GpsDimension {
    const fn raw(name: &'static str, group: &'static str, axis: &'static str) -> Self {
        Self {
            name,
            group,
            fuzziness: false,
            axis,
        }
    }

    const fn fuzzy(name: &'static str, group: &'static str, axis: &'static str) -> Self {
        Self {
            name,
            group,
            fuzziness: true,
            axis,
        }
    }

    /// Key of the object holding this dimension inside `gpsError`.
    pub fn group_key(&self) -> String {
        if self.fuzziness {
            format!("{}Fuzziness", self.group)
        } else {
            self.group.to_string()
        }
    }
}

pub const GPS_DIMENSIONS: [GpsDimension; 18] = [
    GpsDimension::raw("posX", "position", "x"),
    GpsDimension::raw("posY", "position", "y"),
    GpsDimension::raw("posZ", "position", "z"),
    GpsDimension::fuzzy("posFuzzX", "position", "x"),
    GpsDimension::fuzzy("posFuzzY", "position", "y"),
    GpsDimension::fuzzy("posFuzzZ", "position", "z"),
    GpsDimension::raw("velX", "velocity", "x"),
    GpsDimension::raw("velY", "velocity", "y"),
    GpsDimension::raw("velZ", "velocity", "z"),
    GpsDimension::fuzzy("velFuzzX", "velocity", "x"),
    GpsDimension::fuzzy("velFuzzY", "velocity", "y"),
    GpsDimension::fuzzy("velFuzzZ", "velocity", "z"),
    GpsDimension::raw("accX", "acceleration", "x"),
    GpsDimension::raw("accY", "acceleration", "y"),
    GpsDimension::raw("accZ", "acceleration", "z"),
    GpsDimension::fuzzy("accFuzzX", "acceleration", "x"),
    GpsDimension::fuzzy("accFuzzY", "acceleration", "y"),
    GpsDimension::fuzzy("accFuzzZ", "acceleration", "z"),
];

/// Look up a dimension by its short name (e.g. `velFuzzY`).
pub fn gps_dimension(name: &str) -> Option<&'static GpsDimension> {
    GPS_DIMENSIONS.iter().find(|d| d.name == name)
}

/// Position of `name` in [`GPS_DIMENSIONS`]; names outside the fixed set
/// rank after all of them.
pub fn dimension_rank(name: &str) -> usize {
    GPS_DIMENSIONS
        .iter()
        .position(|d| d.name == name)
        .unwrap_or(GPS_DIMENSIONS.len())
}

// ---------------------------------------------------------------------------
// Kalman tuning parameters
// ---------------------------------------------------------------------------

/// Parameter families produced by the optimizer: R/Q noise × quantity.
pub const PARAMETER_FAMILIES: [&str; 6] = [
    "rPos",
    "rVelocity",
    "rAcceleration",
    "qPos",
    "qVelocity",
    "qAcceleration",
];

/// Per-axis suffixes of a parameter family.
pub const PARAMETER_AXES: [&str; 3] = ["X", "Y", "Z"];

/// Suffix of the legacy combined value that applies to both X and Z.
pub const LEGACY_COMBINED_AXIS: &str = "XZ";

// ---------------------------------------------------------------------------
// Observation – one run or one section
// ---------------------------------------------------------------------------

/// A single optimizer outcome paired with the GPS error that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// GPS-error dimensions (always the full 18).
    pub input: Vector,
    /// Kalman tuning parameters found by the optimizer.
    pub output: Vector,
    /// Provenance, e.g. `sweep.json - Run 3`.
    pub label: String,
}

// ---------------------------------------------------------------------------
// TimeSeries – CSV log output
// ---------------------------------------------------------------------------

/// A CSV time series with named numeric columns (non-numeric cells are NaN).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TimeSeries {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, if present.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).copied().unwrap_or(f64::NAN))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// LoadedFile – a parsed input file, tagged by kind
// ---------------------------------------------------------------------------

/// Kind of a loaded file, used for logging and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileKind {
    SweepSummary,
    SectionSweep,
    Metadata,
    TimeSeries,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileKind::SweepSummary => "sweep summary",
            FileKind::SectionSweep => "section sweep",
            FileKind::Metadata => "metadata",
            FileKind::TimeSeries => "time series",
        };
        write!(f, "{s}")
    }
}

/// A file after parsing. Only the two sweep kinds feed the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedFile {
    /// `{ "gpsError": {...}, "results": [ {...params}, ... ] }`
    SweepSummary { name: String, root: JsonValue },
    /// `{ "sections": [ { "name", "gpsError", "bestResult" }, ... ] }`
    SectionSweep { name: String, root: JsonValue },
    /// Any other JSON document, e.g. a single optimizer run's metadata.
    Metadata { name: String, root: JsonValue },
    /// CSV time series.
    TimeSeries { name: String, series: TimeSeries },
}

impl LoadedFile {
    /// Display name (file name component of the path).
    pub fn name(&self) -> &str {
        match self {
            LoadedFile::SweepSummary { name, .. }
            | LoadedFile::SectionSweep { name, .. }
            | LoadedFile::Metadata { name, .. }
            | LoadedFile::TimeSeries { name, .. } => name,
        }
    }

    pub fn kind(&self) -> FileKind {
        match self {
            LoadedFile::SweepSummary { .. } => FileKind::SweepSummary,
            LoadedFile::SectionSweep { .. } => FileKind::SectionSweep,
            LoadedFile::Metadata { .. } => FileKind::Metadata,
            LoadedFile::TimeSeries { .. } => FileKind::TimeSeries,
        }
    }
}
