//! Cross-run comparison.
//!
//! Two entry points:
//! - [`compare_labels`] compares two run labels stored in the `Group` column
//!   of one table; degenerate timings drop the row.
//! - [`compare_runs`] aligns two independently produced tables on the full
//!   identity key; degenerate timings yield [`Derived::NotANumber`] and
//!   one-sided keys are kept with missing derived cells.

mod labels;
mod runs;

use std::fmt;

pub use labels::{compare_labels, LabelComparison, SpeedupRow};
pub use runs::{compare_runs, ComparisonRow, RunComparison};

/// A derived cell whose computation may be suppressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Derived {
    /// Computed value.
    Value(f64),
    /// Suppressed because the denominator was degenerate.
    NotANumber,
}

impl Derived {
    /// CSV marker for [`Derived::NotANumber`].
    pub const SENTINEL: &'static str = "NaN";

    /// The computed value, if not suppressed.
    pub fn value(self) -> Option<f64> {
        match self {
            Derived::Value(v) => Some(v),
            Derived::NotANumber => None,
        }
    }

    /// Whether the cell was suppressed.
    pub fn is_nan(self) -> bool {
        matches!(self, Derived::NotANumber)
    }
}

impl fmt::Display for Derived {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derived::Value(v) => write!(f, "{v}"),
            Derived::NotANumber => f.write_str(Self::SENTINEL),
        }
    }
}
