//! Tunables for comparisons and chart sizing.

/// Options for a two-run comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    pub(crate) label_a: String,
    pub(crate) label_b: String,
    pub(crate) sort_by_speedup: bool,
    pub(crate) precision: i32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            label_a: "A".to_string(),
            label_b: "B".to_string(),
            sort_by_speedup: false,
            precision: 3,
        }
    }
}

impl CompareOptions {
    /// Label used in column headers for the first run.
    pub fn label_a(self, label_a: impl Into<String>) -> Self {
        CompareOptions {
            label_a: label_a.into(),
            ..self
        }
    }

    /// Label used in column headers for the second run.
    pub fn label_b(self, label_b: impl Into<String>) -> Self {
        CompareOptions {
            label_b: label_b.into(),
            ..self
        }
    }

    /// Re-sort the result by descending speedup instead of by key.
    pub fn sort_by_speedup(self, sort_by_speedup: bool) -> Self {
        CompareOptions {
            sort_by_speedup,
            ..self
        }
    }

    /// Decimal places kept in derived columns.
    pub fn precision(self, precision: i32) -> Self {
        CompareOptions { precision, ..self }
    }
}

/// Canvas sizing for a chart collaborator, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub(crate) width: f64,
    pub(crate) row_height: f64,
    pub(crate) min_height: f64,
    pub(crate) dpi: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::run_comparison()
    }
}

impl ChartOptions {
    /// Single-run bar chart of total time per instance.
    pub fn single_run() -> Self {
        ChartOptions {
            width: 12.0,
            row_height: 0.25,
            min_height: 5.0,
            dpi: 150,
        }
    }

    /// Two-panel speedup chart of a label comparison.
    pub fn label_comparison() -> Self {
        ChartOptions {
            width: 15.0,
            row_height: 0.75,
            min_height: 5.0,
            dpi: 150,
        }
    }

    /// Speedup chart of a two-run comparison.
    pub fn run_comparison() -> Self {
        ChartOptions {
            width: 15.0,
            row_height: 0.25,
            min_height: 5.0,
            dpi: 150,
        }
    }

    /// Canvas width.
    pub fn width(self, width: f64) -> Self {
        ChartOptions { width, ..self }
    }

    /// Height contributed by each displayed category.
    pub fn row_height(self, row_height: f64) -> Self {
        ChartOptions { row_height, ..self }
    }

    /// Lower bound on the canvas height.
    pub fn min_height(self, min_height: f64) -> Self {
        ChartOptions { min_height, ..self }
    }

    /// Output resolution hint.
    pub fn dpi(self, dpi: u32) -> Self {
        ChartOptions { dpi, ..self }
    }
}
