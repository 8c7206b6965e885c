//! Flat per-log metric record and the column schema shared by all tables.
//!
//! Fields come in two accumulation classes. [`SumField`]s are running totals
//! over every matching line and start at zero; [`LastField`]s are overwritten
//! by each match and stay absent when nothing matched. The two classes are
//! stored separately so a never-seen value can't masquerade as zero.

use std::fmt;

use crate::identity::Identity;

/// Metrics accumulated by summing every occurrence within one log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SumField {
    /// Wall time reported by each branch-and-bound summary.
    OptimizeTime,
    /// Explored branch-and-bound nodes.
    Nodes,
    /// Simplex iterations over all branch-and-bound runs.
    SimplexIterations,
    /// Root relaxation iterations.
    RootIterations,
    /// Root relaxation time.
    RootTime,
    /// Lines reporting a violated transmission limit ("MW overflow").
    TransmissionCount,
    /// Time spent verifying transmission limits.
    TransmissionTime,
    /// Number of transmission limit verifications.
    TransmissionCalls,
}

impl SumField {
    /// Number of summed fields.
    pub const COUNT: usize = 8;

    /// All summed fields in declaration order.
    pub const ALL: [SumField; Self::COUNT] = [
        SumField::OptimizeTime,
        SumField::Nodes,
        SumField::SimplexIterations,
        SumField::RootIterations,
        SumField::RootTime,
        SumField::TransmissionCount,
        SumField::TransmissionTime,
        SumField::TransmissionCalls,
    ];

    /// Whether captured values are truncated to integers.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            SumField::Nodes
                | SumField::SimplexIterations
                | SumField::RootIterations
                | SumField::TransmissionCount
                | SumField::TransmissionCalls
        )
    }
}

/// Metrics where the last matching line in the log wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LastField {
    /// Time to read the instance.
    ReadTime,
    /// Time to build the optimization model.
    ModelTime,
    /// Time to compute the sensitivity factors (ISF & LODF).
    IsfTime,
    /// Total time reported by the harness.
    TotalTime,
    /// Time spent in user callbacks.
    CallbackTime,
    /// Number of user callback invocations.
    CallbackCalls,
    /// Final relative gap in percent, rounded to three decimals.
    Gap,
    /// Best objective value found.
    PrimalBound,
    /// Best bound proven.
    DualBound,
    /// Objective of the root relaxation.
    RootValue,
    /// Rows of the original model.
    RowsOrig,
    /// Columns of the original model.
    ColsOrig,
    /// Nonzeros of the original model.
    NonzerosOrig,
    /// Rows after presolve.
    RowsPresolved,
    /// Columns after presolve.
    ColsPresolved,
    /// Nonzeros after presolve.
    NonzerosPresolved,
    /// Binary variables after presolve.
    BinVars,
    /// Continuous variables after presolve.
    ContVars,
}

impl LastField {
    /// Number of last-wins fields.
    pub const COUNT: usize = 18;

    /// All last-wins fields in declaration order.
    pub const ALL: [LastField; Self::COUNT] = [
        LastField::ReadTime,
        LastField::ModelTime,
        LastField::IsfTime,
        LastField::TotalTime,
        LastField::CallbackTime,
        LastField::CallbackCalls,
        LastField::Gap,
        LastField::PrimalBound,
        LastField::DualBound,
        LastField::RootValue,
        LastField::RowsOrig,
        LastField::ColsOrig,
        LastField::NonzerosOrig,
        LastField::RowsPresolved,
        LastField::ColsPresolved,
        LastField::NonzerosPresolved,
        LastField::BinVars,
        LastField::ContVars,
    ];

    /// Whether captured values are truncated to integers.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            LastField::CallbackCalls
                | LastField::RowsOrig
                | LastField::ColsOrig
                | LastField::NonzerosOrig
                | LastField::RowsPresolved
                | LastField::ColsPresolved
                | LastField::NonzerosPresolved
                | LastField::BinVars
                | LastField::ContVars
        )
    }
}

/// A numeric column of the benchmark table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// Column backed by a summed field.
    Sum(SumField),
    /// Column backed by a last-wins field.
    Last(LastField),
    /// Bus count of the instance. Never populated; always zero.
    Buses,
}

impl Column {
    /// Number of metric columns.
    pub const COUNT: usize = SumField::COUNT + LastField::COUNT + 1;

    /// Metric columns in the order they are written to CSV.
    pub const ALL: [Column; Self::COUNT] = [
        Column::Sum(SumField::OptimizeTime),
        Column::Last(LastField::ReadTime),
        Column::Last(LastField::ModelTime),
        Column::Last(LastField::IsfTime),
        Column::Last(LastField::TotalTime),
        Column::Last(LastField::CallbackTime),
        Column::Last(LastField::CallbackCalls),
        Column::Last(LastField::Gap),
        Column::Sum(SumField::Nodes),
        Column::Sum(SumField::SimplexIterations),
        Column::Last(LastField::PrimalBound),
        Column::Last(LastField::DualBound),
        Column::Sum(SumField::RootIterations),
        Column::Sum(SumField::RootTime),
        Column::Last(LastField::RootValue),
        Column::Last(LastField::RowsOrig),
        Column::Last(LastField::ColsOrig),
        Column::Last(LastField::NonzerosOrig),
        Column::Last(LastField::RowsPresolved),
        Column::Last(LastField::ColsPresolved),
        Column::Last(LastField::NonzerosPresolved),
        Column::Last(LastField::BinVars),
        Column::Last(LastField::ContVars),
        Column::Buses,
        Column::Sum(SumField::TransmissionCount),
        Column::Sum(SumField::TransmissionTime),
        Column::Sum(SumField::TransmissionCalls),
    ];

    /// Optimization time column, the input of every speedup computation.
    pub const OPTIMIZATION_TIME: Column = Column::Sum(SumField::OptimizeTime);
    /// Primal bound column, the input of value drift computations.
    pub const PRIMAL_BOUND: Column = Column::Last(LastField::PrimalBound);
    /// Total time column, plotted for single-run reports.
    pub const TOTAL_TIME: Column = Column::Last(LastField::TotalTime);

    /// Human-readable CSV header, with units where they apply.
    pub fn header(self) -> &'static str {
        match self {
            Column::Sum(field) => match field {
                SumField::OptimizeTime => "Optimization time (s)",
                SumField::Nodes => "B&B Nodes",
                SumField::SimplexIterations => "Simplex iterations",
                SumField::RootIterations => "Root relaxation iterations",
                SumField::RootTime => "Root relaxation time",
                SumField::TransmissionCount => "Transmission screening constraints",
                SumField::TransmissionTime => "Transmission screening time",
                SumField::TransmissionCalls => "Transmission screening calls",
            },
            Column::Last(field) => match field {
                LastField::ReadTime => "Read instance time (s)",
                LastField::ModelTime => "Model construction time (s)",
                LastField::IsfTime => "ISF & LODF computation time (s)",
                LastField::TotalTime => "Total time (s)",
                LastField::CallbackTime => "User-callback time",
                LastField::CallbackCalls => "User-callback calls",
                LastField::Gap => "Gap (%)",
                LastField::PrimalBound => "Primal bound",
                LastField::DualBound => "Dual bound",
                LastField::RootValue => "Root relaxation value",
                LastField::RowsOrig => "Rows",
                LastField::ColsOrig => "Cols",
                LastField::NonzerosOrig => "Nonzeros",
                LastField::RowsPresolved => "Rows (presolved)",
                LastField::ColsPresolved => "Cols (presolved)",
                LastField::NonzerosPresolved => "Nonzeros (presolved)",
                LastField::BinVars => "Bin vars (presolved)",
                LastField::ContVars => "Cont vars (presolved)",
            },
            Column::Buses => "Buses",
        }
    }

    /// Look up a column by its CSV header.
    pub fn from_header(header: &str) -> Option<Column> {
        Self::ALL.into_iter().find(|c| c.header() == header)
    }

    /// Whether values in this column are integral counts.
    pub fn is_count(self) -> bool {
        match self {
            Column::Sum(field) => field.is_count(),
            Column::Last(field) => field.is_count(),
            Column::Buses => true,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Metrics extracted from a single log file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    identity: Identity,
    sums: [f64; SumField::COUNT],
    last: [Option<f64>; LastField::COUNT],
}

impl LogRecord {
    /// Record with every summed field at zero and every last-wins field absent.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            sums: [0.0; SumField::COUNT],
            last: [None; LastField::COUNT],
        }
    }

    /// Identity supplied by the caller.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current total of a summed field.
    pub fn sum(&self, field: SumField) -> f64 {
        self.sums[field as usize]
    }

    /// Last matched value of a last-wins field, if any line matched.
    pub fn last(&self, field: LastField) -> Option<f64> {
        self.last[field as usize]
    }

    /// Vestigial bus count, kept for schema compatibility.
    pub fn buses(&self) -> u32 {
        0
    }

    /// Value of a table column; summed columns are always present.
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Sum(field) => Some(self.sum(field)),
            Column::Last(field) => self.last(field),
            Column::Buses => Some(f64::from(self.buses())),
        }
    }

    pub(crate) fn add(&mut self, field: SumField, value: f64) {
        self.sums[field as usize] += value;
    }

    pub(crate) fn set(&mut self, field: LastField, value: f64) {
        self.last[field as usize] = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fresh_record_has_zero_sums_and_absent_last() {
        let record = LogRecord::new(Identity::new("g", "i", "s"));
        for field in SumField::ALL {
            assert_eq!(record.sum(field), 0.0);
        }
        for field in LastField::ALL {
            assert_eq!(record.last(field), None);
        }
        assert_eq!(record.value(Column::Buses), Some(0.0));
    }

    #[test]
    fn column_headers_are_unique_and_reversible() {
        let headers: HashSet<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(headers.len(), Column::COUNT);
        for column in Column::ALL {
            assert_eq!(Column::from_header(column.header()), Some(column));
        }
        assert_eq!(Column::from_header("Speedup"), None);
    }

    #[test]
    fn field_tables_match_discriminants() {
        for (idx, field) in SumField::ALL.iter().enumerate() {
            assert_eq!(*field as usize, idx);
        }
        for (idx, field) in LastField::ALL.iter().enumerate() {
            assert_eq!(*field as usize, idx);
        }
    }
}
