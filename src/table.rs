//! In-memory benchmark tables and per-key averaging.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    identity::Identity,
    record::{Column, LogRecord},
};

/// One table row: an identity plus whichever metric cells are present.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Row identity.
    pub identity: Identity,
    values: BTreeMap<Column, f64>,
}

impl Row {
    /// Row with no metric cells.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            values: BTreeMap::new(),
        }
    }

    /// Cell value, `None` when missing.
    pub fn get(&self, column: Column) -> Option<f64> {
        self.values.get(&column).copied()
    }

    /// Set a cell; non-finite values are stored as missing.
    pub fn set(&mut self, column: Column, value: f64) {
        if value.is_finite() {
            self.values.insert(column, value);
        } else {
            self.values.remove(&column);
        }
    }

    /// Builder-style [`Row::set`].
    pub fn with(mut self, column: Column, value: f64) -> Self {
        self.set(column, value);
        self
    }
}

impl From<&LogRecord> for Row {
    fn from(record: &LogRecord) -> Self {
        let mut row = Row::new(record.identity().clone());
        for column in Column::ALL {
            if let Some(value) = record.value(column) {
                row.set(column, value);
            }
        }
        row
    }
}

/// Mean of each metric column over the rows sharing one identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    /// Shared identity.
    pub identity: Identity,
    /// Number of source rows folded into this one.
    pub sources: usize,
    values: BTreeMap<Column, f64>,
}

impl AggregatedRow {
    /// Averaged cell; missing when no source row had the column.
    pub fn get(&self, column: Column) -> Option<f64> {
        self.values.get(&column).copied()
    }
}

/// Ordered collection of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Table over `rows`, keeping their order.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// One row per record, in record order.
    pub fn from_records(records: &[LogRecord]) -> Self {
        Self::new(records.iter().map(Row::from).collect())
    }

    /// Rows in table order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct `group` values, ascending.
    pub fn groups(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.identity.group.as_str()).collect()
    }

    /// Distinct `instance` values, ascending.
    pub fn instances(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .map(|r| r.identity.instance.as_str())
            .collect()
    }

    /// Rows whose `group` equals `group`.
    pub fn filter_group(&self, group: &str) -> Table {
        Table::new(
            self.rows
                .iter()
                .filter(|r| r.identity.group == group)
                .cloned()
                .collect(),
        )
    }

    /// Order used for the single-run report: stable by (group, buses).
    pub fn sorted_for_report(mut self) -> Self {
        self.rows.sort_by(|a, b| {
            let buses = |r: &Row| r.get(Column::Buses).unwrap_or(0.0);
            a.identity
                .group
                .cmp(&b.identity.group)
                .then(buses(a).total_cmp(&buses(b)))
        });
        self
    }

    /// Average every metric column per identity key.
    pub fn aggregate(&self) -> Vec<AggregatedRow> {
        self.aggregate_columns(&Column::ALL)
    }

    /// Average the given columns per identity key, ascending by key.
    ///
    /// Missing cells are skipped, so a column averages over the rows where it
    /// is present and stays missing when no row has it.
    pub fn aggregate_columns(&self, columns: &[Column]) -> Vec<AggregatedRow> {
        let mut groups: BTreeMap<&Identity, (usize, BTreeMap<Column, (f64, usize)>)> =
            BTreeMap::new();
        for row in &self.rows {
            let (sources, sums) = groups.entry(&row.identity).or_default();
            *sources += 1;
            for column in columns {
                if let Some(value) = row.get(*column) {
                    let slot = sums.entry(*column).or_insert((0.0, 0));
                    slot.0 += value;
                    slot.1 += 1;
                }
            }
        }

        groups
            .into_iter()
            .map(|(identity, (sources, sums))| AggregatedRow {
                identity: identity.clone(),
                sources,
                values: sums
                    .into_iter()
                    .map(|(column, (sum, n))| (column, sum / n as f64))
                    .collect(),
            })
            .collect()
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LastField;

    fn row(group: &str, instance: &str, sample: &str, time: f64) -> Row {
        Row::new(Identity::new(group, instance, sample)).with(Column::OPTIMIZATION_TIME, time)
    }

    #[test]
    fn aggregate_averages_duplicate_keys() {
        let table = Table::new(vec![
            row("A", "case1", "s1", 10.0),
            row("A", "case1", "s1", 20.0).with(Column::PRIMAL_BOUND, 5.0),
            row("A", "case1", "s2", 7.0),
        ]);
        let agg = table.aggregate();
        assert_eq!(agg.len(), 2);
        assert_eq!(agg[0].identity, Identity::new("A", "case1", "s1"));
        assert_eq!(agg[0].sources, 2);
        assert_eq!(agg[0].get(Column::OPTIMIZATION_TIME), Some(15.0));
        assert_eq!(agg[0].get(Column::PRIMAL_BOUND), Some(5.0));
        assert_eq!(agg[1].get(Column::PRIMAL_BOUND), None);
    }

    #[test]
    fn aggregate_columns_restricts_output() {
        let table = Table::new(vec![row("A", "c", "s", 1.0).with(Column::PRIMAL_BOUND, 2.0)]);
        let agg = table.aggregate_columns(&[Column::PRIMAL_BOUND]);
        assert_eq!(agg[0].get(Column::OPTIMIZATION_TIME), None);
        assert_eq!(agg[0].get(Column::PRIMAL_BOUND), Some(2.0));
    }

    #[test]
    fn sorted_for_report_is_stable_by_group() {
        let table = Table::new(vec![
            row("B", "x", "1", 1.0),
            row("A", "z", "1", 1.0),
            row("B", "a", "1", 1.0),
            row("A", "y", "1", 1.0),
        ])
        .sorted_for_report();
        let order: Vec<&str> = table
            .rows()
            .iter()
            .map(|r| r.identity.instance.as_str())
            .collect();
        assert_eq!(order, vec!["z", "y", "x", "a"]);
    }

    #[test]
    fn record_conversion_keeps_absent_cells_missing() {
        let record = LogRecord::new(Identity::new("A", "c", "s"));
        let row = Row::from(&record);
        assert_eq!(row.get(Column::OPTIMIZATION_TIME), Some(0.0));
        assert_eq!(row.get(Column::Last(LastField::Gap)), None);
        assert_eq!(row.get(Column::Buses), Some(0.0));
    }

    #[test]
    fn non_finite_cells_are_missing() {
        let r = row("A", "c", "s", f64::NAN);
        assert_eq!(r.get(Column::OPTIMIZATION_TIME), None);
    }
}
