use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use super::Derived;
use crate::{
    chart::{Bar, Canvas, ChartPanel, ChartSpec},
    extractor::round_to,
    identity::Identity,
    observability::{log_debug, log_info, log_warn},
    option::{ChartOptions, CompareOptions},
    record::Column,
    table::Table,
};

/// One identity key of a two-run comparison.
///
/// Run-side cells are missing when the key is absent from that run's table or
/// the run never reported the metric. Derived cells are missing when an input
/// is missing and [`Derived::NotANumber`] when the denominator is degenerate.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    /// Shared identity key.
    pub identity: Identity,
    /// Averaged optimization time of run A.
    pub time_a: Option<f64>,
    /// Averaged optimization time of run B.
    pub time_b: Option<f64>,
    /// Averaged primal bound of run A.
    pub value_a: Option<f64>,
    /// Averaged primal bound of run B.
    pub value_b: Option<f64>,
    /// `time_a / time_b`.
    pub speedup: Option<Derived>,
    /// `time_b - time_a`.
    pub time_diff: Option<Derived>,
    /// `(value_b - value_a) / value_a * 100`.
    pub value_diff_pct: Option<Derived>,
}

impl ComparisonRow {
    /// Display label `group/instance`.
    pub fn name(&self) -> String {
        self.identity.name()
    }

    /// Whether the key is present in only one of the two runs.
    pub fn is_one_sided(&self) -> bool {
        let in_a = self.time_a.is_some() || self.value_a.is_some();
        let in_b = self.time_b.is_some() || self.value_b.is_some();
        in_a != in_b
    }

    fn derive(identity: Identity, a: Option<&Sides>, b: Option<&Sides>, precision: i32) -> Self {
        let time_a = a.and_then(|s| s.time);
        let time_b = b.and_then(|s| s.time);
        let value_a = a.and_then(|s| s.value);
        let value_b = b.and_then(|s| s.value);

        let time_ratio = |f: fn(f64, f64) -> f64| match (time_a, time_b) {
            (_, Some(tb)) if tb <= 0.0 => Some(Derived::NotANumber),
            (Some(ta), Some(tb)) => Some(Derived::Value(round_to(f(ta, tb), precision))),
            _ => None,
        };
        let speedup = time_ratio(|ta, tb| ta / tb);
        let time_diff = time_ratio(|ta, tb| tb - ta);
        let value_diff_pct = match (value_a, value_b) {
            (Some(va), Some(_)) if va == 0.0 => Some(Derived::NotANumber),
            (Some(va), Some(vb)) => Some(Derived::Value(round_to(
                (vb - va) / va * 100.0,
                precision,
            ))),
            _ => None,
        };

        Self {
            identity,
            time_a,
            time_b,
            value_a,
            value_b,
            speedup,
            time_diff,
            value_diff_pct,
        }
    }
}

/// Result of [`compare_runs`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunComparison {
    /// Label of run A, used in column headers.
    pub label_a: String,
    /// Label of run B, used in column headers.
    pub label_b: String,
    /// Comparison rows in presentation order.
    pub rows: Vec<ComparisonRow>,
}

impl RunComparison {
    /// Distinct display labels; sizes the canvas.
    pub fn k(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.name())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Rows whose speedup was suppressed.
    pub fn suppressed(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.speedup.is_some_and(Derived::is_nan))
            .count()
    }

    /// Rows present in only one run.
    pub fn one_sided(&self) -> usize {
        self.rows.iter().filter(|r| r.is_one_sided()).count()
    }

    /// Speedup by display label; suppressed and missing cells are not plotted.
    pub fn chart(&self, options: &ChartOptions) -> ChartSpec {
        let bars = self
            .rows
            .iter()
            .filter_map(|r| {
                r.speedup.and_then(Derived::value).map(|value| Bar {
                    category: r.name(),
                    value,
                    hue: None,
                })
            })
            .collect();
        ChartSpec {
            title: Some(format!("{} vs {}", self.label_a, self.label_b)),
            panels: vec![ChartPanel::new("Name", "Speedup", None, bars)],
            reference_line: Some(1.0),
            canvas: Canvas::sized(options, self.k()),
            dpi: options.dpi,
        }
    }
}

#[derive(Debug, Default)]
struct Sides {
    time: Option<f64>,
    value: Option<f64>,
}

const COMPARED: [Column; 2] = [Column::OPTIMIZATION_TIME, Column::PRIMAL_BOUND];

/// Align two run tables on (group, instance, sample) and derive speedup,
/// time difference and primal bound drift.
///
/// Each table is first averaged per key. Keys present on one side only are
/// kept with missing derived cells. A non-positive run-B time turns speedup and
/// time difference into [`Derived::NotANumber`].
pub fn compare_runs(a: &Table, b: &Table, options: &CompareOptions) -> RunComparison {
    let side_a = averaged(a);
    let side_b = averaged(b);

    let keys: BTreeSet<&Identity> = side_a.keys().chain(side_b.keys()).collect();
    let mut rows: Vec<ComparisonRow> = keys
        .into_iter()
        .map(|key| {
            ComparisonRow::derive(
                key.clone(),
                side_a.get(key),
                side_b.get(key),
                options.precision,
            )
        })
        .collect();

    if options.sort_by_speedup {
        rows.sort_by(|x, y| descending_speedup(x, y));
    }

    let comparison = RunComparison {
        label_a: options.label_a.clone(),
        label_b: options.label_b.clone(),
        rows,
    };

    let suppressed = comparison.suppressed();
    if suppressed > 0 {
        log_debug!(
            component = "compare",
            event = "denominator_suppressed",
            rows = suppressed,
        );
    }
    let one_sided = comparison.one_sided();
    if one_sided > 0 {
        log_warn!(
            component = "compare",
            event = "one_sided_keys",
            rows = one_sided,
        );
    }
    log_info!(
        component = "compare",
        event = "runs_compared",
        label_a = %comparison.label_a,
        label_b = %comparison.label_b,
        rows = comparison.rows.len(),
    );
    comparison
}

fn averaged(table: &Table) -> BTreeMap<Identity, Sides> {
    table
        .aggregate_columns(&COMPARED)
        .into_iter()
        .map(|row| {
            let sides = Sides {
                time: row.get(Column::OPTIMIZATION_TIME),
                value: row.get(Column::PRIMAL_BOUND),
            };
            (row.identity, sides)
        })
        .collect()
}

/// Highest speedup first; suppressed and missing speedups last, keyed order
/// preserved among ties.
fn descending_speedup(x: &ComparisonRow, y: &ComparisonRow) -> Ordering {
    let key = |r: &ComparisonRow| r.speedup.and_then(Derived::value);
    match (key(x), key(y)) {
        (Some(sx), Some(sy)) => sy.total_cmp(&sx),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn row(instance: &str, sample: &str, time: f64, value: f64) -> Row {
        Row::new(Identity::new("A", instance, sample))
            .with(Column::OPTIMIZATION_TIME, time)
            .with(Column::PRIMAL_BOUND, value)
    }

    #[test]
    fn derives_speedup_and_drift() {
        let a = Table::new(vec![row("case1", "s1", 10.0, 100.0), row("case1", "s2", 20.0, 100.0)]);
        let b = Table::new(vec![row("case1", "s1", 5.0, 100.0), row("case1", "s2", 5.0, 101.0)]);
        let cmp = compare_runs(&a, &b, &CompareOptions::default());
        assert_eq!(cmp.rows.len(), 2);
        assert_eq!(cmp.rows[0].speedup, Some(Derived::Value(2.0)));
        assert_eq!(cmp.rows[0].time_diff, Some(Derived::Value(-5.0)));
        assert_eq!(cmp.rows[0].value_diff_pct, Some(Derived::Value(0.0)));
        assert_eq!(cmp.rows[1].speedup, Some(Derived::Value(4.0)));
        assert_eq!(cmp.rows[1].value_diff_pct, Some(Derived::Value(1.0)));
        assert_eq!(cmp.k(), 1);
    }

    #[test]
    fn non_positive_denominator_is_sentinel() {
        let a = Table::new(vec![row("c", "0", 10.0, 1.0), row("c", "1", 10.0, 1.0)]);
        let b = Table::new(vec![row("c", "0", 0.0, 1.0), row("c", "1", -2.0, 1.0)]);
        let cmp = compare_runs(&a, &b, &CompareOptions::default());
        for r in &cmp.rows {
            assert_eq!(r.speedup, Some(Derived::NotANumber));
            assert_eq!(r.time_diff, Some(Derived::NotANumber));
            assert_eq!(r.value_diff_pct, Some(Derived::Value(0.0)));
        }
        assert_eq!(cmp.suppressed(), 2);
        assert!(cmp.chart(&ChartOptions::run_comparison()).panels[0]
            .bars
            .is_empty());
    }

    #[test]
    fn one_sided_keys_are_kept() {
        let a = Table::new(vec![row("c", "0", 10.0, 1.0), row("only-a", "0", 3.0, 1.0)]);
        let b = Table::new(vec![row("c", "0", 5.0, 1.0), row("only-b", "0", 3.0, 1.0)]);
        let cmp = compare_runs(&a, &b, &CompareOptions::default());
        let names: Vec<String> = cmp.rows.iter().map(|r| r.identity.instance.clone()).collect();
        assert_eq!(names, vec!["c", "only-a", "only-b"]);
        assert_eq!(cmp.rows[1].time_b, None);
        assert_eq!(cmp.rows[1].speedup, None);
        assert_eq!(cmp.rows[2].time_a, None);
        assert_eq!(cmp.rows[2].speedup, None);
        assert_eq!(cmp.one_sided(), 2);
    }

    #[test]
    fn zero_reference_value_suppresses_drift() {
        let a = Table::new(vec![row("c", "0", 1.0, 0.0)]);
        let b = Table::new(vec![row("c", "0", 1.0, 5.0)]);
        let cmp = compare_runs(&a, &b, &CompareOptions::default());
        assert_eq!(cmp.rows[0].value_diff_pct, Some(Derived::NotANumber));
    }

    #[test]
    fn sort_by_speedup_is_opt_in() {
        let a = Table::new(vec![
            row("a", "0", 2.0, 1.0),
            row("b", "0", 9.0, 1.0),
            row("c", "0", 4.0, 1.0),
            row("d", "0", 4.0, 1.0),
        ]);
        let b = Table::new(vec![
            row("a", "0", 1.0, 1.0),
            row("b", "0", 1.0, 1.0),
            row("c", "0", 0.0, 1.0),
            row("d", "0", 1.0, 1.0),
        ]);
        let keyed = compare_runs(&a, &b, &CompareOptions::default());
        let order = |c: &RunComparison| -> Vec<String> {
            c.rows.iter().map(|r| r.identity.instance.clone()).collect()
        };
        assert_eq!(order(&keyed), vec!["a", "b", "c", "d"]);

        let sorted = compare_runs(&a, &b, &CompareOptions::default().sort_by_speedup(true));
        assert_eq!(order(&sorted), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn derived_cells_are_rounded() {
        let a = Table::new(vec![row("c", "0", 1.0, 3.0)]);
        let b = Table::new(vec![row("c", "0", 3.0, 4.0)]);
        let cmp = compare_runs(&a, &b, &CompareOptions::default().precision(2));
        assert_eq!(cmp.rows[0].speedup, Some(Derived::Value(0.33)));
        assert_eq!(cmp.rows[0].value_diff_pct, Some(Derived::Value(33.33)));
    }
}
