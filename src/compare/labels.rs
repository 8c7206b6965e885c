use std::collections::{BTreeMap, BTreeSet};

use crate::{
    chart::{Bar, Canvas, ChartPanel, ChartSpec},
    identity::Identity,
    observability::{log_info, log_warn},
    option::ChartOptions,
    record::Column,
    table::Table,
};

/// Speedup of one (instance, sample) between two run labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedupRow {
    /// Instance name.
    pub instance: String,
    /// Sample name.
    pub sample: String,
    /// Averaged optimization time under the first label.
    pub time_1: f64,
    /// Averaged optimization time under the second label.
    pub time_2: f64,
    /// `time_1 / time_2`.
    pub speedup: f64,
    /// Instance prefix before the first `/`, used for the roll-up panel.
    pub group: String,
}

/// Result of [`compare_labels`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelComparison {
    /// First label.
    pub label_1: String,
    /// Second label.
    pub label_2: String,
    /// Rows sorted by (instance, sample).
    pub rows: Vec<SpeedupRow>,
}

impl LabelComparison {
    /// Header of the first label's time column.
    pub fn time_1_header(&self) -> String {
        format!("{} time (s)", self.label_1)
    }

    /// Header of the second label's time column.
    pub fn time_2_header(&self) -> String {
        format!("{} time (s)", self.label_2)
    }

    /// Distinct instances.
    pub fn instance_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.instance.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Distinct coarse groups.
    pub fn group_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.group.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Display labels across both panels; sizes the canvas.
    pub fn k(&self) -> usize {
        self.instance_count() + self.group_count()
    }

    /// Speedup by instance over speedup by coarse group, sharing the x axis.
    pub fn chart(&self, options: &ChartOptions) -> ChartSpec {
        ChartSpec {
            title: Some(format!("{} vs {}", self.label_1, self.label_2)),
            panels: vec![
                ChartPanel::new("Instance", "Speedup", None, self.bars(|r| &r.instance)),
                ChartPanel::new("Group", "Speedup", None, self.bars(|r| &r.group)),
            ],
            reference_line: Some(1.0),
            canvas: Canvas::sized(options, self.k()),
            dpi: options.dpi,
        }
    }

    fn bars(&self, category: fn(&SpeedupRow) -> &String) -> Vec<Bar> {
        self.rows
            .iter()
            .map(|r| Bar {
                category: category(r).clone(),
                value: r.speedup,
                hue: None,
            })
            .collect()
    }
}

/// Compare the optimization time of two run labels within one table.
///
/// The table's `group` identity acts as the run label. Times are averaged per
/// (instance, sample) under each label and inner-joined; pairs where either
/// side is missing or not strictly positive are dropped. A label with no rows
/// yields an empty comparison.
pub fn compare_labels(table: &Table, label_1: &str, label_2: &str) -> LabelComparison {
    let side_1 = averaged_times(table, label_1);
    let side_2 = averaged_times(table, label_2);

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for (key, time_1) in &side_1 {
        let Some(time_2) = side_2.get(key) else {
            dropped += 1;
            continue;
        };
        let (Some(time_1), Some(time_2)) = (*time_1, *time_2) else {
            dropped += 1;
            continue;
        };
        if time_1 <= 0.0 || time_2 <= 0.0 {
            dropped += 1;
            continue;
        }
        rows.push(SpeedupRow {
            instance: key.0.clone(),
            sample: key.1.clone(),
            time_1,
            time_2,
            speedup: time_1 / time_2,
            group: coarse_group(&key.0).to_string(),
        });
    }
    rows.sort_by(|a, b| (&a.instance, &a.sample).cmp(&(&b.instance, &b.sample)));

    log_info!(
        component = "compare",
        event = "labels_compared",
        label_1 = label_1,
        label_2 = label_2,
        rows = rows.len(),
        dropped = dropped,
    );

    LabelComparison {
        label_1: label_1.to_string(),
        label_2: label_2.to_string(),
        rows,
    }
}

/// Mean optimization time per (instance, sample), ascending by key.
fn averaged_times(table: &Table, label: &str) -> BTreeMap<(String, String), Option<f64>> {
    let filtered = table.filter_group(label);
    if filtered.is_empty() {
        log_warn!(
            component = "compare",
            event = "label_absent",
            label = label,
        );
    }
    filtered
        .aggregate_columns(&[Column::OPTIMIZATION_TIME])
        .into_iter()
        .map(|row| {
            let Identity {
                instance, sample, ..
            } = row.identity.clone();
            ((instance, sample), row.get(Column::OPTIMIZATION_TIME))
        })
        .collect()
}

fn coarse_group(instance: &str) -> &str {
    instance.split('/').next().unwrap_or(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn row(label: &str, instance: &str, sample: &str, time: f64) -> Row {
        Row::new(Identity::new(label, instance, sample)).with(Column::OPTIMIZATION_TIME, time)
    }

    #[test]
    fn computes_speedup_per_instance_sample() {
        let table = Table::new(vec![
            row("base", "pglib/case14", "0", 10.0),
            row("base", "pglib/case14", "0", 30.0),
            row("cand", "pglib/case14", "0", 5.0),
            row("base", "matpower/case30", "1", 8.0),
            row("cand", "matpower/case30", "1", 2.0),
        ]);
        let cmp = compare_labels(&table, "base", "cand");
        assert_eq!(cmp.rows.len(), 2);
        assert_eq!(cmp.rows[0].instance, "matpower/case30");
        assert_eq!(cmp.rows[0].group, "matpower");
        assert_eq!(cmp.rows[0].speedup, 4.0);
        assert_eq!(cmp.rows[1].time_1, 20.0);
        assert_eq!(cmp.rows[1].speedup, 4.0);
        assert_eq!(cmp.k(), 4);
        assert_eq!(cmp.time_1_header(), "base time (s)");
    }

    #[test]
    fn drops_non_positive_and_one_sided_pairs() {
        let table = Table::new(vec![
            row("base", "c1", "0", 0.0),
            row("cand", "c1", "0", 5.0),
            row("base", "c2", "0", 4.0),
            row("cand", "c2", "0", -1.0),
            row("base", "c3", "0", 4.0),
            row("cand", "c4", "0", 4.0),
            row("base", "c5", "0", 3.0),
            row("cand", "c5", "0", 1.5),
        ]);
        let cmp = compare_labels(&table, "base", "cand");
        let instances: Vec<&str> = cmp.rows.iter().map(|r| r.instance.as_str()).collect();
        assert_eq!(instances, vec!["c5"]);
        assert_eq!(cmp.rows[0].speedup, 2.0);
        assert_eq!(cmp.rows[0].group, "c5");
    }

    #[test]
    fn absent_label_gives_empty_comparison() {
        let table = Table::new(vec![row("base", "c1", "0", 1.0)]);
        let cmp = compare_labels(&table, "base", "missing");
        assert!(cmp.rows.is_empty());
        assert_eq!(cmp.label_2, "missing");
        assert_eq!(cmp.k(), 0);
        assert_eq!(cmp.chart(&ChartOptions::label_comparison()).canvas.height, 5.0);
    }

    #[test]
    fn chart_has_two_panels_and_reference_line() {
        let table = Table::new(vec![
            row("a", "g1/x", "0", 2.0),
            row("b", "g1/x", "0", 1.0),
            row("a", "g1/y", "0", 2.0),
            row("b", "g1/y", "0", 4.0),
        ]);
        let cmp = compare_labels(&table, "a", "b");
        let spec = cmp.chart(&ChartOptions::label_comparison());
        assert_eq!(spec.title.as_deref(), Some("a vs b"));
        assert_eq!(spec.panels[0].categories, 2);
        assert_eq!(spec.panels[1].categories, 1);
        assert_eq!(spec.reference_line, Some(1.0));
        assert_eq!(spec.canvas.height, 5.0);
    }
}
