//! Chart inputs handed to an external renderer.
//!
//! Nothing here draws. A [`ChartSpec`] carries the bars to plot (one per
//! table row, so the renderer can compute its own means and error bars), the
//! axis columns, and a canvas size derived from the number of categories.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    error::{BenchError, Result},
    observability::log_info,
    option::ChartOptions,
    record::Column,
    table::Table,
};

/// Canvas size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
}

impl Canvas {
    /// `row_height * k`, never below the configured minimum.
    pub fn sized(options: &ChartOptions, k: usize) -> Self {
        Canvas {
            width: options.width,
            height: (options.row_height * k as f64).max(options.min_height),
        }
    }
}

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// Category axis value.
    pub category: String,
    /// Bar length.
    pub value: f64,
    /// Optional colour grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<String>,
}

/// One horizontal bar plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    /// Header of the category column.
    pub category_column: String,
    /// Header of the value column.
    pub value_column: String,
    /// Header of the hue column, if bars are coloured by group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue_column: Option<String>,
    /// Number of distinct categories, i.e. the panel's share of the canvas.
    pub categories: usize,
    /// Bars in plotting order.
    pub bars: Vec<Bar>,
}

impl ChartPanel {
    /// Panel over `bars`, counting distinct categories.
    pub fn new(
        category_column: impl Into<String>,
        value_column: impl Into<String>,
        hue_column: Option<String>,
        bars: Vec<Bar>,
    ) -> Self {
        let mut seen: Vec<&str> = bars.iter().map(|b| b.category.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        let categories = seen.len();
        Self {
            category_column: category_column.into(),
            value_column: value_column.into(),
            hue_column,
            categories,
            bars,
        }
    }
}

/// Full chart description: panels stacked vertically sharing the value axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Figure title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Panels from top to bottom.
    pub panels: Vec<ChartPanel>,
    /// Dashed vertical reference line, e.g. speedup 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_line: Option<f64>,
    /// Canvas size hint.
    pub canvas: Canvas,
    /// Resolution hint.
    pub dpi: u32,
}

/// Single-run chart: total time per instance, coloured by group.
///
/// The canvas grows with `instances * groups`, one bar slot per pair.
pub fn table_chart(table: &Table, options: &ChartOptions) -> ChartSpec {
    let mut rows: Vec<_> = table.rows().iter().collect();
    rows.sort_by(|a, b| {
        (&a.identity.group, &a.identity.instance).cmp(&(&b.identity.group, &b.identity.instance))
    });
    let bars = rows
        .into_iter()
        .filter_map(|row| {
            row.get(Column::TOTAL_TIME).map(|value| Bar {
                category: row.identity.instance.clone(),
                value,
                hue: Some(row.identity.group.clone()),
            })
        })
        .collect();
    let k = table.instances().len() * table.groups().len();
    ChartSpec {
        title: None,
        panels: vec![ChartPanel::new(
            "Instance",
            Column::TOTAL_TIME.header(),
            Some("Group".to_string()),
            bars,
        )],
        reference_line: None,
        canvas: Canvas::sized(options, k),
        dpi: options.dpi,
    }
}

/// Consumer of chart specifications.
pub trait ChartSink {
    /// Render or persist `spec` under the artifact name `name`.
    fn render(&mut self, name: &str, spec: &ChartSpec) -> Result<()>;
}

/// Writes each chart as `<dir>/<name>.chart.json` for an external plotter.
#[derive(Debug, Clone)]
pub struct JsonChartSink {
    dir: PathBuf,
}

impl JsonChartSink {
    /// Sink writing into `dir`, created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the sink uses for `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.chart.json"))
    }
}

impl ChartSink for JsonChartSink {
    fn render(&mut self, name: &str, spec: &ChartSpec) -> Result<()> {
        ensure_dir(&self.dir)?;
        let path = self.path_for(name);
        let buf = serde_json::to_vec_pretty(spec)?;
        fs::write(&path, buf).map_err(|err| BenchError::io(&path, err))?;
        log_info!(
            component = "chart",
            event = "artifact_written",
            path = %path.display(),
            panels = spec.panels.len(),
            height = spec.canvas.height,
        );
        Ok(())
    }
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|err| BenchError::io(dir, err))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{identity::Identity, table::Row};

    #[test]
    fn canvas_respects_minimum() {
        let opts = ChartOptions::run_comparison();
        assert_eq!(Canvas::sized(&opts, 0).height, 5.0);
        assert_eq!(Canvas::sized(&opts, 40).height, 10.0);
        assert_eq!(Canvas::sized(&opts, 40).width, 15.0);
    }

    #[test]
    fn table_chart_sizes_by_instances_times_groups() {
        let table = Table::new(vec![
            Row::new(Identity::new("B", "c1", "0")).with(Column::TOTAL_TIME, 3.0),
            Row::new(Identity::new("A", "c1", "0")).with(Column::TOTAL_TIME, 2.0),
            Row::new(Identity::new("A", "c2", "0")),
        ]);
        let opts = ChartOptions::single_run().min_height(0.0);
        let spec = table_chart(&table, &opts);
        assert_eq!(spec.canvas.height, 0.25 * 4.0);
        let panel = &spec.panels[0];
        assert_eq!(panel.bars.len(), 2);
        assert_eq!(panel.bars[0].hue.as_deref(), Some("A"));
        assert_eq!(panel.categories, 1);
    }

    #[test]
    fn single_run_preset_keeps_minimum_height() {
        let table = Table::new(vec![
            Row::new(Identity::new("A", "c1", "0")).with(Column::TOTAL_TIME, 2.0),
            Row::new(Identity::new("B", "c2", "0")).with(Column::TOTAL_TIME, 1.0),
        ]);
        let spec = table_chart(&table, &ChartOptions::single_run());
        assert_eq!(spec.canvas.width, 12.0);
        assert_eq!(spec.canvas.height, 5.0);
    }

    #[test]
    fn json_sink_writes_named_artifact() {
        let dir = TempDir::new().unwrap();
        let mut sink = JsonChartSink::new(dir.path().join("tables"));
        let spec = table_chart(&Table::default(), &ChartOptions::single_run());
        sink.render("benchmark", &spec).unwrap();
        let written = fs::read_to_string(sink.path_for("benchmark")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["canvas"]["width"], 12.0);
        assert_eq!(json["panels"][0]["value_column"], "Total time (s)");
    }
}
