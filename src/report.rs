//! Markdown summary of a two-run comparison.

use std::{collections::BTreeMap, fs, path::Path};

use crate::{
    chart::ensure_dir,
    compare::{Derived, RunComparison},
    error::{BenchError, Result},
    observability::log_info,
};

/// Per display-name means over the non-suppressed cells.
#[derive(Debug, Clone, PartialEq)]
pub struct NameSummary {
    /// Display label `group/instance`.
    pub name: String,
    /// Rows under this label.
    pub samples: usize,
    /// Mean speedup, if any row had one.
    pub mean_speedup: Option<f64>,
    /// Mean time difference in seconds.
    pub mean_time_diff: Option<f64>,
    /// Mean primal bound drift in percent.
    pub mean_value_diff_pct: Option<f64>,
}

/// Summaries ordered by display name.
pub fn summarize(comparison: &RunComparison) -> Vec<NameSummary> {
    #[derive(Default)]
    struct Acc {
        samples: usize,
        speedup: Vec<f64>,
        time_diff: Vec<f64>,
        value_diff: Vec<f64>,
    }

    let mut by_name: BTreeMap<String, Acc> = BTreeMap::new();
    for row in &comparison.rows {
        let acc = by_name.entry(row.name()).or_default();
        acc.samples += 1;
        let push = |out: &mut Vec<f64>, cell: Option<Derived>| {
            if let Some(v) = cell.and_then(Derived::value) {
                out.push(v);
            }
        };
        push(&mut acc.speedup, row.speedup);
        push(&mut acc.time_diff, row.time_diff);
        push(&mut acc.value_diff, row.value_diff_pct);
    }

    by_name
        .into_iter()
        .map(|(name, acc)| NameSummary {
            name,
            samples: acc.samples,
            mean_speedup: mean(&acc.speedup),
            mean_time_diff: mean(&acc.time_diff),
            mean_value_diff_pct: mean(&acc.value_diff),
        })
        .collect()
}

/// Render the comparison summary as Markdown.
pub fn render_markdown(comparison: &RunComparison) -> String {
    let summary = summarize(comparison);
    let mut out = String::new();
    out.push_str(&format!(
        "# {} vs {}\n\n",
        comparison.label_a, comparison.label_b
    ));
    out.push_str("## Overview\n\n");
    out.push_str(&format!("- compared rows: {}\n", comparison.rows.len()));
    out.push_str(&format!("- display names: {}\n", comparison.k()));
    out.push_str(&format!(
        "- suppressed speedups (non-positive {} time): {}\n",
        comparison.label_b,
        comparison.suppressed()
    ));
    out.push_str(&format!(
        "- rows present in one run only: {}\n\n",
        comparison.one_sided()
    ));

    out.push_str("## Summary by instance\n\n");
    if summary.is_empty() {
        out.push_str("_no rows to compare_\n");
        return out;
    }
    out.push_str("| Name | Samples | Speedup | Time Δ (s) | Value Δ (%) |\n");
    out.push_str("|---|---:|---:|---:|---:|\n");
    for row in &summary {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            row.name,
            row.samples,
            fmt_opt(row.mean_speedup, |v| format!("{v:.2}x")),
            fmt_opt(row.mean_time_diff, |v| format!("{v:+.2}")),
            fmt_opt(row.mean_value_diff_pct, |v| format!("{v:+.3}%")),
        ));
    }
    out
}

/// Write [`render_markdown`] output to `path`.
pub fn write_markdown_report(path: &Path, comparison: &RunComparison) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, render_markdown(comparison)).map_err(|err| BenchError::io(path, err))?;
    log_info!(
        component = "report",
        event = "artifact_written",
        path = %path.display(),
    );
    Ok(())
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn fmt_opt(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| "-".to_string())
}
