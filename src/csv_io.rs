//! CSV persistence for benchmark and comparison tables.
//!
//! Every table starts with an `Index` column. Missing cells are written empty;
//! suppressed derived cells are written as `NaN`.

use std::path::Path;

use csv::StringRecord;

use crate::{
    chart::ensure_dir,
    compare::{ComparisonRow, Derived, LabelComparison, RunComparison},
    error::{BenchError, Result},
    identity::Identity,
    observability::log_info,
    record::Column,
    table::{Row, Table},
};

const INDEX: &str = "Index";
const GROUP: &str = "Group";
const INSTANCE: &str = "Instance";
const SAMPLE: &str = "Sample";
const SPEEDUP: &str = "Speedup";
const TIME_DIFF: &str = "Time diff (s)";
const VALUE_DIFF: &str = "Value diff (%)";
const NAME: &str = "Name";

/// Write a benchmark table with every metric column.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let mut writer = open_writer(path)?;
    let mut header = vec![INDEX, GROUP, INSTANCE, SAMPLE];
    header.extend(Column::ALL.iter().map(|c| c.header()));
    writer.write_record(&header)?;

    for (idx, row) in table.rows().iter().enumerate() {
        let mut record = vec![
            idx.to_string(),
            row.identity.group.clone(),
            row.identity.instance.clone(),
            row.identity.sample.clone(),
        ];
        record.extend(Column::ALL.iter().map(|c| format_cell(row.get(*c))));
        writer.write_record(&record)?;
    }
    finish(writer, path, table.len())
}

/// Read a table written by [`write_table`] or by an older tool.
///
/// Identity columns are required. Known metric headers are parsed; other
/// columns are ignored. Empty cells and `NaN` become missing cells.
pub fn read_table(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let group = require(&headers, path, GROUP)?;
    let instance = require(&headers, path, INSTANCE)?;
    let sample = require(&headers, path, SAMPLE)?;
    let metrics: Vec<(usize, Column)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| Column::from_header(h).map(|c| (idx, c)))
        .collect();

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = Row::new(Identity::new(
            field(&record, group),
            field(&record, instance),
            field(&record, sample),
        ));
        for (idx, column) in &metrics {
            if let Some(value) = parse_cell(path, row_idx, column.header(), field(&record, *idx))? {
                row.set(*column, value);
            }
        }
        rows.push(row);
    }
    Ok(Table::new(rows))
}

/// Write a label comparison.
pub fn write_label_comparison(path: &Path, comparison: &LabelComparison) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer.write_record([
        INDEX,
        INSTANCE,
        SAMPLE,
        comparison.time_1_header().as_str(),
        comparison.time_2_header().as_str(),
        SPEEDUP,
        GROUP,
    ])?;
    for (idx, row) in comparison.rows.iter().enumerate() {
        writer.write_record([
            idx.to_string(),
            row.instance.clone(),
            row.sample.clone(),
            row.time_1.to_string(),
            row.time_2.to_string(),
            row.speedup.to_string(),
            row.group.clone(),
        ])?;
    }
    finish(writer, path, comparison.rows.len())
}

/// Write a two-run comparison.
pub fn write_run_comparison(path: &Path, comparison: &RunComparison) -> Result<()> {
    let mut writer = open_writer(path)?;
    let (a, b) = (&comparison.label_a, &comparison.label_b);
    writer.write_record([
        INDEX.to_string(),
        GROUP.to_string(),
        INSTANCE.to_string(),
        SAMPLE.to_string(),
        time_header(a),
        time_header(b),
        value_header(a),
        value_header(b),
        SPEEDUP.to_string(),
        TIME_DIFF.to_string(),
        VALUE_DIFF.to_string(),
        NAME.to_string(),
    ])?;
    for (idx, row) in comparison.rows.iter().enumerate() {
        writer.write_record([
            idx.to_string(),
            row.identity.group.clone(),
            row.identity.instance.clone(),
            row.identity.sample.clone(),
            format_cell(row.time_a),
            format_cell(row.time_b),
            format_cell(row.value_a),
            format_cell(row.value_b),
            format_derived(row.speedup),
            format_derived(row.time_diff),
            format_derived(row.value_diff_pct),
            row.name(),
        ])?;
    }
    finish(writer, path, comparison.rows.len())
}

/// Read a table written by [`write_run_comparison`].
///
/// Run labels are recovered from the time column headers.
pub fn read_run_comparison(path: &Path) -> Result<RunComparison> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let label_at = |idx: usize| -> Result<String> {
        headers
            .get(idx)
            .and_then(|h| h.strip_suffix(" time (s)"))
            .map(str::to_string)
            .ok_or_else(|| BenchError::MissingColumn {
                path: path.to_path_buf(),
                column: "<label> time (s)".to_string(),
            })
    };
    let label_a = label_at(4)?;
    let label_b = label_at(5)?;
    let group = require(&headers, path, GROUP)?;
    let instance = require(&headers, path, INSTANCE)?;
    let sample = require(&headers, path, SAMPLE)?;
    // Run columns are positional; the two labels may coincide.
    let (time_a, time_b) = (4, 5);
    let value_a = require_at(&headers, path, 6, &value_header(&label_a))?;
    let value_b = require_at(&headers, path, 7, &value_header(&label_b))?;
    let speedup = require(&headers, path, SPEEDUP)?;
    let time_diff = require(&headers, path, TIME_DIFF)?;
    let value_diff = require(&headers, path, VALUE_DIFF)?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |idx: usize| parse_cell(path, row_idx, &headers[idx], field(&record, idx));
        let derived =
            |idx: usize| parse_derived(path, row_idx, &headers[idx], field(&record, idx));
        rows.push(ComparisonRow {
            identity: Identity::new(
                field(&record, group),
                field(&record, instance),
                field(&record, sample),
            ),
            time_a: cell(time_a)?,
            time_b: cell(time_b)?,
            value_a: cell(value_a)?,
            value_b: cell(value_b)?,
            speedup: derived(speedup)?,
            time_diff: derived(time_diff)?,
            value_diff_pct: derived(value_diff)?,
        });
    }
    Ok(RunComparison {
        label_a,
        label_b,
        rows,
    })
}

fn time_header(label: &str) -> String {
    format!("{label} time (s)")
}

fn value_header(label: &str) -> String {
    format!("{label} value")
}

fn open_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(csv::Writer::from_path(path)?)
}

fn finish(mut writer: csv::Writer<std::fs::File>, path: &Path, rows: usize) -> Result<()> {
    writer.flush().map_err(|err| BenchError::io(path, err))?;
    log_info!(
        component = "csv",
        event = "artifact_written",
        path = %path.display(),
        rows = rows,
    );
    Ok(())
}

fn require(headers: &StringRecord, path: &Path, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| BenchError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

fn require_at(headers: &StringRecord, path: &Path, idx: usize, column: &str) -> Result<usize> {
    match headers.get(idx) {
        Some(h) if h == column => Ok(idx),
        _ => Err(BenchError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        }),
    }
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn format_derived(value: Option<Derived>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_cell(path: &Path, row: usize, column: &str, raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(_) => Err(BenchError::InvalidCell {
            path: path.to_path_buf(),
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_derived(path: &Path, row: usize, column: &str, raw: &str) -> Result<Option<Derived>> {
    if raw.trim().eq_ignore_ascii_case(Derived::SENTINEL) {
        return Ok(Some(Derived::NotANumber));
    }
    Ok(parse_cell(path, row, column, raw)?.map(Derived::Value))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{option::CompareOptions, record::LastField};

    #[test]
    fn table_round_trip_keeps_missing_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tables").join("benchmark.csv");
        let table = Table::new(vec![
            Row::new(Identity::new("A", "pglib/case14", "0"))
                .with(Column::OPTIMIZATION_TIME, 12.5)
                .with(Column::Last(LastField::Gap), 0.046)
                .with(Column::Buses, 0.0),
            Row::new(Identity::new("B", "case30", "1")).with(Column::PRIMAL_BOUND, 1.5e7),
        ]);
        write_table(&path, &table).unwrap();
        let back = read_table(&path).unwrap();
        assert_eq!(back, table);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Index,Group,Instance,Sample,Optimization time (s),"));
    }

    #[test]
    fn read_table_requires_identity_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "Index,Group,Sample\n0,A,1\n").unwrap();
        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, BenchError::MissingColumn { column, .. } if column == "Instance"));
    }

    #[test]
    fn read_table_rejects_garbage_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(
            &path,
            "Index,Group,Instance,Sample,Optimization time (s)\n0,A,c,1,fast\n",
        )
        .unwrap();
        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, BenchError::InvalidCell { row: 0, .. }));
    }

    #[test]
    fn run_comparison_round_trip_keeps_sentinels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compare-runs.csv");
        let row = |inst: &str, t: f64, v: f64| {
            Row::new(Identity::new("A", inst, "0"))
                .with(Column::OPTIMIZATION_TIME, t)
                .with(Column::PRIMAL_BOUND, v)
        };
        let a = Table::new(vec![row("c1", 10.0, 3.0), row("c2", 1.0, 1.0), row("c3", 7.0, 1.0)]);
        let b = Table::new(vec![row("c1", 3.0, 4.0), row("c2", 0.0, 1.0)]);
        let cmp = compare_runs_fixture(&a, &b);
        write_run_comparison(&path, &cmp).unwrap();

        let back = read_run_comparison(&path).unwrap();
        assert_eq!(back.label_a, "base");
        assert_eq!(back.label_b, "cand");
        assert_eq!(back.rows.len(), cmp.rows.len());
        for (got, want) in back.rows.iter().zip(&cmp.rows) {
            assert_eq!(got.identity, want.identity);
            assert_eq!(got.time_a, want.time_a);
            assert_eq!(got.time_b, want.time_b);
            assert_eq!(got.speedup, want.speedup);
            assert_eq!(got.time_diff, want.time_diff);
            assert_eq!(got.value_diff_pct, want.value_diff_pct);
        }
        assert_eq!(back.rows[1].speedup, Some(Derived::NotANumber));
        assert_eq!(back.rows[2].speedup, None);
    }

    #[test]
    fn run_comparison_round_trip_with_equal_labels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compare-runs.csv");
        let row = |t: f64, v: f64| {
            Row::new(Identity::new("A", "c1", "0"))
                .with(Column::OPTIMIZATION_TIME, t)
                .with(Column::PRIMAL_BOUND, v)
        };
        let a = Table::new(vec![row(10.0, 2.0)]);
        let b = Table::new(vec![row(5.0, 3.0)]);
        let cmp = crate::compare::compare_runs(
            &a,
            &b,
            &CompareOptions::default().label_a("gurobi").label_b("gurobi"),
        );
        write_run_comparison(&path, &cmp).unwrap();

        let back = read_run_comparison(&path).unwrap();
        assert_eq!(back, cmp);
        assert_eq!(back.rows[0].time_a, Some(10.0));
        assert_eq!(back.rows[0].time_b, Some(5.0));
        assert_eq!(back.rows[0].value_b, Some(3.0));
    }

    #[test]
    fn label_comparison_header_uses_labels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compare.csv");
        let cmp = LabelComparison {
            label_1: "gurobi".into(),
            label_2: "highs".into(),
            rows: Vec::new(),
        };
        write_label_comparison(&path, &cmp).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("Index,Instance,Sample,gurobi time (s),highs time (s),Speedup,Group")
        );
    }

    fn compare_runs_fixture(a: &Table, b: &Table) -> RunComparison {
        crate::compare::compare_runs(
            a,
            b,
            &CompareOptions::default().label_a("base").label_b("cand"),
        )
    }
}
