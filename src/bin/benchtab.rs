//! Command-line entrypoint: collect solver logs into a table and compare runs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use benchtab::{
    chart::{table_chart, ChartSink, JsonChartSink},
    collect::Collector,
    compare::{compare_labels, compare_runs},
    csv_io,
    option::{ChartOptions, CompareOptions},
    report, Table,
};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Solver benchmark log tables and comparisons")]
enum Command {
    /// Extract every log under RESULTS_ROOT into `benchmark.csv`.
    Collect {
        /// Directory laid out as `<group>/<instance...>/<sample>.log`.
        results_root: PathBuf,
        /// Directory receiving the table and chart description.
        #[arg(long, default_value = "tables")]
        output_dir: PathBuf,
    },
    /// Compare two run labels of the `Group` column of one table.
    Compare {
        /// Table written by `collect`.
        table: PathBuf,
        /// Baseline label.
        label_1: String,
        /// Candidate label.
        label_2: String,
        /// Directory receiving `compare.csv` and its chart description.
        #[arg(long, default_value = "tables")]
        output_dir: PathBuf,
    },
    /// Compare two independently collected tables key by key.
    CompareRuns {
        /// Table of run A.
        table_a: PathBuf,
        /// Table of run B.
        table_b: PathBuf,
        /// Header label for run A.
        #[arg(long, default_value = "A")]
        label_a: String,
        /// Header label for run B.
        #[arg(long, default_value = "B")]
        label_b: String,
        /// Order rows by descending speedup instead of by key.
        #[arg(long)]
        sort_by_speedup: bool,
        /// Directory receiving `compare-runs.csv` and its chart description.
        #[arg(long, default_value = "tables")]
        output_dir: PathBuf,
        /// Optional Markdown summary path.
        #[arg(long)]
        report_md: Option<PathBuf>,
    },
}

fn main() {
    init_tracing();
    if let Err(err) = try_main() {
        eprintln!("error: {err:?}");
        std::process::exit(2);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,benchtab=info")),
        )
        .init();
}

fn try_main() -> anyhow::Result<()> {
    match Command::parse() {
        Command::Collect {
            results_root,
            output_dir,
        } => run_collect(&results_root, &output_dir),
        Command::Compare {
            table,
            label_1,
            label_2,
            output_dir,
        } => run_compare(&table, &label_1, &label_2, &output_dir),
        Command::CompareRuns {
            table_a,
            table_b,
            label_a,
            label_b,
            sort_by_speedup,
            output_dir,
            report_md,
        } => {
            let options = CompareOptions::default()
                .label_a(label_a)
                .label_b(label_b)
                .sort_by_speedup(sort_by_speedup);
            run_compare_runs(&table_a, &table_b, &options, &output_dir, report_md.as_deref())
        }
    }
}

fn run_collect(results_root: &Path, output_dir: &Path) -> anyhow::Result<()> {
    let records = Collector::new(results_root)
        .collect()
        .with_context(|| format!("collect logs under {}", results_root.display()))?;
    let table = Table::from_records(&records).sorted_for_report();

    let csv_path = output_dir.join("benchmark.csv");
    println!("Writing {}", csv_path.display());
    csv_io::write_table(&csv_path, &table).context("write benchmark table")?;

    let spec = table_chart(&table, &ChartOptions::single_run());
    JsonChartSink::new(output_dir)
        .render("benchmark", &spec)
        .context("write benchmark chart")?;
    Ok(())
}

fn run_compare(
    table: &Path,
    label_1: &str,
    label_2: &str,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let data =
        csv_io::read_table(table).with_context(|| format!("read table {}", table.display()))?;
    let comparison = compare_labels(&data, label_1, label_2);

    let csv_path = output_dir.join("compare.csv");
    println!("Writing {}", csv_path.display());
    csv_io::write_label_comparison(&csv_path, &comparison).context("write comparison table")?;

    let spec = comparison.chart(&ChartOptions::label_comparison());
    JsonChartSink::new(output_dir)
        .render("compare", &spec)
        .context("write comparison chart")?;
    Ok(())
}

fn run_compare_runs(
    table_a: &Path,
    table_b: &Path,
    options: &CompareOptions,
    output_dir: &Path,
    report_md: Option<&Path>,
) -> anyhow::Result<()> {
    let a = csv_io::read_table(table_a)
        .with_context(|| format!("read run A table {}", table_a.display()))?;
    let b = csv_io::read_table(table_b)
        .with_context(|| format!("read run B table {}", table_b.display()))?;
    let comparison = compare_runs(&a, &b, options);

    let csv_path = output_dir.join("compare-runs.csv");
    println!("Writing {}", csv_path.display());
    csv_io::write_run_comparison(&csv_path, &comparison).context("write comparison table")?;

    let spec = comparison.chart(&ChartOptions::run_comparison());
    JsonChartSink::new(output_dir)
        .render("compare-runs", &spec)
        .context("write comparison chart")?;

    if let Some(path) = report_md {
        report::write_markdown_report(path, &comparison)
            .with_context(|| format!("write report {}", path.display()))?;
        println!("Wrote report to {}", path.display());
    }
    Ok(())
}
