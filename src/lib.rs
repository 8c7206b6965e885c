#![deny(missing_docs)]
//! Metric extraction and cross-run comparison for solver benchmark logs.
//!
//! A benchmark harness leaves one free-text log per run under
//! `<results>/<group>/<instance...>/<sample>.log`. This crate scans those logs
//! against a fixed catalog of line patterns, turns each into a flat
//! [`LogRecord`], and compares runs: either two run labels inside one table
//! ([`compare::compare_labels`]) or two independent tables
//! ([`compare::compare_runs`]). Results are written as CSV, and charts are
//! handed to an external renderer as [`chart::ChartSpec`] descriptions.

mod observability;

/// Error taxonomy and result alias.
pub mod error;

/// Run identity derived from log paths.
pub mod identity;

/// Per-log metric record and column schema.
pub mod record;

/// Pattern catalog and log extraction.
pub mod extractor;

/// Results-root traversal.
pub mod collect;

/// In-memory tables and per-key averaging.
pub mod table;

/// Label and run comparisons.
pub mod compare;

/// CSV persistence.
pub mod csv_io;

/// Chart descriptions and sinks.
pub mod chart;

/// Markdown comparison summaries.
pub mod report;

/// Comparison and chart options.
pub mod option;

pub use crate::{
    error::{BenchError, Result},
    extractor::{extract, LogRecordExtractor},
    identity::Identity,
    record::{Column, LastField, LogRecord, SumField},
    table::{AggregatedRow, Row, Table},
};
