//! Line-oriented metric extraction from solver logs.
//!
//! Every line is tested against every entry of a fixed pattern catalog. A
//! matching entry routes each captured number to its target field, either
//! adding it to a running total or overwriting the previous value. Lines that
//! match nothing are ignored, so an unrelated file yields an identity-only
//! record rather than an error.

mod catalog;

use std::{fs, path::Path};

use catalog::{Pattern, Target, CATALOG};

use crate::{
    error::{BenchError, Result},
    identity::Identity,
    observability::log_debug,
    record::{LastField, LogRecord},
};

/// Turns log text into a [`LogRecord`].
///
/// Stateless across calls; one extractor can process any number of files.
#[derive(Clone, Copy)]
pub struct LogRecordExtractor {
    patterns: &'static [Pattern],
}

impl Default for LogRecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogRecordExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogRecordExtractor")
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

impl LogRecordExtractor {
    /// Extractor over the built-in pattern catalog.
    pub fn new() -> Self {
        Self {
            patterns: CATALOG.as_slice(),
        }
    }

    /// Scan `lines` and build the record for `identity`.
    pub fn extract<'a, I>(&self, lines: I, identity: Identity) -> LogRecord
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.extract_counting(lines, identity).0
    }

    /// Scan a whole log held in memory.
    pub fn extract_text(&self, text: &str, identity: Identity) -> LogRecord {
        self.extract(text.lines(), identity)
    }

    /// Read `path`, derive its identity relative to `root`, and extract it.
    ///
    /// # Errors
    /// Fails when the path does not decompose into group/instance/sample or
    /// when the file cannot be read as UTF-8 text.
    pub fn extract_file(&self, root: &Path, path: &Path) -> Result<LogRecord> {
        let identity = Identity::from_log_path(root, path)?;
        let text = fs::read_to_string(path).map_err(|err| BenchError::io(path, err))?;
        let (record, matched) = self.extract_counting(text.lines(), identity);
        log_debug!(
            component = "extractor",
            event = "file_extracted",
            path = %path.display(),
            identity = %record.identity(),
            matched_lines = matched,
        );
        Ok(record)
    }

    fn extract_counting<'a, I>(&self, lines: I, identity: Identity) -> (LogRecord, usize)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut record = LogRecord::new(identity);
        let mut matched = 0;
        for line in lines {
            for pattern in self.patterns {
                if apply(pattern, line, &mut record) {
                    matched += 1;
                }
            }
        }
        (record, matched)
    }
}

/// Convenience wrapper taking the identity as separate parts.
pub fn extract<'a, I>(lines: I, group: &str, instance: &str, sample: &str) -> LogRecord
where
    I: IntoIterator<Item = &'a str>,
{
    LogRecordExtractor::new().extract(lines, Identity::new(group, instance, sample))
}

fn apply(pattern: &Pattern, line: &str, record: &mut LogRecord) -> bool {
    let Some(caps) = pattern.regex.captures(line) else {
        return false;
    };
    for (idx, target) in pattern.captures.iter().enumerate() {
        let Some(raw) = caps.get(idx + 1).map(|m| m.as_str()) else {
            continue;
        };
        let Ok(value) = raw.parse::<f64>() else {
            log_debug!(
                component = "extractor",
                event = "capture_unparsed",
                pattern = pattern.name,
                raw = raw,
            );
            continue;
        };
        match *target {
            Target::Sum(field) => {
                record.add(field, if field.is_count() { value.trunc() } else { value })
            }
            Target::Last(field) => record.set(field, normalize_last(field, value)),
            Target::Ignore => {}
        }
    }
    for field in pattern.counters {
        record.add(*field, 1.0);
    }
    true
}

fn normalize_last(field: LastField, value: f64) -> f64 {
    match field {
        LastField::Gap => round_to(value, 3),
        f if f.is_count() => value.trunc(),
        _ => value,
    }
}

/// Round half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
