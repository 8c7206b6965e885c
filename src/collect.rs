//! Discovery of solver logs under a results root.
//!
//! Layout: `<root>/<group>/<instance...>/<sample>.log`. Files that are not
//! logs (notebook checkpoints, editor backups, hidden files) are skipped;
//! any log that cannot be read or whose path does not decompose into an
//! identity aborts the whole collection.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{BenchError, Result},
    extractor::LogRecordExtractor,
    observability::{log_debug, log_info},
    record::LogRecord,
};

/// Extension recognised as a solver log.
pub const LOG_EXTENSION: &str = "log";

/// Walks a results root and extracts one record per log file.
#[derive(Debug, Clone)]
pub struct Collector {
    root: PathBuf,
    extractor: LogRecordExtractor,
}

impl Collector {
    /// Collector over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extractor: LogRecordExtractor::new(),
        }
    }

    /// Results root being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted paths of every log file under the root.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let listing = fs::read_dir(&dir).map_err(|err| BenchError::io(&dir, err))?;
            for entry in listing {
                let entry = entry.map_err(|err| BenchError::io(&dir, err))?;
                let path = entry.path();
                // Symlinked directories are not followed.
                let file_type = entry.file_type().map_err(|err| BenchError::io(&path, err))?;
                if file_type.is_dir() {
                    if is_ignored_dir(&path) {
                        log_debug!(
                            component = "collect",
                            event = "file_skipped",
                            path = %path.display(),
                        );
                    } else {
                        stack.push(path);
                    }
                    continue;
                }
                if is_log_file(&path) {
                    entries.push(path);
                } else {
                    log_debug!(
                        component = "collect",
                        event = "file_skipped",
                        path = %path.display(),
                    );
                }
            }
        }
        entries.sort();
        Ok(entries)
    }

    /// Extract every discovered log, in path order.
    ///
    /// # Errors
    /// Fails on the first unreadable file or malformed path, and when the root
    /// contains no logs at all.
    pub fn collect(&self) -> Result<Vec<LogRecord>> {
        let paths = self.discover()?;
        if paths.is_empty() {
            return Err(BenchError::EmptyResults(self.root.clone()));
        }
        let records = paths
            .iter()
            .map(|path| self.extractor.extract_file(&self.root, path))
            .collect::<Result<Vec<_>>>()?;
        log_info!(
            component = "collect",
            event = "collect_completed",
            root = %self.root.display(),
            files = records.len(),
        );
        Ok(records)
    }
}

/// Extract every log under `root`.
pub fn collect_results(root: &Path) -> Result<Vec<LogRecord>> {
    Collector::new(root).collect()
}

fn is_ignored_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.') || name.contains(".ipy"))
}

fn is_log_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') || name.ends_with('~') || name.contains(".ipy") {
        return false;
    }
    path.extension().and_then(|e| e.to_str()) == Some(LOG_EXTENSION)
}
