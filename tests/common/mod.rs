//! Common test utilities for integration tests.

use std::{fs, path::Path};

/// Solver log with one branch-and-bound summary and one final bound line.
pub fn solver_log(seconds: f64, primal: f64) -> String {
    format!(
        "Optimize a model with 10 rows, 20 columns and 30 nonzeros\n\
         Explored 1 nodes (12 simplex iterations) in {seconds} seconds\n\
         Best objective {primal:e}, best bound {primal:e}, gap 0.0000%\n\
         Total time was {seconds} seconds\n"
    )
}

/// Write `body` at `root/rel`, creating parent directories.
pub fn write_log(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("log path has a parent")).expect("create dirs");
    fs::write(path, body).expect("write log");
}
