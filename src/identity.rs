//! Benchmark identity derived from a log's location under the results root.

use std::{
    fmt,
    path::{Component, Path},
};

use crate::error::{BenchError, Result};

/// (group, instance, sample) key identifying one solver run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity {
    /// Top-level category, the first directory below the results root.
    pub group: String,
    /// Problem case; nested directories are kept and joined with `/`.
    pub instance: String,
    /// Repeated trial, the log's file stem.
    pub sample: String,
}

impl Identity {
    /// Build an identity from its three parts.
    pub fn new(
        group: impl Into<String>,
        instance: impl Into<String>,
        sample: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            instance: instance.into(),
            sample: sample.into(),
        }
    }

    /// Decompose `path` relative to `root` into `group/instance.../sample.ext`.
    ///
    /// # Errors
    /// Returns [`BenchError::MalformedIdentity`] when `path` is not under `root`
    /// or has fewer than three components below it.
    pub fn from_log_path(root: &Path, path: &Path) -> Result<Self> {
        let malformed = |reason: &str| BenchError::MalformedIdentity {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let rel = path
            .strip_prefix(root)
            .map_err(|_| malformed("not under results root"))?;
        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => parts.push(
                    part.to_str()
                        .ok_or_else(|| malformed("path is not valid UTF-8"))?,
                ),
                Component::CurDir => {}
                _ => return Err(malformed("unexpected path component")),
            }
        }
        if parts.len() < 3 {
            return Err(malformed(
                "expected <group>/<instance>/<sample> below results root",
            ));
        }

        let sample = Path::new(parts[parts.len() - 1])
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("empty sample name"))?;

        Ok(Self {
            group: parts[0].to_string(),
            instance: parts[1..parts.len() - 1].join("/"),
            sample: sample.to_string(),
        })
    }

    /// Display label `group/instance`, used to group rows in reports.
    pub fn name(&self) -> String {
        format!("{}/{}", self.group, self.instance)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.instance, self.sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_group_instance_sample() {
        let id = Identity::from_log_path(
            Path::new("results"),
            Path::new("results/gurobi/pglib-uc/ca/2017-01-01/0.log"),
        )
        .unwrap();
        assert_eq!(id.group, "gurobi");
        assert_eq!(id.instance, "pglib-uc/ca/2017-01-01");
        assert_eq!(id.sample, "0");
        assert_eq!(id.name(), "gurobi/pglib-uc/ca/2017-01-01");
    }

    #[test]
    fn single_segment_instance() {
        let id = Identity::from_log_path(
            Path::new("/tmp/results"),
            Path::new("/tmp/results/A/case1/s1.log"),
        )
        .unwrap();
        assert_eq!(id, Identity::new("A", "case1", "s1"));
    }

    #[test]
    fn rejects_shallow_paths() {
        let err = Identity::from_log_path(Path::new("results"), Path::new("results/A/s1.log"))
            .unwrap_err();
        assert!(matches!(err, BenchError::MalformedIdentity { .. }));
    }

    #[test]
    fn rejects_paths_outside_root() {
        let err = Identity::from_log_path(Path::new("results"), Path::new("other/A/b/c.log"))
            .unwrap_err();
        assert!(matches!(err, BenchError::MalformedIdentity { .. }));
    }
}
