use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decides whether a path under a source tree is left out of a backup.
///
/// Paths handed to the predicate are full paths (source root joined with the
/// entry's relative path). An ignored directory prunes its whole subtree.
#[derive(Clone)]
pub struct IgnorePredicate {
    predicate: Arc<dyn Fn(&Path) -> bool + Send + Sync>,
}

impl IgnorePredicate {
    pub fn new(predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    pub fn none() -> Self {
        Self::new(|_| false)
    }

    /// Ignores `path` itself and everything below it.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        let excluded = path.into();
        Self::new(move |candidate| candidate.starts_with(&excluded))
    }

    pub fn test(&self, path: &Path) -> bool {
        (self.predicate)(path)
    }

    pub fn or(self, other: IgnorePredicate) -> Self {
        Self::new(move |path| self.test(path) || other.test(path))
    }
}

impl Default for IgnorePredicate {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for IgnorePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IgnorePredicate")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    #[serde(default)]
    pub exclude_file_names: Vec<String>,
    #[serde(default)]
    pub exclude_suffixes: Vec<String>,
    #[serde(default)]
    pub exclude_extensions: Vec<String>,
    /// Relative to the source directory.
    #[serde(default)]
    pub exclude_folders: Vec<PathBuf>,
}

impl IgnoreRules {
    pub fn into_predicate(self, source: &Path) -> IgnorePredicate {
        let folders: Vec<PathBuf> = self
            .exclude_folders
            .iter()
            .map(|folder| source.join(folder))
            .collect();
        let IgnoreRules {
            exclude_file_names,
            exclude_suffixes,
            exclude_extensions,
            ..
        } = self;

        IgnorePredicate::new(move |path| {
            if folders.iter().any(|folder| path.starts_with(folder)) {
                return true;
            }

            let Some(name) = path.file_name().map(|name| name.to_string_lossy()) else {
                return false;
            };

            exclude_file_names.iter().any(|excluded| *excluded == name)
                || exclude_suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
                || path
                    .extension()
                    .map(|ext| ext.to_string_lossy())
                    .is_some_and(|ext| exclude_extensions.iter().any(|excluded| *excluded == ext))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_rules() -> IgnoreRules {
        IgnoreRules {
            exclude_file_names: vec!["session.lock".to_string()],
            exclude_suffixes: vec!["_old".to_string()],
            exclude_extensions: vec!["jar".to_string()],
            exclude_folders: vec![PathBuf::from("cache/tmp")],
        }
    }

    #[test]
    fn matches_configured_rules() {
        let source = Path::new("/srv/world");
        let predicate = world_rules().into_predicate(source);

        assert!(predicate.test(&source.join("session.lock")));
        assert!(predicate.test(&source.join("region/level.dat_old")));
        assert!(predicate.test(&source.join("plugin.jar")));
        assert!(predicate.test(&source.join("cache/tmp")));
        assert!(predicate.test(&source.join("cache/tmp/chunk.bin")));

        assert!(!predicate.test(&source.join("level.dat")));
        assert!(!predicate.test(&source.join("cache/keep.bin")));
        assert!(!predicate.test(&source.join("session.lock.txt")));
    }

    #[test]
    fn composes_with_or() {
        let predicate = IgnorePredicate::none().or(IgnorePredicate::path("/srv/world/backups"));

        assert!(predicate.test(Path::new("/srv/world/backups")));
        assert!(predicate.test(Path::new("/srv/world/backups/a.zip")));
        assert!(!predicate.test(Path::new("/srv/world/backups2")));
        assert!(!IgnorePredicate::none().test(Path::new("/anything")));
    }
}
