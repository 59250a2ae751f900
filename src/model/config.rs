use crate::model::archive_parameters::ArchiveParameters;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use crate::model::ignore_predicate::IgnoreRules;
use crate::model::retention_policy::RetentionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(rename = "Config")]
    pub general: GeneralConfig,
    #[serde(rename = "Purge", default)]
    pub purge: PurgeConfig,
    #[serde(rename = "Subject", default)]
    pub subjects: Vec<SubjectConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    pub backup_directory: PathBuf,
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_compression_level")]
    pub compression_level: String,
    #[serde(default)]
    pub differential: bool,
    #[serde(default)]
    pub check_file_content: bool,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PurgeConfig {
    #[serde(default = "default_purge_interval")]
    pub check_interval: u64, // minute
    #[serde(default = "default_true")]
    pub purge_after_startup: bool,
    #[serde(default = "default_expiration_days")]
    pub expiration_days: u32,
    #[serde(default)]
    pub max_count: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubjectConfig {
    pub name: String,
    pub source: PathBuf,
    #[serde(default = "default_backup_interval")]
    pub interval: u64, // minute
    #[serde(default = "default_true")]
    pub backup_after_startup: bool,
    #[serde(flatten)]
    pub ignore: IgnoreRules,
    #[serde(default)]
    pub save_command: Option<Vec<String>>,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            check_interval: default_purge_interval(),
            purge_after_startup: true,
            expiration_days: default_expiration_days(),
            max_count: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.general.max_concurrency == 0 {
            Err(SystemError::invalid_config("max_concurrency must be at least 1"))?
        }

        let mut names = HashSet::new();
        for subject in &self.subjects {
            let name = subject.name.as_str();
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                Err(SystemError::invalid_config(format!("invalid subject name '{name}'")))?
            }
            if !names.insert(name) {
                Err(SystemError::invalid_config(format!("duplicate subject name '{name}'")))?
            }
        }

        Ok(())
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            expiration_days: self.purge.expiration_days,
            max_count: self.purge.max_count,
        }
    }

    pub fn archive_parameters(&self) -> ArchiveParameters {
        ArchiveParameters::from_config_value(&self.general.compression_level)
    }

    pub fn subject(&self, name: &str) -> Option<&SubjectConfig> {
        self.subjects.iter().find(|subject| subject.name == name)
    }

    /// BackupRoot of a subject.
    pub fn subject_root(&self, name: &str) -> PathBuf {
        self.general.backup_directory.join(name)
    }
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_compression_level() -> String {
    "normal".to_string()
}

fn default_max_concurrency() -> usize {
    4
}

fn default_purge_interval() -> u64 {
    720
}

fn default_backup_interval() -> u64 {
    60
}

fn default_expiration_days() -> u32 {
    7
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [Config]
        backup_directory = "./backups"
        compression_level = "maximum"
        differential = true

        [Purge]
        expiration_days = 3
        max_count = 10

        [[Subject]]
        name = "world"
        source = "./world"
        exclude_file_names = ["session.lock"]
        exclude_suffixes = ["_old"]

        [[Subject]]
        name = "plugins"
        source = "./plugins"
        interval = 0
        exclude_extensions = ["jar"]
    "#;

    #[test]
    fn parses_sample_config() {
        let config = toml::from_str::<Config>(SAMPLE).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.general.differential);
        assert!(!config.general.check_file_content);
        assert_eq!(config.general.max_concurrency, 4);
        assert_eq!(config.purge.check_interval, 720);
        assert_eq!(config.retention_policy().expiration_days, 3);
        assert_eq!(config.retention_policy().max_count, Some(10));
        assert_eq!(config.subjects.len(), 2);

        let world = config.subject("world").unwrap();
        assert_eq!(world.interval, 60);
        assert!(world.backup_after_startup);
        assert_eq!(world.ignore.exclude_file_names, vec!["session.lock"]);
        assert_eq!(config.subject("plugins").unwrap().ignore.exclude_extensions, vec!["jar"]);
        assert_eq!(config.subject_root("world"), PathBuf::from("./backups/world"));
    }

    #[test]
    fn rejects_duplicate_and_path_like_names() {
        let mut config = toml::from_str::<Config>(SAMPLE).unwrap();
        config.subjects[1].name = "world".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::System(SystemError::InvalidConfig { err })) if err.contains("duplicate")
        ));

        config.subjects[1].name = "../escape".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::System(SystemError::InvalidConfig { err })) if err.contains("invalid subject name")
        ));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let mut config = toml::from_str::<Config>(SAMPLE).unwrap();
        config.general.max_concurrency = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::System(SystemError::InvalidConfig { .. }))
        ));
    }
}
