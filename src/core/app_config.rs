use crate::model::config::Config;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const CONFIG_PATH_ENV: &str = "ZIPSPHERE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

/// Active configuration, swapped as a whole on reload so readers never see a
/// half-applied file.
pub struct AppConfig {
    path: PathBuf,
    config: RwLock<Arc<Config>>,
}

impl AppConfig {
    pub fn load() -> Result<Self, Error> {
        let path = env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::from_path(path)
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let config = Self::load_config_file(&path)?;
        Ok(Self {
            path,
            config: RwLock::new(Arc::new(config)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn now(&self) -> Arc<Config> {
        self.config.read().await.clone()
    }

    /// Re-reads the file. On failure the previous configuration stays active.
    pub async fn reload(&self) -> Result<Arc<Config>, Error> {
        let config = Arc::new(Self::load_config_file(&self.path)?);
        *self.config.write().await = config.clone();
        Ok(config)
    }

    fn load_config_file(path: &Path) -> Result<Config, Error> {
        let toml_string =
            fs::read_to_string(path).map_err(|err| SystemError::config_not_found(path, err))?;
        let config =
            toml::from_str::<Config>(&toml_string).map_err(SystemError::invalid_config)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(path: &Path, max_concurrency: usize) {
        fs::write(
            path,
            format!(
                r#"
                [Config]
                backup_directory = "./backups"
                max_concurrency = {max_concurrency}

                [[Subject]]
                name = "world"
                source = "./world"
                "#
            ),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn reload_swaps_configuration() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        write_config(&path, 2);

        let app_config = AppConfig::from_path(&path).unwrap();
        assert_eq!(app_config.path(), path);
        let before = app_config.now().await;
        assert_eq!(before.general.max_concurrency, 2);

        write_config(&path, 6);
        let reloaded = app_config.reload().await.unwrap();

        assert_eq!(reloaded.general.max_concurrency, 6);
        assert_eq!(app_config.now().await.general.max_concurrency, 6);
        assert_eq!(before.general.max_concurrency, 2);
    }

    #[tokio::test]
    async fn invalid_reload_keeps_previous_configuration() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        write_config(&path, 3);
        let app_config = AppConfig::from_path(&path).unwrap();

        write_config(&path, 0);
        assert!(matches!(
            app_config.reload().await,
            Err(Error::System(SystemError::InvalidConfig { .. }))
        ));
        fs::write(&path, "not toml [").unwrap();
        assert!(app_config.reload().await.is_err());

        assert_eq!(app_config.now().await.general.max_concurrency, 3);
    }

    #[test]
    fn missing_file_is_reported() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            AppConfig::from_path(temp.path().join("absent.toml")),
            Err(Error::System(SystemError::ConfigNotFound { .. }))
        ));
    }
}
