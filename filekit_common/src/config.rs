use crate::{AppConfig, FilekitError};
use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "filekit.toml";

/// Where `filekit.toml` is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Next to the running executable
    Portable(PathBuf),
    /// The platform's per-user config directory
    User(PathBuf),
}

impl ConfigLocation {
    /// Pick the config file for this run
    ///
    /// A file beside the executable wins whenever it already exists, or when
    /// `prefer_portable` asks for it. Otherwise the per-user location is used.
    pub fn discover(prefer_portable: bool) -> Result<Self, FilekitError> {
        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)));

        match beside_exe {
            Some(path) if prefer_portable || path.is_file() => Ok(Self::Portable(path)),
            _ => ProjectDirs::from("", "filekit", "filekit")
                .map(|dirs| Self::User(dirs.config_dir().join(CONFIG_FILE_NAME)))
                .ok_or_else(|| {
                    FilekitError::Config("no home directory to hold the config file".to_string())
                }),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Portable(path) | Self::User(path) => path,
        }
    }

    pub fn is_portable(&self) -> bool {
        matches!(self, Self::Portable(_))
    }

    /// Read the settings stored here; an absent file means defaults
    pub fn load(self) -> Result<LoadedConfig, FilekitError> {
        let (mut config, exists) = match fs::read_to_string(self.path()) {
            Ok(text) => {
                let parsed: AppConfig = toml::from_str(&text)
                    .map_err(|e| FilekitError::Serialization(e.to_string()))?;
                (parsed, true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => (AppConfig::default(), false),
            Err(e) => return Err(e.into()),
        };
        config.portable_mode = self.is_portable();

        Ok(LoadedConfig {
            config,
            location: self,
            exists,
        })
    }
}

/// Settings together with the file they came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub location: ConfigLocation,
    pub exists: bool,
}

impl LoadedConfig {
    pub fn path(&self) -> &Path {
        self.location.path()
    }

    /// Write the current settings out if the file is not there yet
    pub fn persist_if_missing(&mut self) -> Result<(), FilekitError> {
        if !self.exists {
            save_config(self.location.path(), &self.config)?;
            self.exists = true;
        }
        Ok(())
    }
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), FilekitError> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| FilekitError::Serialization(e.to_string()))?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        let loaded = ConfigLocation::User(path.clone()).load().unwrap();

        assert!(!loaded.exists);
        assert_eq!(loaded.path(), path);
        assert_eq!(loaded.config, AppConfig::default());
    }

    #[test]
    fn test_save_then_load_portable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(CONFIG_FILE_NAME);
        let config = AppConfig {
            verbose: true,
            sort_results: true,
            ..AppConfig::default()
        };

        save_config(&path, &config).unwrap();
        let loaded = ConfigLocation::Portable(path).load().unwrap();

        assert!(loaded.exists);
        assert!(loaded.location.is_portable());
        assert!(loaded.config.verbose);
        assert!(loaded.config.sort_results);
        assert!(!loaded.config.parallel);
        assert!(loaded.config.portable_mode);
    }

    #[test]
    fn test_persist_if_missing_writes_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cfg").join(CONFIG_FILE_NAME);

        let mut loaded = ConfigLocation::User(path.clone()).load().unwrap();
        loaded.persist_if_missing().unwrap();
        assert!(loaded.exists);
        assert!(path.is_file());

        // An existing file is left as the user wrote it
        fs::write(&path, "parallel = true\n").unwrap();
        let mut reloaded = ConfigLocation::User(path.clone()).load().unwrap();
        reloaded.persist_if_missing().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "parallel = true\n");
        assert!(reloaded.config.parallel);
        assert!(!reloaded.config.portable_mode);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "verbose = \"not a bool\"").unwrap();

        let err = ConfigLocation::User(path).load().unwrap_err();
        assert!(matches!(err, FilekitError::Serialization(_)));
    }

    #[test]
    fn test_unreadable_config_path_is_io_error() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::create_dir(&path).unwrap();

        let err = ConfigLocation::User(path).load().unwrap_err();
        assert!(matches!(err, FilekitError::Io(_)));
    }

    #[test]
    fn test_discover_prefers_portable_when_asked() {
        let location = ConfigLocation::discover(true).unwrap();
        assert!(location.is_portable());
        assert!(location.path().ends_with(CONFIG_FILE_NAME));
    }
}
