use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::source::{DEFAULT_COMMUNITY, DEFAULT_RETRIES};

/// Содержимое файла настроек. Все поля необязательны.
///
/// ```yaml
/// connection:
///   timeout: 5
///   retries: 1
/// community: public
/// profile: ./profiles/apc.yaml
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub connection: ConnectionSettings,
    /// Community для источников без своего
    pub community: String,
    /// Дополнительные статистики
    pub profile: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Сколько секунд ждать каждый SNMP ответ
    pub timeout: u64,
    /// Повторы после таймаута
    pub retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            community: DEFAULT_COMMUNITY.to_string(),
            profile: None,
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            timeout: 5,
            retries: DEFAULT_RETRIES,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings: Settings =
            serde_yml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        // Относительный путь профиля считается от файла настроек.
        if let (Some(profile), Some(dir)) = (&settings.profile, path.parent()) {
            if profile.is_relative() {
                settings.profile = Some(dir.join(profile));
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection:\n  retries: 3").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.connection.retries, 3);
        assert_eq!(settings.connection.timeout, 5);
        assert_eq!(settings.community, "public");
        assert_eq!(settings.profile, None);
    }

    #[test]
    fn profile_path_is_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("powerstat.yaml");
        std::fs::write(&path, "community: tripplite\nprofile: apc.yaml\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.community, "tripplite");
        assert_eq!(settings.profile, Some(dir.path().join("apc.yaml")));
    }

    #[test]
    fn reports_unreadable_and_malformed_files() {
        assert!(matches!(
            Settings::load("/nonexistent/powerstat.yaml"),
            Err(ConfigError::Read { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection: [1, 2").unwrap();
        assert!(matches!(
            Settings::load(file.path()),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
