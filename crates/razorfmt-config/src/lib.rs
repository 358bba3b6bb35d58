use razorfmt_engine::{DEFAULT_INDENT_WIDTH, DEFAULT_PRINT_WIDTH, FormatOptions};
use razorfmt_syntax::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config file name, looked up from the working directory
/// upwards.
pub const CONFIG_FILE_NAME: &str = "razorfmt.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {field} = {value}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: usize,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub indent_width: usize,
    pub print_width: usize,
    /// Extra element names treated as void (no children, printed `<x/>`).
    pub void_elements: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            print_width: DEFAULT_PRINT_WIDTH,
            void_elements: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }
        Self::read(config_path).map(Some)
    }

    /// Loads the effective configuration.
    ///
    /// An explicit path must exist. Otherwise the nearest `razorfmt.toml`
    /// from the working directory up is used, then the user config file,
    /// then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::read(&Self::expand_path(path));
        }

        let project = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover(&cwd));
        for candidate in project.into_iter().chain([Self::config_path()]) {
            if let Some(config) = Self::load_from_path(&candidate)? {
                log::debug!("using config from {}", candidate.display());
                return Ok(config);
            }
        }

        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Finds the nearest project config file in `start` or its ancestors.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// The per-user config file.
    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/razorfmt");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.indent_width) {
            return Err(ConfigError::InvalidValue {
                field: "indent_width",
                value: self.indent_width,
                reason: "must be between 1 and 16",
            });
        }
        if self.print_width < 20 {
            return Err(ConfigError::InvalidValue {
                field: "print_width",
                value: self.print_width,
                reason: "must be at least 20",
            });
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            void_elements: self.void_elements.clone(),
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            indent_width: self.indent_width,
            print_width: self.print_width,
            parse: self.parse_options(),
        }
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/razorfmt/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.print_width, 100);
        assert!(config.void_elements.is_empty());
        assert_eq!(config.format_options(), FormatOptions::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
indent_width = 2
print_width = 80
void_elements = ["Icon", "x-spacer"]
"#,
        );

        let config = Config::load_from_path(&path).unwrap().unwrap();

        assert_eq!(
            config,
            Config {
                indent_width: 2,
                print_width: 80,
                void_elements: vec!["Icon".to_string(), "x-spacer".to_string()],
            }
        );
        let options = config.format_options();
        assert_eq!(options.indent_width, 2);
        assert_eq!(options.parse.void_elements, config.void_elements);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "print_width = 120\n");

        let config = Config::load_from_path(&path).unwrap().unwrap();

        assert_eq!(config.print_width, 120);
        assert_eq!(config.indent_width, 4);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "indent_width = \"wide\"\n");

        let err = Config::load_from_path(&path).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "tab_width = 4\n");

        let err = Config::load_from_path(&path).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "indent_width = 0\n");

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "indent_width",
                value: 0,
                ..
            }
        ));

        let narrow = Config {
            print_width: 10,
            ..Config::default()
        };
        assert!(matches!(
            narrow.validate(),
            Err(ConfigError::InvalidValue {
                field: "print_width",
                ..
            })
        ));
    }

    #[test]
    fn test_discover_walks_up_to_project_root() {
        let temp_dir = TempDir::new().unwrap();
        let expected = write_config(temp_dir.path(), "indent_width = 2\n");
        let nested = temp_dir.path().join("Pages").join("Shared");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover(&nested), Some(expected));
    }

    #[test]
    fn test_discover_without_config() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("empty");
        std::fs::create_dir_all(&nested).unwrap();

        // Ancestors of a temp dir may hold a config on odd machines, so only
        // check that any hit is a config file outside the temp dir.
        if let Some(found) = Config::discover(&nested) {
            assert!(!found.starts_with(temp_dir.path()));
        }
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");

        let err = Config::load(Some(&missing)).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigReadError { .. }));
    }

    #[test]
    fn test_explicit_path_expands_env_vars() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), "indent_width = 3\n");
        unsafe {
            env::set_var("RAZORFMT_TEST_DIR", temp_dir.path());
        }

        let path = PathBuf::from(format!("$RAZORFMT_TEST_DIR/{CONFIG_FILE_NAME}"));
        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.indent_width, 3);

        unsafe {
            env::remove_var("RAZORFMT_TEST_DIR");
        }
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            indent_width: 2,
            print_width: 90,
            void_elements: vec!["Icon".to_string()],
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }
}
