//! Configuration file handling for seqgen.
//!
//! Looks for `.config/seqgen.toml` in the current directory or any parent
//! directory. A missing file is not an error; every setting has a default.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Location of the config file relative to a project directory.
pub const CONFIG_PATH: &str = ".config/seqgen.toml";

/// Settings read from `.config/seqgen.toml`. Command-line flags win over these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Database connection URL
    pub database_url: Option<String>,
    /// Schema to introspect
    pub schema: Option<String>,
    /// Output directory for generated models
    pub out: Option<Utf8PathBuf>,
    /// Camel-case property names
    pub camel_case: Option<bool>,
    /// Emit foreign key columns
    pub foreign_keys: Option<bool>,
    /// Treat sequence defaults as auto-increment
    pub auto_increment: Option<bool>,
}

/// Load configuration by searching up from the current directory.
///
/// Returns `None` when no config file exists.
pub fn load() -> Result<Option<(Config, Utf8PathBuf)>, ConfigError> {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: Utf8PathBuf::from("."),
        source,
    })?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(ConfigError::NonUtf8Path)?;
    load_from(&cwd)
}

/// Load configuration starting from a specific directory.
pub fn load_from(start: &Utf8Path) -> Result<Option<(Config, Utf8PathBuf)>, ConfigError> {
    let Some(config_path) = find_config_file(start) else {
        return Ok(None);
    };
    let config = load_file(&config_path)?;
    Ok(Some((config, config_path)))
}

/// Load a config file at an explicit path.
pub fn load_file(path: &Utf8Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Find `.config/seqgen.toml` by searching up the directory tree.
fn find_config_file(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_PATH);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("current directory is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(std::path::PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A scratch directory under the system temp dir, removed on drop.
    struct Scratch(Utf8PathBuf);

    impl Scratch {
        fn new(name: &str) -> Self {
            let base = Utf8PathBuf::from_path_buf(std::env::temp_dir()).unwrap();
            let dir = base.join(format!("seqgen-config-{}-{}", name, std::process::id()));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write_config(&self, contents: &str) {
            let path = self.0.join(CONFIG_PATH);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_found_in_parent_directory() {
        let scratch = Scratch::new("parent");
        scratch.write_config(
            r#"
database_url = "postgres://localhost/blog"
schema = "app"
out = "src/models"
camel_case = true
"#,
        );
        let nested = scratch.0.join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = load_from(&nested).unwrap().unwrap();
        assert_eq!(path, scratch.0.join(CONFIG_PATH));
        assert_eq!(
            config,
            Config {
                database_url: Some("postgres://localhost/blog".to_string()),
                schema: Some("app".to_string()),
                out: Some(Utf8PathBuf::from("src/models")),
                camel_case: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let scratch = Scratch::new("empty");
        scratch.write_config("");
        let (config, _) = load_from(&scratch.0).unwrap().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let scratch = Scratch::new("unknown");
        scratch.write_config("schemas = [\"public\"]\n");
        let err = load_from(&scratch.0).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Utf8Path::new("/nonexistent/seqgen.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
