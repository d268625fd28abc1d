//! Application configuration.
//!
//! Settings come from `config/default.toml` (or `--config`), then from
//! `PASSFORGE_*` environment variables, then from command-line flags. A
//! missing file or section falls back to the defaults below.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use passforge_vault::{CharClasses, policy};
use serde::Deserialize;

/// Environment variable overriding `[storage] database`.
pub const ENV_DATABASE: &str = "PASSFORGE_DB";

/// Environment variable overriding `[logging] level`.
pub const ENV_LOG_LEVEL: &str = "PASSFORGE_LOG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

/// `[storage]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file holding saved passwords.
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("data/passforge.db"),
        }
    }
}

/// `[generator]` -- defaults for `generate` and `save`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub special: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let classes = CharClasses::default();
        Self {
            length: policy::DEFAULT_LENGTH,
            lowercase: classes.lowercase,
            uppercase: classes.uppercase,
            digits: classes.digits,
            special: classes.special,
        }
    }
}

impl GeneratorConfig {
    pub fn classes(&self) -> CharClasses {
        CharClasses::from_flags(self.lowercase, self.uppercase, self.digits, self.special)
    }
}

/// `[logging]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config {}", path.display()));
            }
        };
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `PASSFORGE_*` overrides, looking each variable up with `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(db) = lookup(ENV_DATABASE) {
            self.storage.database = PathBuf::from(db);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.storage.database, PathBuf::from("data/passforge.db"));
        assert_eq!(config.generator.length, policy::DEFAULT_LENGTH);
        assert_eq!(config.generator.classes(), CharClasses::default());
        assert!(config.generator.special);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::parse(
            r#"
            [generator]
            length = 24
            special = false
            "#,
        )
        .unwrap();
        assert_eq!(config.generator.length, 24);
        assert_eq!(
            config.generator.classes(),
            CharClasses::from_flags(true, true, true, false)
        );
        assert_eq!(config.storage.database, PathBuf::from("data/passforge.db"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(AppConfig::parse("[generator]\nlength = \"long\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.generator.length, policy::DEFAULT_LENGTH);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passforge.toml");
        std::fs::write(&path, "[storage]\ndatabase = \"/var/lib/pf.db\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.storage.database, PathBuf::from("/var/lib/pf.db"));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = AppConfig::default();
        config.apply_env(|name| match name {
            ENV_DATABASE => Some("/tmp/override.db".into()),
            ENV_LOG_LEVEL => Some("debug".into()),
            _ => None,
        });
        assert_eq!(config.storage.database, PathBuf::from("/tmp/override.db"));
        assert_eq!(config.logging.level, "debug");
    }
}
