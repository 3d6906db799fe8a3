use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = "feedback.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Contents of `anon-feedback.toml`. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FeedbackConfig {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
    pub cors: Option<bool>,
}

impl FeedbackConfig {
    /// Config written by `init`: every default spelled out
    pub fn with_defaults() -> Self {
        Self {
            database: Some(DEFAULT_DATABASE.to_string()),
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            static_dir: Some(DEFAULT_STATIC_DIR.to_string()),
            cors: Some(false),
        }
    }
}

/// Values given on the command line; these win over the config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub database: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
}

/// Fully resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub cors: bool,
}

impl ServerSettings {
    /// Resolve settings: CLI flag, then config file, then built-in default.
    pub fn resolve(overrides: SettingsOverrides, config: Option<&FeedbackConfig>) -> Self {
        let config = config.cloned().unwrap_or_default();

        Self {
            database: overrides
                .database
                .unwrap_or_else(|| PathBuf::from(config.database.as_deref().unwrap_or(DEFAULT_DATABASE))),
            host: overrides
                .host
                .or(config.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(config.port).unwrap_or(DEFAULT_PORT),
            static_dir: overrides
                .static_dir
                .unwrap_or_else(|| PathBuf::from(config.static_dir.as_deref().unwrap_or(DEFAULT_STATIC_DIR))),
            cors: config.cors.unwrap_or(false),
        }
    }

    /// `host:port` string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("anon-feedback.toml")
}

/// Database path for commands that only need storage
pub fn resolve_database(cli: Option<PathBuf>, config: Option<&FeedbackConfig>) -> PathBuf {
    cli.or_else(|| config.and_then(|c| c.database.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<FeedbackConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: FeedbackConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &FeedbackConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anon-feedback.toml");

        write_config(&path, &FeedbackConfig::with_defaults(), false).unwrap();
        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, FeedbackConfig::with_defaults());
    }

    #[test]
    fn test_write_config_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anon-feedback.toml");
        std::fs::write(&path, "port = 8080\n").unwrap();

        assert!(write_config(&path, &FeedbackConfig::default(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "port = 8080\n");

        write_config(&path, &FeedbackConfig::with_defaults(), true).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().unwrap().port, Some(DEFAULT_PORT));
    }

    #[test]
    fn test_partial_config_parses() {
        let config: FeedbackConfig = toml::from_str("port = 8080\ncors = true\n").unwrap();
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.cors, Some(true));
        assert!(config.database.is_none());
    }

    #[test]
    fn test_settings_precedence() {
        let config = FeedbackConfig {
            database: Some("from-config.db".to_string()),
            host: Some("127.0.0.1".to_string()),
            port: Some(8080),
            static_dir: None,
            cors: Some(true),
        };
        let overrides = SettingsOverrides {
            port: Some(9090),
            ..Default::default()
        };

        let settings = ServerSettings::resolve(overrides, Some(&config));
        assert_eq!(settings.database, PathBuf::from("from-config.db"));
        assert_eq!(settings.bind_address(), "127.0.0.1:9090");
        assert_eq!(settings.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert!(settings.cors);
    }

    #[test]
    fn test_settings_defaults_without_config() {
        let settings = ServerSettings::resolve(SettingsOverrides::default(), None);
        assert_eq!(settings.database, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(settings.bind_address(), "0.0.0.0:5000");
        assert!(!settings.cors);
    }

    #[test]
    fn test_resolve_database() {
        let config = FeedbackConfig {
            database: Some("data/feedback.db".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_database(None, Some(&config)), PathBuf::from("data/feedback.db"));
        assert_eq!(
            resolve_database(Some(PathBuf::from("cli.db")), Some(&config)),
            PathBuf::from("cli.db")
        );
        assert_eq!(resolve_database(None, None), PathBuf::from(DEFAULT_DATABASE));
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("feedback.db");

        ensure_db_dir(&db_path).unwrap();
        assert!(db_path.parent().unwrap().is_dir());
        ensure_db_dir(Path::new("feedback.db")).unwrap();
    }
}
