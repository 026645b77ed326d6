//! Viewer configuration.
//!
//! Resolution order (later wins):
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config`)
//! 3. `PORT` environment variable
//! 4. Command-line flags
//!
//! `PORT` and the flags arrive together through clap, which already gives
//! the flag precedence over the environment.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! port = 3000
//!
//! [markdown]
//! breaks = true
//! ```

mod error;
mod serve;

pub use error::ConfigError;
pub use serve::ServeConfig;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::log;
use crate::render::MarkdownOptions;
use crate::utils::path::{expand_path, normalize_path};

/// Document viewed when no file argument is given.
pub const DEFAULT_DOCUMENT: &str = "docs.md";

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// `[serve]` section
    pub serve: ServeConfig,

    /// `[markdown]` section
    pub markdown: MarkdownOptions,

    /// Absolute path of the watched document (CLI only)
    #[serde(skip)]
    pub document: PathBuf,

    /// Verbose logging (CLI only)
    #[serde(skip)]
    pub verbose: bool,
}

impl ViewerConfig {
    /// Load configuration from file (if given) and apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_path(&expand_path(path))?,
            None => Self::default(),
        };

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring: {}", path.display(), fields.join(", "));
    }

    fn apply_cli(&mut self, cli: &Cli) {
        self.document = match &cli.file {
            Some(file) => expand_path(file),
            None => normalize_path(Path::new(DEFAULT_DOCUMENT)),
        };

        let serve = &mut self.serve;
        if let Some(port) = cli.port {
            serve.port = port;
        }
        if let Some(interface) = cli.interface {
            serve.interface = interface;
        }
        if let Some(ws_port) = cli.ws_port {
            serve.ws_port = Some(ws_port);
        }
        if let Some(debounce) = cli.debounce {
            serve.debounce_ms = debounce;
        }
        if let Some(assets) = &cli.assets {
            serve.assets = Some(expand_path(assets));
        }

        self.verbose = cli.verbose;
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.serve.max_port_attempts == 0 {
            return Err(ConfigError::Validation(
                "serve.max_port_attempts must be at least 1".into(),
            ));
        }
        if self.serve.port == 0 {
            return Err(ConfigError::Validation(
                "serve.port must be between 1 and 65535".into(),
            ));
        }
        Ok(())
    }

    /// Directory static assets are served from.
    pub fn assets_dir(&self) -> PathBuf {
        self.serve.assets.clone().unwrap_or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| normalize_path(Path::new(".")))
        })
    }
}

/// Parse config content for tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ViewerConfig {
    let (parsed, ignored) = ViewerConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(ViewerConfig::parse_with_ignored("[serve\nport = 1").is_err());
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) =
            ViewerConfig::parse_with_ignored("[serve]\nport = 9000\ncolour = true\n[extra]\nx = 1")
                .unwrap();
        assert_eq!(config.serve.port, 9000);
        assert_eq!(ignored, vec!["serve.colour".to_string(), "extra".to_string()]);
    }

    #[test]
    fn test_markdown_section() {
        let config = test_parse_config("[markdown]\nbreaks = true\ntables = false");
        assert!(config.markdown.breaks);
        assert!(!config.markdown.tables);
        assert!(config.markdown.footnotes);
    }

    #[test]
    fn test_default_document_is_absolute() {
        let cli = Cli::try_parse_from(["mdview"]).unwrap();
        let config = ViewerConfig::load(&cli).unwrap();
        assert!(config.document.is_absolute());
        assert!(config.document.ends_with(DEFAULT_DOCUMENT));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("mdview.toml");
        fs::write(&config_path, "[serve]\nport = 3000\ndebounce_ms = 50").unwrap();

        let cli = Cli::try_parse_from([
            "mdview",
            "notes.md",
            "--config",
            config_path.to_str().unwrap(),
            "--port",
            "4000",
        ])
        .unwrap();
        let config = ViewerConfig::load(&cli).unwrap();

        assert_eq!(config.serve.port, 4000);
        assert_eq!(config.serve.debounce_ms, 50);
        assert!(config.document.ends_with("notes.md"));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["mdview", "--config", "/definitely/missing.toml"]).unwrap();
        assert!(matches!(
            ViewerConfig::load(&cli),
            Err(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = test_parse_config("[serve]\nmax_port_attempts = 0");
        config.apply_cli(&Cli::default());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_assets_dir_override() {
        let cli = Cli::try_parse_from(["mdview", "--assets", "/srv/static"]).unwrap();
        let config = ViewerConfig::load(&cli).unwrap();
        assert_eq!(config.assets_dir(), PathBuf::from("/srv/static"));
    }
}
