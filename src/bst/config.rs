//! Configuration loading.
//!
//! `defaults/bst.default.toml` is embedded into the crate so that documentation and runtime
//! behavior stay in sync. Callers layer their own files and overrides on top of it via
//! [Loader] before deserializing into [BstConfig].

use crate::bst::formats::DumpOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/bst.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BstConfig {
    pub parser: ParserConfig,
    pub dump: DumpConfig,
}

/// Limits applied by [Parser](crate::bst::parsing::Parser).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    /// 0 means unlimited.
    pub max_input_bytes: usize,
}

/// Controls tree dumps.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DumpConfig {
    pub format: DumpFormat,
    pub show_ranges: bool,
    pub include_trivia: bool,
}

impl DumpConfig {
    pub fn options(&self) -> DumpOptions {
        DumpOptions {
            show_ranges: self.show_ranges,
            include_trivia: self.include_trivia,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    Sexp,
    Treeviz,
    Json,
    Yaml,
}

impl DumpFormat {
    /// Name of the format in the [FormatRegistry](crate::bst::formats::FormatRegistry).
    pub fn name(self) -> &'static str {
        match self {
            DumpFormat::Sexp => "sexp",
            DumpFormat::Treeviz => "treeviz",
            DumpFormat::Json => "json",
            DumpFormat::Yaml => "yaml",
        }
    }
}

/// Builds a [BstConfig] from the embedded `bst.default.toml` plus whatever TOML files and
/// dotted-key overrides are stacked on it. Later layers win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Stack a TOML file, such as the one passed with `--config`. `build` fails if it is missing.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Like [Loader::with_file], for a file that may not exist.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, e.g. `parser.max_input_bytes`, above every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<BstConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<BstConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parser.max_input_bytes, 0);
        assert_eq!(config.dump.format, DumpFormat::Sexp);
        assert_eq!(config.dump.options(), DumpOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("dump.format", "treeviz")
            .expect("override to apply")
            .set_override("parser.max_input_bytes", 1024_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.dump.format, DumpFormat::Treeviz);
        assert_eq!(config.parser.max_input_bytes, 1024);
    }

    #[test]
    fn files_layer_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dump]\nshow_ranges = true").unwrap();
        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert!(config.dump.show_ranges);
        assert_eq!(config.dump.format, DumpFormat::Sexp);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/bst.toml")
            .build()
            .unwrap();
        assert_eq!(config.dump.format, DumpFormat::Sexp);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(Loader::new().with_file("/nonexistent/bst.toml").build().is_err());
    }

    #[test]
    fn overrides_win_over_files() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dump]\nformat = \"json\"").unwrap();
        let config = Loader::new()
            .set_override("dump.format", "yaml")
            .unwrap()
            .with_file(file.path())
            .build()
            .unwrap();
        assert_eq!(config.dump.format, DumpFormat::Yaml);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Loader::new()
            .set_override("dump.format", "xml")
            .unwrap()
            .build();
        assert!(result.is_err());
    }
}
