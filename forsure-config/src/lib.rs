//! Shared configuration loader for the ForSure tools.
//!
//! `defaults/forsure.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ForsureConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use forsure_parser::forsure::defaults::ProjectType;
use forsure_parser::forsure::formats::{Format, RenderOptions};
use forsure_parser::forsure::parsing::ParseOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/forsure.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "forsure.toml";

/// Top-level configuration consumed by ForSure applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ForsureConfig {
    pub parser: ParserConfig,
    pub render: RenderConfig,
    pub project: ProjectConfig,
}

/// Mirrors [ParseOptions].
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub indent_unit: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub format: Format,
    pub description_preview: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Skeleton handed out when a document cannot be parsed
    pub default_type: ProjectType,
}

impl ForsureConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            indent_unit: self.parser.indent_unit,
            max_depth: self.parser.max_depth,
        }
    }

    /// Terse output shares the parser's indent unit so rendered files parse back.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent_unit: self.parser.indent_unit,
            description_preview: self.render.description_preview,
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.parser.indent_unit == 0 {
            return Err(ConfigError::Message(
                "parser.indent_unit must be at least 1".to_string(),
            ));
        }
        if self.parser.max_depth == 0 {
            return Err(ConfigError::Message(
                "parser.max_depth must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Builds a [ForsureConfig] from the embedded defaults and whatever the command line adds.
///
/// `forsure` layers, lowest first: the defaults, [LOCAL_CONFIG_FILE] in the working directory,
/// the file named by `--config`, then flags such as `--indent-unit`. Later layers win key by key.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer the file named by `--config`. The user asked for it, so a missing file fails
    /// [Loader::build].
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a file that may not exist, such as `./forsure.toml` in a directory without one.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Pin one dotted key, e.g. `parser.indent_unit` from `--indent-unit`. Overrides beat
    /// every file layer regardless of call order.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and sanity-check the resulting configuration.
    pub fn build(self) -> Result<ForsureConfig, ConfigError> {
        self.builder
            .build()?
            .try_deserialize::<ForsureConfig>()?
            .validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ForsureConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parse_options(), ParseOptions::default());
        assert_eq!(config.render_options(), RenderOptions::default());
        assert_eq!(config.render.format, Format::Terse);
        assert_eq!(config.project.default_type, ProjectType::Generic);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("render.format", "treeviz")
            .expect("override to apply")
            .set_override("project.default_type", "nextjs")
            .expect("override to apply")
            .set_override("parser.indent_unit", 4u64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.render.format, Format::Treeviz);
        assert_eq!(config.project.default_type, ProjectType::NextJs);
        assert_eq!(config.parse_options().indent_unit, 4);
        assert_eq!(config.render_options().indent_unit, 4);
    }

    #[test]
    fn rejects_unknown_format() {
        let result = Loader::new()
            .set_override("render.format", "xml")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_indent_unit() {
        let error = Loader::new()
            .set_override("parser.indent_unit", 0u64)
            .expect("override to apply")
            .build()
            .unwrap_err();
        assert!(error.to_string().contains("indent_unit"));
    }

    #[test]
    fn layers_files_over_defaults() {
        let dir = std::env::temp_dir().join(format!("forsure-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("forsure.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[parser]\nmax_depth = 8").unwrap();

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.parser.max_depth, 8);
        assert_eq!(config.parser.indent_unit, 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn flags_beat_config_file_beats_local_file() {
        let dir = std::env::temp_dir().join(format!("forsure-layers-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let local = dir.join(LOCAL_CONFIG_FILE);
        std::fs::write(&local, "[parser]\nindent_unit = 3\nmax_depth = 16\n\n[render]\nformat = \"json\"\n").unwrap();
        let explicit = dir.join("custom.toml");
        std::fs::write(&explicit, "[parser]\nindent_unit = 4\nmax_depth = 32\n").unwrap();

        let config = Loader::new()
            .set_override("parser.indent_unit", 8u64)
            .expect("override to apply")
            .with_optional_file(&local)
            .with_file(&explicit)
            .build()
            .expect("config to build");
        assert_eq!(config.parser.indent_unit, 8);
        assert_eq!(config.parser.max_depth, 32);
        assert_eq!(config.render.format, Format::Json);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/forsure.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.parser.max_depth, 512);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/definitely/not/here/forsure.toml")
            .build();
        assert!(result.is_err());
    }
}
