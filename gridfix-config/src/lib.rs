//! Shared configuration loader for the gridfix tools.
//!
//! `defaults/gridfix.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer project and user
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`GridfixConfig`], which converts into the engine's [`EngineOptions`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use gridfix_engine::{EngineOptions, GridStrategy, LayoutConstants, RewriteOptions, TagRoles};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/gridfix.default.toml");

/// Project configuration file picked up from the working directory
///
/// A site converted page by page usually needs the same tag vocabulary and
/// row width for every file, so the CLI layers this file (when present) over
/// the defaults and under any `--config` file or flag.
pub const PROJECT_CONFIG_FILE: &str = "gridfix.toml";

/// Top-level configuration consumed by gridfix applications.
#[derive(Debug, Clone, Deserialize)]
pub struct GridfixConfig {
    pub layout: LayoutConfig,
    pub tags: TagsConfig,
    pub output: OutputConfig,
    pub document: DocumentConfig,
}

/// Width constants and the grid strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    pub max_row_width: u32,
    pub control_width: u32,
    pub min_width: u32,
    pub strategy: GridStrategy,
}

/// Which tags play which structural role.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsConfig {
    pub root: String,
    pub root_selector: String,
    pub tables: Vec<String>,
    pub sections: Vec<String>,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub controls: Vec<String>,
}

/// Markup written in place of rows and cells.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub row_tag: String,
    pub row_class: String,
    pub column_tag: String,
    pub column_class_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    pub backup: bool,
    pub backup_suffix: String,
}

impl GridfixConfig {
    pub fn to_engine_options(&self) -> EngineOptions {
        let tags = &self.tags;
        EngineOptions {
            constants: LayoutConstants {
                max_row_width: self.layout.max_row_width,
                control_width: self.layout.control_width,
                min_width: self.layout.min_width,
            },
            roles: TagRoles::new(
                &tags.tables,
                &tags.sections,
                &tags.rows,
                &tags.columns,
                &tags.controls,
                &tags.root,
            ),
            strategy: self.layout.strategy,
            rewrite: RewriteOptions {
                row_tag: self.output.row_tag.clone(),
                row_class: self.output.row_class.clone(),
                column_tag: self.output.column_tag.clone(),
                column_class_prefix: self.output.column_class_prefix.clone(),
            },
            root_selector: tags.root_selector.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
///
/// Later layers win key by key, so a project file that only sets
/// `layout.strategy` keeps every default tag list and output class.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded `gridfix.default.toml`.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GridfixConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Defaults only, with no project file; what [`EngineOptions::default`] mirrors.
pub fn load_defaults() -> Result<GridfixConfig, ConfigError> {
    Loader::new().build()
}
