//! Project configuration module.
//!
//! Handles loading and validating the optional `config.toml` at the
//! project root. Stock defaults describe the standard project layout; a user
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! components_dir = "components"            # Flat directory of HTML fragments
//! articles_dir = "articles"                # One subdirectory per article
//! templates_dir = "templates"              # Page templates and partials
//! article_template = "article-template.html"
//! index_template = "index.html"
//! stylesheet = "index.css"                 # Copied to the output root
//! output_dir = "public"                    # Wiped and rebuilt on every run
//! metadata_file = "metadata.json"          # Per-article metadata record
//! body_file = "body.html"                  # Per-article body markup
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Output Directory Safety
//!
//! The output directory is deleted recursively at the start of every build,
//! so it must resolve strictly inside the project root: a relative path made
//! of normal components only. `..`, absolute paths, `.` and the empty string
//! are validation errors. It must also not equal, contain or sit inside any
//! input: the components, articles and templates directories or the
//! stylesheet.

use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project layout loaded from `config.toml`.
///
/// All fields have defaults matching the standard layout. Unknown keys are
/// rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory of reusable HTML fragments, one component per file.
    pub components_dir: String,
    /// Directory holding one subdirectory per article.
    pub articles_dir: String,
    /// Directory holding the page templates and any partials they include.
    pub templates_dir: String,
    /// Template file (inside `templates_dir`) rendered once per article.
    pub article_template: String,
    /// Template file (inside `templates_dir`) rendered into `index.html`.
    pub index_template: String,
    /// Stylesheet at the project root, copied verbatim to the output.
    pub stylesheet: String,
    /// Output directory, relative to the project root.
    pub output_dir: String,
    /// Metadata record expected in every article directory.
    pub metadata_file: String,
    /// Body markup expected in every article directory.
    pub body_file: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            components_dir: "components".to_string(),
            articles_dir: "articles".to_string(),
            templates_dir: "templates".to_string(),
            article_template: "article-template.html".to_string(),
            index_template: "index.html".to_string(),
            stylesheet: "index.css".to_string(),
            output_dir: "public".to_string(),
            metadata_file: "metadata.json".to_string(),
            body_file: "body.html".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate that every configured name is usable and that the output
    /// directory stays inside the project root, clear of every input.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dirs = [
            ("components_dir", &self.components_dir),
            ("articles_dir", &self.articles_dir),
            ("templates_dir", &self.templates_dir),
        ];
        for (key, value) in dirs {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }

        let file_names = [
            ("article_template", &self.article_template),
            ("index_template", &self.index_template),
            ("stylesheet", &self.stylesheet),
            ("metadata_file", &self.metadata_file),
            ("body_file", &self.body_file),
        ];
        for (key, value) in file_names {
            if !is_plain_file_name(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a plain file name, got {value:?}"
                )));
            }
        }

        if !is_contained_relative_path(&self.output_dir) {
            return Err(ConfigError::Validation(format!(
                "output_dir must be a relative path inside the project root, got {:?}",
                self.output_dir
            )));
        }

        let output = lexical_components(&self.output_dir);
        let inputs = dirs.into_iter().chain([("stylesheet", &self.stylesheet)]);
        for (key, value) in inputs {
            let input = lexical_components(value);
            if output.starts_with(&input) || input.starts_with(&output) {
                return Err(ConfigError::Validation(format!(
                    "output_dir {:?} overlaps {key} {value:?}",
                    self.output_dir
                )));
            }
        }
        Ok(())
    }
}

/// True if `name` is a single normal path component (no separators, not `.`/`..`).
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// True if `path` is non-empty, relative and made only of normal components.
fn is_contained_relative_path(path: &str) -> bool {
    let path = Path::new(path);
    let mut saw_normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => saw_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    saw_normal
}

/// Components of `path` with `.` dropped and `name/..` pairs folded away.
fn lexical_components(path: &str) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(out.last(), Some(Component::Normal(_))) => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Load the project config from `config.toml` in the project root.
///
/// A missing file yields the stock defaults. Keys absent from the file keep
/// their defaults through `#[serde(default)]`.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);
    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A project root paired with its resolved configuration.
///
/// Every path the build touches is derived from here; nothing is resolved
/// against the process working directory.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: SiteConfig,
}

impl Project {
    /// Open the project at `root`, loading its `config.toml` if present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        let config = load_config(&root)?;
        Ok(Self { root, config })
    }

    /// A project at `root` using `config` as-is (already validated).
    pub fn with_config(root: impl Into<PathBuf>, config: SiteConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn components_dir(&self) -> PathBuf {
        self.root.join(&self.config.components_dir)
    }

    pub fn articles_dir(&self) -> PathBuf {
        self.root.join(&self.config.articles_dir)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(&self.config.templates_dir)
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        self.root.join(&self.config.stylesheet)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Blog Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Paths are relative to the project root (the directory holding this file).

# Flat directory of reusable HTML fragments. Each file becomes a template
# variable named after the file without its extension (header.html -> header).
components_dir = "components"

# One subdirectory per article, each holding a metadata record and a body.
# Subdirectories missing either file are skipped.
articles_dir = "articles"

# Page templates. Every file in this directory can be included by name.
templates_dir = "templates"
article_template = "article-template.html"
index_template = "index.html"

# Stylesheet copied byte-for-byte into the output directory.
stylesheet = "index.css"

# Output directory. DELETED AND RECREATED on every build.
# Must be a relative path inside the project root, apart from the
# directories and stylesheet above.
output_dir = "public"

# File names expected inside every article directory.
metadata_file = "metadata.json"
body_file = "body.html"
"##
}
