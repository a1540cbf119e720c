//! Content loading: components and articles.
//!
//! First stage of the build. Reads the two content directories of a project
//! into memory; nothing here writes to disk.
//!
//! ## Directory Structure
//!
//! ```text
//! blog/                            # Project root
//! ├── components/                  # One reusable fragment per file
//! │   ├── header.html              # → component "header"
//! │   └── footer.html              # → component "footer"
//! └── articles/
//!     ├── hello-world/
//!     │   ├── metadata.json        # {"title": ..., "url": ..., "pub_date": ...}
//!     │   └── body.html            # Raw article markup
//!     ├── second-post/
//!     │   ├── metadata.json
//!     │   └── body.html
//!     └── drafts/                  # No body.html → skipped, not an error
//!         └── metadata.json
//! ```
//!
//! ## Skipped vs Fatal
//!
//! An article directory that lacks its metadata record or its body file is
//! skipped and reported through [`LoadedArticles::skipped`]. An article whose
//! metadata exists but does not parse as a JSON object aborts the load with
//! [`ContentError::MalformedMetadata`] or [`ContentError::MetadataNotObject`].
//!
//! ## Ordering
//!
//! Entries are visited sorted by file name so repeated builds of the same
//! input produce the same output.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Metadata key for the article title.
pub const TITLE_KEY: &str = "title";
/// Metadata key for the output file stem (`<url>.html`).
pub const URL_KEY: &str = "url";
/// Metadata key for the publication date.
pub const PUB_DATE_KEY: &str = "pub_date";
/// Key the body file's content is injected under after loading.
pub const BODY_KEY: &str = "body";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("malformed metadata in article {dir}: {source}")]
    MalformedMetadata {
        dir: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("metadata in article {0} is not a JSON object")]
    MetadataNotObject(PathBuf),
}

/// Component name → fragment body.
pub type Components = BTreeMap<String, String>;

/// A single article: its metadata fields in file order, plus `body`.
///
/// The field set is open-ended. `title`, `url` and `pub_date` are expected in
/// every metadata record and `body` is always injected by the loader, but any
/// other key is carried through to the templates untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    fields: Map<String, Value>,
    dir: PathBuf,
}

impl Article {
    pub fn new(dir: impl Into<PathBuf>, fields: Map<String, Value>) -> Self {
        Self {
            fields,
            dir: dir.into(),
        }
    }

    /// The directory this article was loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str(TITLE_KEY)
    }

    /// The raw `url` field, if present. See [`crate::site`] for validation.
    pub fn url(&self) -> Option<&Value> {
        self.fields.get(URL_KEY)
    }

    pub fn pub_date(&self) -> Option<&str> {
        self.get_str(PUB_DATE_KEY)
    }

    pub fn body(&self) -> Option<&str> {
        self.get_str(BODY_KEY)
    }
}

/// An article directory that was left out of the build.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedArticle {
    pub dir: PathBuf,
    pub missing_metadata: bool,
    pub missing_body: bool,
}

/// Result of loading the articles directory.
#[derive(Debug, Default)]
pub struct LoadedArticles {
    /// Valid articles, in load order.
    pub articles: Vec<Article>,
    /// Directories skipped because a required file was missing.
    pub skipped: Vec<SkippedArticle>,
}

/// Names of the two files every article directory must contain.
#[derive(Debug, Clone, Copy)]
pub struct ArticleFiles<'a> {
    pub metadata: &'a str,
    pub body: &'a str,
}

impl Default for ArticleFiles<'static> {
    fn default() -> Self {
        Self {
            metadata: "metadata.json",
            body: "body.html",
        }
    }
}

/// Component name for a file: the file name with its last extension removed.
///
/// `header.html` → `header`, `a.b.html` → `a.b`, `.hidden` → `.hidden`.
pub fn component_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Immediate children of `dir`, sorted by file name.
fn sorted_children(dir: &Path) -> Result<Vec<walkdir::DirEntry>, ContentError> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            entry.map_err(|source| ContentError::Walk {
                path: dir.to_path_buf(),
                source,
            })
        })
        .collect()
}

fn read_text(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every regular file directly inside `dir` as a component.
///
/// Subdirectories are ignored. If two files share a stem (`nav.html` and
/// `nav.txt`) the one sorting last wins.
pub fn load_components(dir: &Path) -> Result<Components, ContentError> {
    let mut components = Components::new();
    for entry in sorted_children(dir)? {
        if !entry.path().is_file() {
            continue;
        }
        let body = read_text(entry.path())?;
        components.insert(component_name(entry.path()), body);
    }
    Ok(components)
}

/// Load every immediate subdirectory of `dir` as an article.
pub fn load_articles(dir: &Path, files: ArticleFiles<'_>) -> Result<LoadedArticles, ContentError> {
    let mut loaded = LoadedArticles::default();
    for entry in sorted_children(dir)? {
        if !entry.path().is_dir() {
            continue;
        }
        let article_dir = entry.path();
        let metadata_path = article_dir.join(files.metadata);
        let body_path = article_dir.join(files.body);

        let missing_metadata = !metadata_path.is_file();
        let missing_body = !body_path.is_file();
        if missing_metadata || missing_body {
            loaded.skipped.push(SkippedArticle {
                dir: article_dir.to_path_buf(),
                missing_metadata,
                missing_body,
            });
            continue;
        }

        loaded
            .articles
            .push(load_article(article_dir, &metadata_path, &body_path)?);
    }
    Ok(loaded)
}

/// Parse one article directory whose required files are known to exist.
fn load_article(
    dir: &Path,
    metadata_path: &Path,
    body_path: &Path,
) -> Result<Article, ContentError> {
    let raw = read_text(metadata_path)?;
    let value: Value =
        serde_json::from_str(&raw).map_err(|source| ContentError::MalformedMetadata {
            dir: dir.to_path_buf(),
            source,
        })?;
    let Value::Object(mut fields) = value else {
        return Err(ContentError::MetadataNotObject(dir.to_path_buf()));
    };

    let body = read_text(body_path)?;
    fields.insert(BODY_KEY.to_string(), Value::String(body));
    Ok(Article::new(dir, fields))
}
