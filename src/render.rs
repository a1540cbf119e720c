//! Template loading and rendering.
//!
//! Every template file in the templates directory is registered in one
//! [`minijinja::Environment`] under its file name, so page templates can pull
//! in shared partials:
//!
//! ```text
//! templates/
//! ├── article-template.html    # rendered once per article
//! ├── index.html               # rendered into index.html
//! └── article-entries.html     # {% include "article-entries.html" %}
//! ```
//!
//! Only files with a [`TEMPLATE_EXTENSIONS`] extension are registered, plus
//! the two configured page templates whatever their name. Editor backups and
//! other stray files are ignored.
//!
//! Placeholders resolve against the render context built in
//! [`crate::context`]. Unknown placeholders render as empty strings.
//! Auto-escaping follows the template's file extension, so `.html` templates
//! escape values unless marked `|safe`. Components and article bodies are
//! raw HTML and are normally inserted as `{{ header|safe }}`.

use crate::context::RenderContext;
use minijinja::Environment;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot list templates in {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("template not found: {0}")]
    MissingTemplate(PathBuf),
    #[error("template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// File extensions registered as templates.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "xml", "txt", "j2", "jinja"];

/// The parsed templates of a project.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
    article: String,
    index: String,
}

impl Templates {
    /// Parse every template in `dir`. `article` and `index` name the two
    /// page templates, which must be among them.
    pub fn load(dir: &Path, article: &str, index: &str) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|source| RenderError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if !path.is_file() || !(name == article || name == index || is_template_file(path)) {
                continue;
            }
            let source = fs::read_to_string(path).map_err(|source| RenderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            env.add_template_owned(name.clone(), source)
                .map_err(|source| RenderError::Template { name, source })?;
        }

        for name in [article, index] {
            if env.get_template(name).is_err() {
                return Err(RenderError::MissingTemplate(dir.join(name)));
            }
        }

        Ok(Self {
            env,
            article: article.to_string(),
            index: index.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_sources(article: &str, index: &str) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        for (name, source) in [("article.html", article), ("index.html", index)] {
            env.add_template_owned(name.to_string(), source.to_string())
                .map_err(|source| RenderError::Template {
                    name: name.to_string(),
                    source,
                })?;
        }
        Ok(Self {
            env,
            article: "article.html".to_string(),
            index: "index.html".to_string(),
        })
    }

    pub fn render_article(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        self.render(&self.article, ctx)
    }

    pub fn render_index(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        self.render(&self.index, ctx)
    }

    fn render(&self, name: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        let wrap = |source: minijinja::Error| RenderError::Template {
            name: name.to_string(),
            source,
        };
        self.env
            .get_template(name)
            .map_err(wrap)?
            .render(ctx)
            .map_err(wrap)
    }
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext))
}
