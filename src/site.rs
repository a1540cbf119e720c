//! Site assembly: the build pipeline.
//!
//! [`render_site`] runs the whole build for one [`Project`]:
//!
//! ```text
//! 1. Load      components/, articles/, templates/   (nothing written yet)
//! 2. Prepare   public/ deleted and recreated
//! 3. Articles  public/<url>.html   for every valid article
//! 4. Index     public/index.html
//! 5. Assets    public/index.css    copied verbatim
//! ```
//!
//! Step 1 runs to completion before the output tree is touched, so a
//! malformed metadata record, a missing `url` or a broken template fails the
//! build with the previous output still in place. Any failure after step 2
//! leaves the output directory incomplete.
//!
//! Progress is reported synchronously through a caller-supplied callback; see
//! [`crate::output::format_build_event`] for the console rendering.

use crate::config::{Project, is_plain_file_name};
use crate::content::{self, Article, ArticleFiles, Components, ContentError, SkippedArticle};
use crate::context;
use crate::render::{RenderError, Templates};
use crate::tree::{OutputTree, TreeError};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("article {0} has no \"url\" field")]
    MissingUrl(PathBuf),
    #[error("article {dir} has an invalid \"url\" {url}: must be a plain file name")]
    InvalidUrl { dir: PathBuf, url: String },
}

/// Progress of a running build.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    ComponentsLoaded {
        names: Vec<String>,
    },
    ArticleLoaded {
        dir: PathBuf,
        title: Option<String>,
    },
    ArticleSkipped(SkippedArticle),
    OutputRemoved {
        dir: PathBuf,
    },
    OutputCreated {
        dir: PathBuf,
    },
    ArticleWritten {
        title: Option<String>,
        path: PathBuf,
    },
    IndexWritten {
        path: PathBuf,
        article_count: usize,
    },
    StylesheetCopied {
        path: PathBuf,
    },
}

/// Everything a build reads, loaded and validated.
#[derive(Debug)]
pub struct SiteContent {
    pub components: Components,
    pub articles: Vec<Article>,
    pub skipped: Vec<SkippedArticle>,
    pub templates: Templates,
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub component_count: usize,
    /// Written article pages, in load order.
    pub pages: Vec<PathBuf>,
    pub skipped: Vec<SkippedArticle>,
    pub index: PathBuf,
    pub stylesheet: PathBuf,
}

/// The output file name for an article: `<url>.html`.
///
/// `url` must be a string naming a single file; anything that would place
/// the page outside the output directory is rejected.
pub fn page_file_name(article: &Article) -> Result<String, BuildError> {
    let url = match article.url() {
        None => return Err(BuildError::MissingUrl(article.dir().to_path_buf())),
        Some(Value::String(url)) => url,
        Some(other) => {
            return Err(BuildError::InvalidUrl {
                dir: article.dir().to_path_buf(),
                url: other.to_string(),
            });
        }
    };
    if !is_plain_file_name(url) {
        return Err(BuildError::InvalidUrl {
            dir: article.dir().to_path_buf(),
            url: format!("{url:?}"),
        });
    }
    Ok(format!("{url}.html"))
}

fn load_content(
    project: &Project,
    on_event: &mut dyn FnMut(BuildEvent),
) -> Result<SiteContent, BuildError> {
    let config = &project.config;

    let components = content::load_components(&project.components_dir())?;
    on_event(BuildEvent::ComponentsLoaded {
        names: components.keys().cloned().collect(),
    });

    let files = ArticleFiles {
        metadata: &config.metadata_file,
        body: &config.body_file,
    };
    let loaded = content::load_articles(&project.articles_dir(), files)?;
    for skipped in &loaded.skipped {
        on_event(BuildEvent::ArticleSkipped(skipped.clone()));
    }
    for article in &loaded.articles {
        on_event(BuildEvent::ArticleLoaded {
            dir: article.dir().to_path_buf(),
            title: article.title().map(str::to_string),
        });
    }

    for article in &loaded.articles {
        page_file_name(article)?;
    }

    let templates = Templates::load(
        &project.templates_dir(),
        &config.article_template,
        &config.index_template,
    )?;

    Ok(SiteContent {
        components,
        articles: loaded.articles,
        skipped: loaded.skipped,
        templates,
    })
}

/// Load and validate a project's content and templates without writing
/// anything.
pub fn check_site(project: &Project) -> Result<SiteContent, BuildError> {
    load_content(project, &mut |_| {})
}

/// Build the site for `project`, reporting progress to `on_event`.
pub fn render_site(
    project: &Project,
    on_event: &mut dyn FnMut(BuildEvent),
) -> Result<BuildReport, BuildError> {
    let site = load_content(project, on_event)?;

    let output_dir = project.output_dir();
    let (tree, prepared) = OutputTree::prepare(&output_dir)?;
    if prepared.removed_previous {
        on_event(BuildEvent::OutputRemoved {
            dir: output_dir.clone(),
        });
    }
    on_event(BuildEvent::OutputCreated {
        dir: output_dir.clone(),
    });

    let mut pages = Vec::with_capacity(site.articles.len());
    for article in &site.articles {
        let ctx = context::article_context(article, &site.components);
        let html = site.templates.render_article(&ctx)?;
        let path = tree.write(&page_file_name(article)?, &html)?;
        on_event(BuildEvent::ArticleWritten {
            title: article.title().map(str::to_string),
            path: path.clone(),
        });
        pages.push(path);
    }

    let ctx = context::index_context(&site.articles, &site.components);
    let html = site.templates.render_index(&ctx)?;
    let index = tree.write("index.html", &html)?;
    on_event(BuildEvent::IndexWritten {
        path: index.clone(),
        article_count: site.articles.len(),
    });

    let stylesheet = tree.copy_file(&project.stylesheet_path())?;
    on_event(BuildEvent::StylesheetCopied {
        path: stylesheet.clone(),
    });

    Ok(BuildReport {
        output_dir,
        component_count: site.components.len(),
        pages,
        skipped: site.skipped,
        index,
        stylesheet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_helpers::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn build(root: &Path) -> Result<BuildReport, BuildError> {
        let project = Project::open(root).unwrap();
        render_site(&project, &mut |_| {})
    }

    fn article_with(fields: serde_json::Value) -> Article {
        match fields {
            Value::Object(map) => Article::new("articles/x", map),
            _ => unreachable!(),
        }
    }

    // =========================================================================
    // URL validation
    // =========================================================================

    #[test]
    fn page_file_name_from_url() {
        let article = article_with(json!({"url": "hello-world"}));
        assert_eq!(page_file_name(&article).unwrap(), "hello-world.html");
    }

    #[test]
    fn page_file_name_requires_url() {
        let article = article_with(json!({"title": "No url"}));
        assert!(matches!(
            page_file_name(&article),
            Err(BuildError::MissingUrl(_))
        ));
    }

    #[test]
    fn page_file_name_rejects_unsafe_urls() {
        for url in [json!(""), json!("a/b"), json!(".."), json!("..\\x"), json!(7)] {
            let article = article_with(json!({ "url": url }));
            assert!(
                matches!(page_file_name(&article), Err(BuildError::InvalidUrl { .. })),
                "{url} should be rejected"
            );
        }
    }

    // =========================================================================
    // Full builds over the fixture project
    // =========================================================================

    #[test]
    fn build_writes_every_artifact() {
        let tmp = setup_fixtures();
        let report = build(tmp.path()).unwrap();

        let public = tmp.path().join("public");
        assert_eq!(report.output_dir, public);
        assert_eq!(
            output_file_names(&public),
            vec![
                "hello-world.html",
                "index.css",
                "index.html",
                "on-templates.html",
                "shipping-static.html",
            ]
        );
        assert_eq!(report.pages.len(), 3);
        assert_eq!(report.component_count, 2);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn article_page_overlays_fields_on_components() {
        let tmp = setup_fixtures();
        build(tmp.path()).unwrap();

        let html = read_output(tmp.path(), "hello-world.html");
        assert!(html.contains("<title>Hello, World</title>"));
        assert!(html.contains("<time>2021-03-14</time>"));
        assert!(html.contains("<p>The first post on this blog.</p>"));
        assert!(html.contains(r#"<header class="site-header">"#));
        assert!(html.contains("Written by Ada"));
    }

    #[test]
    fn article_field_shadows_component() {
        let tmp = setup_fixtures();
        build(tmp.path()).unwrap();

        // shipping-static's metadata carries its own "footer" field
        let html = read_output(tmp.path(), "shipping-static.html");
        assert!(html.contains("<footer>Custom footer for this post</footer>"));
        assert!(!html.contains("site-footer"));

        let html = read_output(tmp.path(), "on-templates.html");
        assert!(html.contains("site-footer"));
    }

    #[test]
    fn index_lists_articles_in_load_order() {
        let tmp = setup_fixtures();
        build(tmp.path()).unwrap();

        let html = read_output(tmp.path(), "index.html");
        let pages = ["hello-world.html", "on-templates.html", "shipping-static.html"];
        let positions: Vec<usize> = pages
            .iter()
            .map(|href| html.find(href).unwrap_or_else(|| panic!("{href} missing")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains("3 articles"));
        assert!(html.contains(r#"<header class="site-header">"#));
    }

    #[test]
    fn stylesheet_copied_byte_for_byte() {
        let tmp = setup_fixtures();
        let bytes: Vec<u8> = b"body { color: red; }\n\xff\xfe\x00".to_vec();
        fs::write(tmp.path().join("index.css"), &bytes).unwrap();

        let report = build(tmp.path()).unwrap();
        assert_eq!(fs::read(report.stylesheet).unwrap(), bytes);
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let tmp = setup_fixtures();
        build(tmp.path()).unwrap();
        let first = snapshot_output(&tmp.path().join("public"));

        build(tmp.path()).unwrap();
        let second = snapshot_output(&tmp.path().join("public"));

        assert_eq!(first, second);
    }

    #[test]
    fn stale_output_removed() {
        let tmp = setup_fixtures();
        let public = tmp.path().join("public");
        fs::create_dir_all(public.join("old")).unwrap();
        fs::write(public.join("removed-post.html"), "stale").unwrap();

        let mut events = Vec::new();
        let project = Project::open(tmp.path()).unwrap();
        render_site(&project, &mut |e| events.push(e)).unwrap();

        assert!(!public.join("removed-post.html").exists());
        assert!(!public.join("old").exists());
        assert!(events.contains(&BuildEvent::OutputRemoved { dir: public.clone() }));
    }

    #[test]
    fn malformed_metadata_leaves_previous_output() {
        let tmp = setup_fixtures();
        build(tmp.path()).unwrap();
        let before = snapshot_output(&tmp.path().join("public"));

        let metadata = tmp.path().join("articles/2021-03-hello/metadata.json");
        fs::write(&metadata, r#"{"title": "Hello", "url": "#).unwrap();

        let err = build(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Content(ContentError::MalformedMetadata { .. })
        ));
        assert!(err.to_string().contains("2021-03-hello"));
        assert_eq!(snapshot_output(&tmp.path().join("public")), before);
    }

    #[test]
    fn missing_url_fails_before_writing() {
        let tmp = setup_fixtures();
        let metadata = tmp.path().join("articles/2021-04-templates/metadata.json");
        fs::write(&metadata, r#"{"title": "No url here"}"#).unwrap();

        let err = build(tmp.path()).unwrap_err();
        assert!(matches!(err, BuildError::MissingUrl(_)));
        assert!(!tmp.path().join("public").exists());
    }

    #[test]
    fn missing_template_fails_before_writing() {
        let tmp = setup_fixtures();
        fs::remove_file(tmp.path().join("templates/index.html")).unwrap();

        let err = build(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Render(RenderError::MissingTemplate(_))
        ));
        assert!(!tmp.path().join("public").exists());
    }

    #[test]
    fn missing_stylesheet_fails_after_pages() {
        let tmp = setup_fixtures();
        fs::remove_file(tmp.path().join("index.css")).unwrap();

        let err = build(tmp.path()).unwrap_err();
        assert!(matches!(err, BuildError::Tree(TreeError::Copy { .. })));
        // Accepted: pages are already written, the stylesheet is not
        assert!(tmp.path().join("public/index.html").exists());
        assert!(!tmp.path().join("public/index.css").exists());
    }

    #[test]
    fn no_articles_still_builds_index() {
        let tmp = setup_fixtures();
        fs::remove_dir_all(tmp.path().join("articles")).unwrap();
        fs::create_dir_all(tmp.path().join("articles")).unwrap();

        let report = build(tmp.path()).unwrap();
        assert!(report.pages.is_empty());
        assert!(read_output(tmp.path(), "index.html").contains("0 articles"));
    }

    #[test]
    fn custom_output_dir_from_config() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("config.toml"), "output_dir = \"dist/site\"\n").unwrap();

        let report = build(tmp.path()).unwrap();
        assert_eq!(report.output_dir, tmp.path().join("dist/site"));
        assert!(tmp.path().join("dist/site/index.html").exists());
        assert!(!tmp.path().join("public").exists());
    }

    #[test]
    fn events_follow_pipeline_order() {
        let tmp = setup_fixtures();
        let project = Project::with_config(tmp.path(), SiteConfig::default());
        let mut events = Vec::new();
        render_site(&project, &mut |e| events.push(e)).unwrap();

        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                BuildEvent::ComponentsLoaded { .. } => "components",
                BuildEvent::ArticleLoaded { .. } => "loaded",
                BuildEvent::ArticleSkipped(_) => "skipped",
                BuildEvent::OutputRemoved { .. } => "removed",
                BuildEvent::OutputCreated { .. } => "created",
                BuildEvent::ArticleWritten { .. } => "written",
                BuildEvent::IndexWritten { .. } => "index",
                BuildEvent::StylesheetCopied { .. } => "stylesheet",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "components", "skipped", "loaded", "loaded", "loaded", "created", "written",
                "written", "written", "index", "stylesheet",
            ]
        );
    }

    #[test]
    fn check_site_writes_nothing() {
        let tmp = setup_fixtures();
        let project = Project::open(tmp.path()).unwrap();

        let site = check_site(&project).unwrap();
        assert_eq!(site.articles.len(), 3);
        assert_eq!(site.components.len(), 2);
        assert!(!tmp.path().join("public").exists());
    }
}
