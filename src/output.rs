//! CLI output formatting.
//!
//! Progress lines are informational only; nothing parses them.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Components: footer, header
//! Skipped articles/unfinished-draft (missing body.html)
//! Loaded Hello, World
//!     Source: articles/2021-03-hello/
//! Removed public/
//! Created public/
//! Wrote Hello, World → public/hello-world.html
//! Wrote index → public/index.html (3 articles)
//! Copied stylesheet → public/index.css
//! ```
//!
//! ## Check
//!
//! ```text
//! Components
//!     001 footer
//!     002 header
//!
//! Articles
//!     001 Hello, World → hello-world.html
//!         Source: articles/2021-03-hello/
//!
//! Skipped
//!     articles/unfinished-draft/ (missing body.html)
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function is pure and returns `Vec<String>` for testability;
//! the matching `print_*` wrapper writes the lines to stdout.

use crate::config::SiteConfig;
use crate::content::SkippedArticle;
use crate::site::{BuildEvent, BuildReport, SiteContent, page_file_name};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Display `path` relative to `root` when it lies inside it.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

/// Which of the required files an article directory was missing.
fn missing_files(skipped: &SkippedArticle, config: &SiteConfig) -> String {
    let mut missing = Vec::new();
    if skipped.missing_metadata {
        missing.push(config.metadata_file.as_str());
    }
    if skipped.missing_body {
        missing.push(config.body_file.as_str());
    }
    format!("missing {}", missing.join(" and "))
}

/// Title for display, falling back to the file name when untitled.
fn display_title(title: Option<&str>, fallback: &Path) -> String {
    match title {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => format!(
            "({})",
            fallback
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default()
        ),
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format a single build progress event.
pub fn format_build_event(event: &BuildEvent, root: &Path, config: &SiteConfig) -> Vec<String> {
    match event {
        BuildEvent::ComponentsLoaded { names } => {
            if names.is_empty() {
                vec!["Components: (none)".to_string()]
            } else {
                vec![format!("Components: {}", names.join(", "))]
            }
        }
        BuildEvent::ArticleLoaded { dir, title } => vec![
            format!("Loaded {}", display_title(title.as_deref(), dir)),
            format!("    Source: {}/", relative(dir, root)),
        ],
        BuildEvent::ArticleSkipped(skipped) => vec![format!(
            "Skipped {} ({})",
            relative(&skipped.dir, root),
            missing_files(skipped, config)
        )],
        BuildEvent::OutputRemoved { dir } => vec![format!("Removed {}/", relative(dir, root))],
        BuildEvent::OutputCreated { dir } => vec![format!("Created {}/", relative(dir, root))],
        BuildEvent::ArticleWritten { title, path } => vec![format!(
            "Wrote {} → {}",
            display_title(title.as_deref(), path),
            relative(path, root)
        )],
        BuildEvent::IndexWritten {
            path,
            article_count,
        } => {
            let noun = if *article_count == 1 { "article" } else { "articles" };
            vec![format!(
                "Wrote index → {} ({} {})",
                relative(path, root),
                article_count,
                noun
            )]
        }
        BuildEvent::StylesheetCopied { path } => {
            vec![format!("Copied stylesheet → {}", relative(path, root))]
        }
    }
}

/// Print a single build progress event to stdout.
pub fn print_build_event(event: &BuildEvent, root: &Path, config: &SiteConfig) {
    for line in format_build_event(event, root, config) {
        println!("{}", line);
    }
}

/// Format the closing summary of a successful build.
pub fn format_build_summary(report: &BuildReport, root: &Path) -> Vec<String> {
    let mut summary = format!(
        "Generated {} article page{} and index from {} component{}",
        report.pages.len(),
        if report.pages.len() == 1 { "" } else { "s" },
        report.component_count,
        if report.component_count == 1 { "" } else { "s" },
    );
    if !report.skipped.is_empty() {
        summary.push_str(&format!(", skipped {}", report.skipped.len()));
    }
    vec![summary, format!("Site ready at {}/", relative(&report.output_dir, root))]
}

pub fn print_build_summary(report: &BuildReport, root: &Path) {
    for line in format_build_summary(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the content inventory of a checked project.
pub fn format_check_output(site: &SiteContent, root: &Path, config: &SiteConfig) -> Vec<String> {
    let mut lines = vec!["Components".to_string()];
    if site.components.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, name) in site.components.keys().enumerate() {
        lines.push(format!("    {} {}", format_index(i + 1), name));
    }

    lines.push(String::new());
    lines.push("Articles".to_string());
    if site.articles.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, article) in site.articles.iter().enumerate() {
        let target = page_file_name(article).unwrap_or_else(|e| format!("<{e}>"));
        lines.push(format!(
            "    {} {} → {}",
            format_index(i + 1),
            display_title(article.title(), article.dir()),
            target
        ));
        lines.push(format!("        Source: {}/", relative(article.dir(), root)));
    }

    if !site.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &site.skipped {
            lines.push(format!(
                "    {}/ ({})",
                relative(&skipped.dir, root),
                missing_files(skipped, config)
            ));
        }
    }

    lines
}

pub fn print_check_output(site: &SiteContent, root: &Path, config: &SiteConfig) {
    for line in format_check_output(site, root, config) {
        println!("{}", line);
    }
}
