//! Shared test utilities for the simple-blog test suite.
//!
//! Provides fixture setup, article lookups and output-tree inspection.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let project = Project::open(tmp.path()).unwrap();
//! render_site(&project, &mut |_| {}).unwrap();
//!
//! let html = read_output(tmp.path(), "hello-world.html");
//! assert!(html.contains("Hello, World"));
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

use crate::content::{Article, LoadedArticles};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/project/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/project");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Article lookups — panics with a clear message on miss
// =========================================================================

/// Find an article by its `url` field. Panics if not found.
pub fn find_article<'a>(articles: &'a [Article], url: &str) -> &'a Article {
    articles
        .iter()
        .find(|a| a.url().and_then(|u| u.as_str()) == Some(url))
        .unwrap_or_else(|| {
            let urls = article_urls(articles);
            panic!("article '{url}' not found. Available: {urls:?}")
        })
}

/// All article `url` fields in load order (empty string when absent).
pub fn article_urls(articles: &[Article]) -> Vec<&str> {
    articles
        .iter()
        .map(|a| a.url().and_then(|u| u.as_str()).unwrap_or(""))
        .collect()
}

/// Directory names of the skipped articles, in load order.
pub fn skipped_dir_names(loaded: &LoadedArticles) -> Vec<String> {
    loaded
        .skipped
        .iter()
        .map(|s| s.dir.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

// =========================================================================
// Output tree inspection
// =========================================================================

/// Read `<root>/public/<file_name>`. Panics if missing.
pub fn read_output(root: &Path, file_name: &str) -> String {
    let path = root.join("public").join(file_name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read output {}: {e}", path.display()))
}

/// Sorted file names directly inside `dir`.
pub fn output_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Every file under `dir` (relative path → bytes), for whole-tree comparisons.
pub fn snapshot_output(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_string_lossy().to_string();
            (rel, std::fs::read(e.path()).unwrap())
        })
        .collect()
}
