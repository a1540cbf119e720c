//! # Simple Blog
//!
//! A minimal static site generator for template-driven blogs. Your filesystem
//! is the data source: each article is a directory holding a JSON metadata
//! record and an HTML body, reusable fragments live in `components/`, and two
//! templates turn them into pages.
//!
//! # Architecture: Linear Pipeline
//!
//! ```text
//! 1. Load      components/ + articles/ + templates/  →  memory
//! 2. Prepare   public/ deleted and recreated
//! 3. Render    one page per article, then index.html
//! 4. Copy      index.css → public/index.css
//! ```
//!
//! Everything is read and validated before the output directory is touched,
//! so content mistakes never cost you the previous build.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Optional `config.toml` over the stock layout; [`config::Project`] |
//! | [`content`] | Loads components and articles; skip-vs-fatal rules for article directories |
//! | [`context`] | Builds render contexts with explicit merge precedence |
//! | [`render`] | Loads templates into a `minijinja` environment and renders pages |
//! | [`tree`] | Wipes, recreates and writes into the output directory |
//! | [`site`] | Orchestrates the build: [`site::render_site`], [`site::check_site`] |
//! | [`output`] | CLI output formatting for build progress and content checks |
//!
//! # Design Decisions
//!
//! ## Open-Ended Article Metadata
//!
//! Articles are ordered JSON maps rather than a fixed struct. `title`, `url`
//! and `pub_date` are expected and `body` is injected by the loader, but any
//! other field an author adds reaches the templates unchanged.
//!
//! ## Explicit Project Root
//!
//! Every path is resolved against [`config::Project::root`]. The library never
//! consults the process working directory, so builds can be driven against
//! any directory (tests use temporary ones).
//!
//! ## Skip vs Abort
//!
//! An article directory missing a required file is skipped and reported. A
//! metadata record that exists but does not parse, or an article without a
//! usable `url`, aborts the build.

pub mod config;
pub mod content;
pub mod context;
pub mod output;
pub mod render;
pub mod site;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;
