//! Render contexts: the data handed to the template engine.
//!
//! A render context is a single flat mapping built by layering sources with
//! [`merge`]. Later layers win on key collisions:
//!
//! | Page | Base layer | Overlay |
//! |------|------------|---------|
//! | `<url>.html` | components | article fields |
//! | `index.html` | `{"articles": [...]}` | components |
//!
//! So an article field named like a component hides that component on the
//! article page, while a component named `articles` hides the article list on
//! the index page.

use crate::content::{Article, Components};
use serde_json::{Map, Value};

/// Key under which the index page receives the article list.
pub const ARTICLES_KEY: &str = "articles";

pub type RenderContext = Map<String, Value>;

/// Merge `overlay` on top of `base`. Keys from `overlay` replace those in
/// `base`; new keys are appended in overlay order.
pub fn merge(mut base: RenderContext, overlay: RenderContext) -> RenderContext {
    for (key, value) in overlay {
        base.insert(key, value);
    }
    base
}

fn components_layer(components: &Components) -> RenderContext {
    components
        .iter()
        .map(|(name, body)| (name.clone(), Value::String(body.clone())))
        .collect()
}

/// Context for one article page: components, then the article's fields.
pub fn article_context(article: &Article, components: &Components) -> RenderContext {
    merge(components_layer(components), article.fields().clone())
}

/// Context for the index page: the article list, then components.
pub fn index_context(articles: &[Article], components: &Components) -> RenderContext {
    let list = articles
        .iter()
        .map(|article| Value::Object(article.fields().clone()))
        .collect();
    let mut base = RenderContext::new();
    base.insert(ARTICLES_KEY.to_string(), Value::Array(list));
    merge(base, components_layer(components))
}
