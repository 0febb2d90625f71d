//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded in the binary. HTML autoescaping stays on:
//! the only markup inserted verbatim is a post's rendered markdown, marked
//! `safe` in the templates.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::RenderedPost;
use crate::i18n::Language;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all site templates loaded
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("posts.html", include_str!("site/posts.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("agenda.html", include_str!("site/agenda.html")),
            ("login.html", include_str!("site/login.html")),
            ("admin.html", include_str!("site/admin.html")),
            // Fragments
            ("contact_result.html", include_str!("site/contact_result.html")),
            ("post_list_item.html", include_str!("site/post_list_item.html")),
            ("post_form.html", include_str!("site/post_form.html")),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(template_name, context)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub author: String,
    pub url: String,
}

/// Per-request page data shared by every template
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    /// Current language code
    pub lang: &'static str,
    /// Link prefix of the current language, e.g. "/en"
    pub prefix: String,
    /// Request path without its language prefix
    pub current_path: String,
    pub is_admin: bool,
    pub languages: Vec<&'static str>,
}

impl PageData {
    pub fn new(language: Language, current_path: &str, is_admin: bool) -> Self {
        Self {
            lang: language.code(),
            prefix: format!("/{}", language.code()),
            current_path: current_path.to_string(),
            is_admin,
            languages: Language::ALL.iter().map(|l| l.code()).collect(),
        }
    }
}

/// Outcome shown next to an admin post list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    New,
    Update,
    Delete,
}

/// Context for a list entry fragment; deleted posts only carry their id
pub fn list_item_context(base: &Context, post: &RenderedPost, status: ItemStatus) -> Context {
    let mut context = base.clone();
    context.insert("post", post);
    context.insert("status", &status);
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentRenderer, Post};
    use crate::i18n::Locales;
    use std::sync::Arc;

    fn base_context(language: Language) -> Context {
        let locales = Arc::new(Locales::embedded().unwrap());
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: "Test site".to_string(),
                author: "Tester".to_string(),
                url: "http://localhost".to_string(),
            },
        );
        context.insert("page", &PageData::new(language, "/", false));
        context.insert("t", &locales.localizer(language).translations());
        context
    }

    fn rendered(content: &str) -> RenderedPost {
        ContentRenderer::default().render_post(Post {
            id: 7,
            language: "en".to_string(),
            slug: "a-post".to_string(),
            author: "Ada".to_string(),
            title: "A <post>".to_string(),
            timestamp: 1_709_632_800,
            summary: "Short".to_string(),
            content: content.to_string(),
        })
    }

    #[test]
    fn test_all_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_post_html_is_trusted_but_fields_are_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context(Language::En);
        context.insert("post", &rendered("Hello <b>bold</b>"));

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<b>bold</b>"));
        assert!(html.contains("A &lt;post&gt;"));
        assert!(html.contains("March 5, 2024"));
    }

    #[test]
    fn test_translations_follow_language() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context(Language::Fr);
        context.insert("posts", &Vec::<RenderedPost>::new());

        let html = renderer.render("posts.html", &context).unwrap();
        assert!(html.contains("Aucun article"));
    }

    #[test]
    fn test_list_item_fragment() {
        let renderer = TemplateRenderer::new().unwrap();
        let base = base_context(Language::En);

        let context = list_item_context(&base, &rendered(""), ItemStatus::New);
        let html = renderer.render("post_list_item.html", &context).unwrap();
        assert!(html.contains("post-item new"));
        assert!(html.contains("Short"));

        let context = list_item_context(&base, &rendered(""), ItemStatus::Delete);
        let html = renderer.render("post_list_item.html", &context).unwrap();
        assert!(html.contains("post-item delete"));
        assert!(!html.contains("Short"));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(5));
        let value = truncate_chars_filter(&tera::Value::from("Hello world"), &args).unwrap();
        assert_eq!(value, tera::Value::from("Hello…"));

        let value = truncate_chars_filter(&tera::Value::from("Hi"), &args).unwrap();
        assert_eq!(value, tera::Value::from("Hi"));
    }
}
