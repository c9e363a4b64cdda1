//! Built-in blog templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on for every
//! `.html` template; rendered post bodies are marked `safe` explicitly.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::content::RenderedBlock;

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("loading.html", include_str!("blog/loading.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub generator: String,
}

/// One entry of the home listing
#[derive(Debug, Clone, Serialize)]
pub struct PostCardData {
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
}

/// A post page
#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub title: String,
    pub banner_url: String,
    pub author: String,
    pub date: String,
    pub time_to_read: String,
    pub content: Vec<RenderedBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "spacetraveling".to_string(),
            description: String::new(),
            generator: "spacetraveling".to_string(),
        }
    }

    #[test]
    fn test_render_index_escapes_fields() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert(
            "posts",
            &vec![PostCardData {
                path: "/post/a".to_string(),
                title: "<script>".to_string(),
                subtitle: String::new(),
                author: "Ana".to_string(),
                date: "15 mar 2021".to_string(),
            }],
        );
        context.insert("load_more_link", &Some("/?pages=2"));

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains(r#"href="/post/a""#));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"href="/?pages=2""#));
        assert!(html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_render_post_keeps_body_markup() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert(
            "post",
            &PostPageData {
                title: "Hooks".to_string(),
                banner_url: String::new(),
                author: "Ana".to_string(),
                date: String::new(),
                time_to_read: "2 min".to_string(),
                content: vec![RenderedBlock {
                    heading: "Intro".to_string(),
                    body: "<p>Hello <strong>there</strong></p>".to_string(),
                }],
            },
        );

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<p>Hello <strong>there</strong></p>"));
        assert!(html.contains("<h2>Intro</h2>"));
        assert!(html.contains("2 min"));
        assert!(!html.contains("class=\"banner\""));
    }
}
