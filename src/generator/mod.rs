//! Generator module - renders listing and post pages and writes the static site

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tera::Context;

use crate::client::ContentClient;
use crate::content::{DetailAssembler, DetailStatus, PostSummary, RichTextRenderer};
use crate::helpers::{format_optional_date, post_path, static_listing_path};
use crate::listing::{ListingState, LoadMore};
use crate::templates::{PostCardData, PostPageData, SiteData, TemplateRenderer};
use crate::Blog;

/// Counts of what a static generation wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub listing_pages: usize,
    pub posts: usize,
    pub skipped: usize,
}

/// Page renderer and static site generator
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    rich_text: RichTextRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
            rich_text: RichTextRenderer::new(),
        })
    }

    /// Render the home listing; `load_more_link` is shown while more pages exist
    pub fn render_listing(
        &self,
        state: &ListingState,
        load_more_link: Option<String>,
    ) -> Result<String> {
        let posts: Vec<PostCardData> = state.posts().iter().map(|p| self.post_card(p)).collect();

        let mut context = self.create_base_context();
        context.insert("posts", &posts);
        context.insert("load_more_link", &load_more_link);
        self.renderer.render("index.html", &context)
    }

    /// Render a post page for any detail status
    pub fn render_post(&self, status: &DetailStatus) -> Result<String> {
        let detail = match status {
            DetailStatus::Loading => {
                return self
                    .renderer
                    .render("loading.html", &self.create_base_context())
            }
            DetailStatus::NotFound => return self.render_not_found(),
            DetailStatus::Found(detail) => detail,
        };

        let content = detail.render_content(&self.rich_text);
        let time_to_read = detail.time_to_read(&self.rich_text);
        let post = PostPageData {
            title: detail.title.clone().unwrap_or_default(),
            banner_url: detail.banner_url.clone().unwrap_or_default(),
            author: detail.author.clone().unwrap_or_default(),
            date: format_optional_date(
                detail.publication_date.as_ref(),
                &self.blog.config.date_format,
            ),
            time_to_read: time_to_read.to_string(),
            content,
        };

        let mut context = self.create_base_context();
        context.insert("post", &post);
        self.renderer.render("post.html", &context)
    }

    /// Render the "post not found" page
    pub fn render_not_found(&self) -> Result<String> {
        self.renderer
            .render("not_found.html", &self.create_base_context())
    }

    /// Walk the whole listing and write every listing step and post page
    pub async fn generate<C>(&self, client: &C) -> Result<GenerateReport>
    where
        C: ContentClient + ?Sized,
    {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)?;

        let mut report = GenerateReport::default();
        let mut listing = self.blog.listing(client).await?;

        loop {
            let step = listing.pages_loaded();
            let next_link = listing
                .state()
                .has_more()
                .then(|| static_listing_path(step + 1));
            let html = self.render_listing(listing.state(), next_link)?;
            self.write(self.listing_output_path(step), &html)?;
            report.listing_pages += 1;

            if listing.load_more().await? == LoadMore::Exhausted {
                break;
            }
        }

        let state = listing.into_state();
        let mut seen = HashSet::new();
        for uid in state.posts().iter().filter_map(|p| p.uid.as_deref()) {
            if !seen.insert(uid) {
                continue;
            }
            if !is_safe_path_segment(uid) {
                tracing::warn!("Skipping post with unusable uid {:?}", uid);
                report.skipped += 1;
                continue;
            }

            let status = DetailAssembler::assemble(client, uid).await?;
            if status == DetailStatus::NotFound {
                tracing::warn!("Post {:?} is listed but could not be fetched", uid);
                report.skipped += 1;
                continue;
            }

            let html = self.render_post(&status)?;
            self.write(public_dir.join("post").join(uid).join("index.html"), &html)?;
            report.posts += 1;
        }

        self.write(public_dir.join("404.html"), &self.render_not_found()?)?;

        Ok(report)
    }

    fn post_card(&self, post: &PostSummary) -> PostCardData {
        PostCardData {
            path: post.uid.as_deref().map(post_path).unwrap_or_default(),
            title: post.title.clone().unwrap_or_default(),
            subtitle: post.subtitle.clone().unwrap_or_default(),
            author: post.author.clone().unwrap_or_default(),
            date: format_optional_date(
                post.publication_date.as_ref(),
                &self.blog.config.date_format,
            ),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let site = SiteData {
            title: self.blog.config.title.clone(),
            description: self.blog.config.description.clone(),
            generator: format!("spacetraveling {}", env!("CARGO_PKG_VERSION")),
        };
        let mut context = Context::new();
        context.insert("site", &site);
        context
    }

    fn listing_output_path(&self, step: usize) -> PathBuf {
        if step <= 1 {
            self.blog.public_dir.join("index.html")
        } else {
            self.blog
                .public_dir
                .join(format!("page/{}/index.html", step))
        }
    }

    fn write(&self, path: PathBuf, html: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;
        tracing::debug!("Generated: {:?}", path);
        Ok(())
    }
}

/// Whether a uid can be used as a single directory name
fn is_safe_path_segment(uid: &str) -> bool {
    !uid.is_empty()
        && uid != "."
        && uid != ".."
        && !uid.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{raw_detail, raw_summary, FakeClient};
    use crate::content::RawPage;

    fn blog_in(dir: &std::path::Path) -> Blog {
        Blog::new(dir).unwrap()
    }

    #[test]
    fn test_render_listing() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&blog_in(dir.path())).unwrap();
        let client = FakeClient::new();
        let listing = crate::listing::ListingController::initialize(
            &client,
            RawPage::new(vec![raw_summary("hooks")], Some("c1".into())),
        );

        let html = generator
            .render_listing(listing.state(), Some(static_listing_path(2)))
            .unwrap();
        assert!(html.contains(r#"href="/post/hooks""#));
        assert!(html.contains("Title hooks"));
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains(r#"href="/page/2/""#));
    }

    #[test]
    fn test_render_post_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&blog_in(dir.path())).unwrap();

        let loading = generator.render_post(&DetailStatus::Loading).unwrap();
        assert!(loading.contains("Carregando..."));

        let missing = generator.render_post(&DetailStatus::NotFound).unwrap();
        assert!(missing.contains("Post não encontrado"));

        let detail = crate::content::PostDetail::from_raw(raw_detail("hooks", &[("A", 150), ("B", 60)]));
        let found = generator
            .render_post(&DetailStatus::Found(Box::new(detail)))
            .unwrap();
        assert!(found.contains("2 min"));
        assert!(found.contains("<h2>A</h2>"));
        assert!(found.contains("class=\"banner\""));
    }

    #[tokio::test]
    async fn test_generate_site() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new()
            .with_first_page(RawPage::new(vec![raw_summary("p1")], Some("c1".into())))
            .with_page(
                "c1",
                RawPage::new(vec![raw_summary("p2"), raw_summary("gone")], None),
            )
            .with_document(raw_detail("p1", &[("A", 10)]))
            .with_document(raw_detail("p2", &[("B", 10)]));

        let blog = blog_in(dir.path());
        let generator = Generator::new(&blog).unwrap();
        let report = generator.generate(&client).await.unwrap();

        assert_eq!(
            report,
            GenerateReport {
                listing_pages: 2,
                posts: 2,
                skipped: 1,
            }
        );

        let public = &blog.public_dir;
        let first = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(first.contains("Title p1"));
        assert!(!first.contains("Title p2"));
        assert!(first.contains(r#"href="/page/2/""#));

        let second = fs::read_to_string(public.join("page/2/index.html")).unwrap();
        assert!(second.contains("Title p1"));
        assert!(second.contains("Title p2"));
        assert!(!second.contains("Carregar mais posts"));

        assert!(public.join("post/p1/index.html").exists());
        assert!(public.join("post/p2/index.html").exists());
        assert!(!public.join("post/gone").exists());
        assert!(public.join("404.html").exists());
    }

    #[tokio::test]
    async fn test_generate_stops_on_looping_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new()
            .with_first_page(RawPage::new(vec![raw_summary("p1")], Some("c1".into())))
            .with_page("c1", RawPage::new(vec![raw_summary("p2")], Some("c1".into())))
            .with_document(raw_detail("p1", &[("A", 10)]))
            .with_document(raw_detail("p2", &[("B", 10)]));

        let blog = blog_in(dir.path());
        let report = Generator::new(&blog).unwrap().generate(&client).await.unwrap();

        assert_eq!(report.listing_pages, 2);
        assert_eq!(report.posts, 2);
        let second = fs::read_to_string(blog.public_dir.join("page/2/index.html")).unwrap();
        assert!(!second.contains("Carregar mais posts"));
        assert!(!blog.public_dir.join("page/3").exists());
    }

    #[test]
    fn test_safe_path_segment() {
        assert!(is_safe_path_segment("como-utilizar-hooks"));
        assert!(!is_safe_path_segment(".."));
        assert!(!is_safe_path_segment("a/b"));
        assert!(!is_safe_path_segment(""));
    }
}
