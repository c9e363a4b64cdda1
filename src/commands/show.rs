//! Show a single post

use anyhow::Result;

use crate::content::{DetailAssembler, DetailStatus, RichTextRenderer};
use crate::helpers::{format_optional_date, html_to_text};
use crate::Blog;

/// Print a post's metadata, reading time and sections
pub async fn run(blog: &Blog, uid: &str, html: bool) -> Result<()> {
    let client = blog.client();
    let status = DetailAssembler::assemble(&client, uid).await?;

    let detail = match status {
        DetailStatus::Found(detail) => detail,
        DetailStatus::NotFound | DetailStatus::Loading => {
            anyhow::bail!("No post found with uid {:?}", uid)
        }
    };

    let renderer = RichTextRenderer::new();
    let content = detail.render_content(&renderer);

    println!("{}", detail.title.as_deref().unwrap_or("(untitled)"));
    println!(
        "  {} | {} | {}",
        format_optional_date(detail.publication_date.as_ref(), &blog.config.date_format),
        detail.author.as_deref().unwrap_or("unknown"),
        detail.time_to_read(&renderer)
    );
    if let Some(banner) = &detail.banner_url {
        println!("  banner: {}", banner);
    }

    for block in content {
        println!();
        println!("## {}", block.heading);
        if html {
            println!("{}", block.body);
        } else {
            let text = html_to_text(&block.body);
            println!("{}", text.split_whitespace().collect::<Vec<_>>().join(" "));
        }
    }

    Ok(())
}
