//! List posts

use anyhow::Result;

use crate::helpers::format_optional_date;
use crate::listing::ListingState;
use crate::Blog;

/// Print the post listing; `all` follows the cursor until exhausted
pub async fn run(blog: &Blog, all: bool) -> Result<()> {
    let client = blog.client();
    let mut listing = blog.listing(&client).await?;
    if all {
        listing.load_all().await?;
    }

    for line in format_listing(listing.state(), &blog.config.date_format) {
        println!("{}", line);
    }

    Ok(())
}

/// One line per post, plus a hint when more pages exist
fn format_listing(state: &ListingState, date_format: &str) -> Vec<String> {
    let mut lines = vec![format!("Posts ({}):", state.posts().len())];
    for post in state.posts() {
        lines.push(format!(
            "  {} - {} by {} [{}]",
            format_optional_date(post.publication_date.as_ref(), date_format),
            post.title.as_deref().unwrap_or("(untitled)"),
            post.author.as_deref().unwrap_or("unknown"),
            post.uid.as_deref().unwrap_or("-")
        ));
    }
    if state.has_more() {
        lines.push("More posts available, use --all to load them".to_string());
    }
    lines
}
