//! Generate static files

use anyhow::Result;

use crate::generator::{GenerateReport, Generator};
use crate::Blog;

/// Fetch every post and write the static site
pub async fn run(blog: &Blog) -> Result<GenerateReport> {
    let start = std::time::Instant::now();
    let client = blog.client();
    tracing::info!("Fetching posts from {}", client.endpoint());

    let generator = Generator::new(blog)?;
    let report = generator.generate(&client).await?;

    tracing::info!(
        "Generated {} listing pages and {} posts ({} skipped) in {:.2}s",
        report.listing_pages,
        report.posts,
        report.skipped,
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}
