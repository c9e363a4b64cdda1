//! Live server rendering pages straight from the content repository

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::client::{ContentClient, ContentError};
use crate::content::{DetailAssembler, DetailStatus};
use crate::generator::Generator;
use crate::helpers::listing_path;
use crate::Blog;

/// Upper bound for `?pages=`, each page being one upstream request
const MAX_PAGES: usize = 50;

/// Server state
struct ServerState<C> {
    blog: Blog,
    client: C,
    generator: Generator,
}

#[derive(Debug, Deserialize)]
struct HomeParams {
    pages: Option<usize>,
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog, blog.client())?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router over any content client
pub fn router<C>(blog: &Blog, client: C) -> Result<Router>
where
    C: ContentClient + 'static,
{
    let state = Arc::new(ServerState {
        blog: blog.clone(),
        client,
        generator: Generator::new(blog)?,
    });

    Ok(Router::new()
        .route("/", get(home_handler::<C>))
        .route("/post/:uid", get(post_handler::<C>))
        .fallback(fallback_handler::<C>)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Listing after `pages` pages (default 1)
async fn home_handler<C: ContentClient + 'static>(
    State(state): State<Arc<ServerState<C>>>,
    Query(params): Query<HomeParams>,
) -> Result<Html<String>, AppError> {
    let pages = params.pages.unwrap_or(1).clamp(1, MAX_PAGES);

    let mut listing = state.blog.listing(&state.client).await?;
    listing.load_pages(pages).await?;

    let next_link = listing
        .state()
        .has_more()
        .then(|| listing_path(listing.pages_loaded() + 1));
    let html = state.generator.render_listing(listing.state(), next_link)?;
    Ok(Html(html))
}

async fn post_handler<C: ContentClient + 'static>(
    State(state): State<Arc<ServerState<C>>>,
    Path(uid): Path<String>,
) -> Result<Response, AppError> {
    let status = DetailAssembler::assemble(&state.client, &uid).await?;
    let html = state.generator.render_post(&status)?;

    let code = if status == DetailStatus::NotFound {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    Ok((code, Html(html)).into_response())
}

async fn fallback_handler<C: ContentClient + 'static>(
    State(state): State<Arc<ServerState<C>>>,
) -> Result<Response, AppError> {
    let html = state.generator.render_not_found()?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// Handler error: upstream failures map to 502, the rest to 500
struct AppError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<ContentError>().is_some() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        tracing::error!("Request failed: {:#}", self.0);
        (status, status.canonical_reason().unwrap_or("Error")).into_response()
    }
}
