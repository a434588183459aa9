//! Newsdesk
//!
//! Server-rendered headline reader with an admin screen for a remote posts service.

mod admin;
mod api;
mod config;
mod errors;
mod feed;
mod handoff;
mod models;
mod pages;
mod posts;
mod session;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use errors::AppError;
use feed::HeadlineFeed;
use posts::{HttpPostsBackend, PostsStore};
use session::SessionStore;

/// Sessions untouched for this long are forgotten.
const SESSION_MAX_IDLE: Duration = Duration::from_secs(12 * 60 * 60);
const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub feed: Arc<HeadlineFeed>,
    pub posts: Arc<PostsStore>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Wire the outbound client, feed, posts store and session registry from configuration.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let backend = HttpPostsBackend::new(http.clone(), config.posts_url.clone());

        Ok(Self {
            feed: Arc::new(HeadlineFeed::new(http.clone(), &config)),
            posts: Arc::new(PostsStore::new(Arc::new(backend))),
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
            http,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Newsdesk");
    tracing::info!("Posts service: {}", config.posts_url);
    tracing::info!("Headline source: {}", config.mediastack_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.usable_mediastack_key().is_none() {
        tracing::warn!("No aggregation key configured (NEWSDESK_MEDIASTACK_KEY). The feed will show a configuration error!");
    }
    if config.newsapi_key.is_none() {
        tracing::warn!("No headline proxy key configured (NEWSDESK_NEWSAPI_KEY). /api/news will answer 500!");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::new(config)?;

    // Forget abandoned sessions
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = sessions.prune_idle(SESSION_MAX_IDLE).await;
            if removed > 0 {
                tracing::debug!(
                    "Pruned {} idle sessions, {} remain",
                    removed,
                    sessions.len().await
                );
            }
        }
    });

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // JSON routes
    let api_routes = Router::new()
        .route("/news", get(api::proxy_headlines))
        .layer(cors);

    // HTML pages
    let page_routes = Router::new()
        // Headlines
        .route("/", get(pages::feed_page))
        .route("/articles/select", post(pages::select_article))
        .route("/posts/", get(pages::article_page))
        .route("/posts/{slug}", get(pages::article_page))
        // Admin
        .route("/admin", get(pages::admin_page))
        .route("/admin/posts", post(pages::submit_post))
        .route("/admin/cancel", post(pages::cancel_edit))
        .route("/admin/posts/{id}/edit", get(pages::edit_post))
        .route(
            "/admin/posts/{id}/delete",
            get(pages::confirm_delete).post(pages::delete_post),
        );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
