//! HTTP server
//!
//! Every request first goes through [`context::resolve_request`], which
//! strips the language prefix and attaches a [`RequestContext`]; only then
//! is it routed. Admin routes sit behind [`context::require_admin`].

mod context;
mod error;
mod handlers;

pub use context::{session_cookie, session_token, RequestContext};
pub use error::AppError;

use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{Authenticator, MemorySessionStore, SessionStore};
use crate::config::SiteConfig;
use crate::contact::{mailer_for, Mailer};
use crate::content::PostRepository;
use crate::i18n::Locales;
use crate::templates::{SiteData, TemplateRenderer};
use crate::Site;

/// Everything handlers share, built once at startup
///
/// Repository calls are short synchronous SQLite queries and run on the
/// request task; only mail delivery is moved to the blocking pool.
pub struct ServerState {
    pub config: SiteConfig,
    pub repository: PostRepository,
    pub auth: Authenticator,
    pub locales: Arc<Locales>,
    pub templates: TemplateRenderer,
    pub mailer: Arc<dyn Mailer>,
    pub static_dir: PathBuf,
}

impl ServerState {
    pub fn new(
        config: SiteConfig,
        repository: PostRepository,
        sessions: Arc<dyn SessionStore>,
        mailer: Arc<dyn Mailer>,
        static_dir: PathBuf,
    ) -> Result<Self> {
        let auth = Authenticator::new(config.admin_password.clone(), sessions);

        Ok(Self {
            config,
            repository,
            auth,
            locales: Arc::new(Locales::embedded()?),
            templates: TemplateRenderer::new()?,
            mailer,
            static_dir,
        })
    }

    /// State for a site on disk, with in-process sessions and the configured
    /// mailer
    pub fn for_site(site: &Site) -> Result<Self> {
        Self::new(
            site.config.clone(),
            site.repository()?,
            Arc::new(MemorySessionStore::new()),
            mailer_for(&site.config.smtp)?,
            site.static_dir.clone(),
        )
    }

    fn site_data(&self) -> SiteData {
        SiteData {
            title: self.config.title.clone(),
            author: self.config.author.clone(),
            url: self.config.url.clone(),
        }
    }
}

/// Build the application: locale and session resolution, then routing
pub fn app(state: Arc<ServerState>) -> Router {
    let admin = Router::new()
        .route("/admin", get(handlers::admin_page))
        .route("/admin/posts", post(handlers::create_post))
        .route("/admin/posts/new", get(handlers::new_post_form))
        .route("/admin/posts/update", post(handlers::update_post))
        .route("/admin/posts/delete", post(handlers::delete_post))
        .route("/admin/posts/:id", get(handlers::edit_post_form))
        .route("/admin/api/posts", post(handlers::create_post_json))
        .route("/logout", get(handlers::logout))
        .route_layer(middleware::from_fn(context::require_admin));

    let routes = Router::new()
        .route("/", get(handlers::index))
        .route("/articles", get(handlers::list_posts))
        .route("/articles/", get(handlers::list_posts))
        .route("/articles/:slug", get(handlers::show_post))
        .route("/agenda", get(handlers::agenda))
        .route("/contact", post(handlers::contact))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .merge(admin)
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .fallback(handlers::not_found)
        .with_state(Arc::clone(&state));

    // The inner router is a fallback so the middleware sees the request
    // before any route is matched
    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn_with_state(
            state,
            context::resolve_request,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Start the web server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState::for_site(site)?);
    let app = app(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!("Server listening on http://{}:{}", ip, port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    tracing::info!("Server closed");
    Ok(())
}
