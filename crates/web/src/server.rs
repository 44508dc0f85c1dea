//! Web server implementation
//!
//! Serves the catalog API and, when a widget dist directory is configured,
//! the widget's build artifacts from the router fallback.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use vitrine_common::{CatalogStore, Error, NewUser, ProductFilter};

use crate::static_files::serve_widget_asset;

/// Web server configuration
#[derive(Debug, Clone, Default)]
pub struct WebServerConfig {
    /// Directory with the widget build artifacts (served from the router
    /// fallback when present). `None` disables asset hosting.
    pub widget_dist: Option<PathBuf>,
}

/// Shared state handed to route handlers
pub struct WebServerState {
    pub store: CatalogStore,
    pub widget_dist: Option<PathBuf>,
}

/// The Vitrine web server
pub struct WebServer {
    state: Arc<WebServerState>,
}

pub async fn serve(addr: SocketAddr, cfg: WebServerConfig) -> anyhow::Result<()> {
    let server = WebServer::new(cfg);
    server.serve(addr).await
}

impl WebServer {
    /// Create a new web server with a freshly seeded store
    pub fn new(cfg: WebServerConfig) -> Self {
        let widget_dist = cfg.widget_dist.filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                warn!("Widget dist {} not found; asset hosting disabled", dir.display());
            }
            exists
        });

        Self {
            state: Arc::new(WebServerState {
                store: CatalogStore::new(),
                widget_dist,
            }),
        }
    }

    /// Create router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/api/users", get(list_users_handler).post(create_user_handler))
            .route("/api/users/:id", get(get_user_handler))
            .route("/api/products", get(list_products_handler))
            .route("/api/products/:id", get(get_product_handler))
            .fallback(fallback_handler)
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the web server
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        info!("Catalog service starting on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Fake API",
        "version": vitrine_common::VERSION,
        "endpoints": {
            "users": "/api/users",
            "products": "/api/products",
        },
    }))
}

async fn list_users_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.store.list_users())
}

async fn get_user_handler(
    State(state): State<Arc<WebServerState>>,
    Path(id): Path<String>,
) -> Response {
    // A non-numeric id is indistinguishable from an absent record
    match id.parse::<u32>().ok().and_then(|id| state.store.get_user(id)) {
        Some(user) => Json(user).into_response(),
        None => error_response(Error::not_found("User", &id)),
    }
}

async fn create_user_handler(
    State(state): State<Arc<WebServerState>>,
    Json(new_user): Json<NewUser>,
) -> impl IntoResponse {
    let user = state.store.create_user(new_user);
    (StatusCode::CREATED, Json(user))
}

/// Raw product query parameters. `inStock` arrives as text and is compared
/// against the literal "true", matching the original API's coercion.
#[derive(Debug, Default, Deserialize)]
struct ProductQuery {
    category: Option<String>,
    #[serde(rename = "inStock")]
    in_stock: Option<String>,
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        ProductFilter {
            category: query.category.filter(|c| !c.is_empty()),
            in_stock: query.in_stock.map(|v| v == "true"),
        }
    }
}

async fn list_products_handler(
    State(state): State<Arc<WebServerState>>,
    Query(query): Query<ProductQuery>,
) -> impl IntoResponse {
    let filter = ProductFilter::from(query);
    Json(state.store.list_products(&filter))
}

async fn get_product_handler(
    State(state): State<Arc<WebServerState>>,
    Path(id): Path<String>,
) -> Response {
    match id.parse::<u32>().ok().and_then(|id| state.store.get_product(id)) {
        Some(product) => Json(product).into_response(),
        None => error_response(Error::not_found("Product", &id)),
    }
}

/// Unmatched routes: try the widget dist first (when hosting is enabled),
/// then fall through to the JSON 404 body.
async fn fallback_handler(State(state): State<Arc<WebServerState>>, uri: Uri) -> Response {
    if let Some(dist) = &state.widget_dist {
        if let Some(response) = serve_widget_asset(dist, uri.path()).await {
            debug!("Served widget asset {}", uri.path());
            return response;
        }
    }
    error_response(Error::not_found("Endpoint", uri.path()))
}

/// Map a domain error onto the wire shape
fn error_response(err: Error) -> Response {
    let (status, message) = match err {
        Error::NotFound { kind, .. } => (StatusCode::NOT_FOUND, format!("{} not found", kind)),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    };
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
