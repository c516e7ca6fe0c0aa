use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::omdb::OmdbClient;

/// Path the search page calls; kept so the original pages work unchanged.
pub const FUNCTION_PATH: &str = "/.netlify/functions/script";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub omdb: Arc<OmdbClient>,
}

impl AppState {
    pub fn new(config: Config, omdb: OmdbClient) -> Self {
        Self {
            config: Arc::new(config),
            omdb: Arc::new(omdb),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let proxy_routes = Router::new()
        .route(FUNCTION_PATH, get(crate::proxy::movie_proxy))
        .route(&format!("{}/", FUNCTION_PATH), get(crate::proxy::movie_proxy))
        .route("/api/movies", get(crate::proxy::movie_proxy));

    let mut router = Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .merge(proxy_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
