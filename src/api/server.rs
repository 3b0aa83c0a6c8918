use crate::api::{handle_sitemap, handle_waitlist, ApiResponse, SITEMAP_PATH, WAITLIST_PATH};
use crate::core::sitemap::Sitemap;
use crate::core::waitlist::WaitlistService;
use crate::utils::error::Result;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub waitlist: WaitlistService,
    pub sitemap: Arc<Sitemap>,
}

impl AppState {
    pub fn new(waitlist: WaitlistService, sitemap: Sitemap) -> Self {
        Self {
            waitlist,
            sitemap: Arc::new(sitemap),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in self.headers {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    response.headers_mut().insert(name, value);
                }
                Err(e) => tracing::warn!("Dropping invalid header {}: {}", name, e),
            }
        }
        response
    }
}

async fn waitlist(State(state): State<AppState>, method: Method, body: String) -> ApiResponse {
    handle_waitlist(&state.waitlist, method.as_str(), &body).await
}

async fn sitemap(State(state): State<AppState>, method: Method) -> ApiResponse {
    handle_sitemap(&state.sitemap, method.as_str(), Utc::now().date_naive())
}

async fn healthz() -> &'static str {
    "ok"
}

/// 建立 API router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route(WAITLIST_PATH, any(waitlist))
        .route(SITEMAP_PATH, any(sitemap))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(listen_addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("🌐 Landing API listening on {}", listen_addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
