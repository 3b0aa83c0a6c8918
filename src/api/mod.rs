//! HTTP 路由的核心邏輯，與框架無關。
//!
//! axum 伺服器與 Lambda 入口都把請求轉成 `(method, body)` 交給這裡，
//! 再把 [`ApiResponse`] 轉回各自的回應格式。

pub mod server;

use crate::core::sitemap::Sitemap;
use crate::core::waitlist::WaitlistService;
use crate::core::WaitlistSubmission;
use crate::utils::error::ErrorCategory;
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const WAITLIST_PATH: &str = "/api/waitlist";
pub const SITEMAP_PATH: &str = "/api/sitemap";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: u16, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self {
                status,
                headers: vec![("content-type", "application/json".to_string())],
                body,
            },
            Err(e) => {
                tracing::error!("❌ Failed to serialize response body: {}", e);
                Self {
                    status: 500,
                    headers: vec![("content-type", "application/json".to_string())],
                    body: r#"{"error":"Internal server error"}"#.to_string(),
                }
            }
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::json(
            status,
            &ErrorBody {
                error: message.to_string(),
            },
        )
    }

    pub fn method_not_allowed(allow: &str) -> Self {
        Self::error(405, "Method not allowed").with_header("allow", allow)
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.retain(|(n, _)| *n != name);
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// `POST /api/waitlist`
pub async fn handle_waitlist(service: &WaitlistService, method: &str, body: &str) -> ApiResponse {
    tracing::info!("🚀 Waitlist API endpoint called: {}", method);

    if !method.eq_ignore_ascii_case("POST") {
        tracing::warn!("❌ Method not allowed: {}", method);
        return ApiResponse::method_not_allowed("POST");
    }

    let submission: WaitlistSubmission = match serde_json::from_str(body) {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!("❌ Invalid waitlist body: {}", e);
            return ApiResponse::error(400, "Invalid JSON body");
        }
    };

    match service.join(submission).await {
        Ok(entry) => ApiResponse::json(
            201,
            &JoinedResponse {
                success: true,
                message: "Successfully joined waitlist".to_string(),
                id: entry.id,
            },
        ),
        Err(e) => match e.category() {
            ErrorCategory::Validation => ApiResponse::error(400, &e.user_friendly_message()),
            ErrorCategory::Conflict => {
                ApiResponse::error(409, "Email already registered for waitlist")
            }
            _ => ApiResponse::error(500, "Failed to join waitlist"),
        },
    }
}

#[derive(Debug, Serialize)]
struct SitemapFailure {
    error: String,
    message: String,
    timestamp: String,
}

/// `GET /api/sitemap`
pub fn handle_sitemap(sitemap: &Sitemap, method: &str, today: NaiveDate) -> ApiResponse {
    if !method.eq_ignore_ascii_case("GET") && !method.eq_ignore_ascii_case("HEAD") {
        return ApiResponse::method_not_allowed("GET, HEAD");
    }

    tracing::info!("🗺️ Generating dynamic sitemap...");
    match sitemap.render(today) {
        Ok((xml, count)) => {
            tracing::info!("📊 Generated sitemap with {} pages", count);
            ApiResponse {
                status: 200,
                headers: vec![
                    ("content-type", "application/xml".to_string()),
                    ("cache-control", "public, max-age=3600, s-maxage=3600".to_string()),
                    ("x-robots-tag", "noindex".to_string()),
                ],
                body: xml,
            }
        }
        Err(e) => {
            tracing::error!("❌ Error generating sitemap: {}", e);
            ApiResponse::json(
                500,
                &SitemapFailure {
                    error: "Failed to generate sitemap".to_string(),
                    message: e.to_string(),
                    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                },
            )
        }
    }
}

/// 依路徑分派，給沒有自己 router 的入口 (Lambda) 使用
pub async fn dispatch(
    state: &server::AppState,
    method: &str,
    path: &str,
    body: &str,
) -> ApiResponse {
    let path = path.trim_end_matches('/');
    if path.ends_with(WAITLIST_PATH) {
        handle_waitlist(&state.waitlist, method, body).await
    } else if path.ends_with(SITEMAP_PATH) {
        handle_sitemap(&state.sitemap, method, Utc::now().date_naive())
    } else {
        tracing::warn!("No route for {} {}", method, path);
        ApiResponse::error(404, "Not found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dispatch_routes_by_path() {
        let state = server::AppState::new(
            WaitlistService::new(Arc::new(MemoryStore::new())),
            Sitemap::default(),
        );

        let response = dispatch(
            &state,
            "POST",
            "/prod/api/waitlist",
            r#"{"name":"Jane","email":"jane@example.com"}"#,
        )
        .await;
        assert_eq!(response.status, 201);

        let response = dispatch(&state, "GET", "/api/sitemap/", "").await;
        assert_eq!(response.status, 200);

        let response = dispatch(&state, "GET", "/api/unknown", "").await;
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_waitlist_rejects_get() {
        let service = WaitlistService::new(Arc::new(MemoryStore::new()));
        let response = handle_waitlist(&service, "GET", "").await;
        assert_eq!(response.status, 405);
        assert_eq!(response.header("Allow"), Some("POST"));
        assert_eq!(response.body, r#"{"error":"Method not allowed"}"#);
    }

    #[tokio::test]
    async fn test_waitlist_rejects_malformed_json() {
        let service = WaitlistService::new(Arc::new(MemoryStore::new()));
        let response = handle_waitlist(&service, "POST", "{name:").await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, r#"{"error":"Invalid JSON body"}"#);
    }

    #[test]
    fn test_sitemap_headers() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let response = handle_sitemap(&Sitemap::default(), "GET", today);
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("application/xml"));
        assert_eq!(response.header("x-robots-tag"), Some("noindex"));

        let response = handle_sitemap(&Sitemap::default(), "POST", today);
        assert_eq!(response.status, 405);
    }
}
