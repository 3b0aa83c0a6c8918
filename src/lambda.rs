use base64::Engine;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use landing_gate::api::{self, server::AppState, ApiResponse};
use landing_gate::utils::{logger, validation::Validate};
use landing_gate::{LambdaConfig, SupabaseStore, WaitlistService};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// API Gateway proxy 事件 (REST v1 與 HTTP v2 的共同欄位)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub raw_path: Option<String>,
    pub request_context: Option<RequestContext>,
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Deserialize)]
pub struct RequestContext {
    pub http: Option<HttpContext>,
}

#[derive(Debug, Deserialize)]
pub struct HttpContext {
    pub method: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<ApiResponse> for Response {
    fn from(response: ApiResponse) -> Self {
        Self {
            status_code: response.status,
            headers: response
                .headers
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            body: response.body,
            is_base64_encoded: false,
        }
    }
}

impl Request {
    fn method(&self) -> &str {
        self.http_method
            .as_deref()
            .or_else(|| {
                self.request_context
                    .as_ref()
                    .and_then(|ctx| ctx.http.as_ref())
                    .map(|http| http.method.as_str())
            })
            .unwrap_or("GET")
    }

    fn path(&self) -> &str {
        self.path
            .as_deref()
            .or(self.raw_path.as_deref())
            .unwrap_or("/")
    }

    fn decoded_body(&self) -> Result<String, Error> {
        let body = self.body.clone().unwrap_or_default();
        if !self.is_base64_encoded {
            return Ok(body);
        }
        let bytes = base64::engine::general_purpose::STANDARD.decode(body)?;
        Ok(String::from_utf8(bytes)?)
    }
}

async fn handle_request(state: &AppState, request: Request) -> Response {
    let body = match request.decoded_body() {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("❌ Undecodable request body: {}", e);
            return ApiResponse::error(400, "Invalid JSON body").into();
        }
    };

    let response = api::dispatch(state, request.method(), request.path(), &body).await;
    tracing::info!(
        status = response.status,
        "{} {} handled",
        request.method(),
        request.path()
    );
    response.into()
}

async fn function_handler(state: &AppState, event: LambdaEvent<Request>) -> Result<Response, Error> {
    Ok(handle_request(state, event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = LambdaConfig::from_env()?;
    config.validate()?;

    let store = SupabaseStore::from_config(&config)?;
    let state = AppState::new(WaitlistService::new(Arc::new(store)), config.sitemap());
    let state = &state;

    run(service_fn(move |event: LambdaEvent<Request>| async move {
        function_handler(state, event).await
    }))
    .await
}
