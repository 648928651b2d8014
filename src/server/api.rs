use crate::agent::{ Agent, AgentContext, AgentError, AgentInput, SessionKey };
use crate::config::TlsPaths;
use crate::models::api::{ ChatRequest, ChatResponse };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::post,
    Router,
    Json,
    extract::State,
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, error };

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn Agent>,
    pub response_field: String,
}

/// Agent failures surface as a plain 500 with the error text.
#[derive(Debug)]
pub struct ApiError(AgentError);

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("POST /chat failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    // Wide open for local testing; restrict origins before exposing publicly.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    addr: &str,
    state: AppState,
    tls: Option<TlsPaths>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    warn!("CORS allows any origin, method and header. Do not expose this server as-is.");
    let app = router(state);

    match tls {
        Some(paths) => {
            info!(
                "TLS enabled. Loading certificate from '{}' and key from '{}'",
                paths.cert_path,
                paths.key_path
            );
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &paths.cert_path,
                &paths.key_path
            ).await?;
            info!("Starting HTTPS API server on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
                e
            })?;
            info!("Starting HTTP API server on: http://{}", addr);
            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session = SessionKey::new(req.user_id.clone());
    let context = AgentContext { user_id: req.user_id };
    let reply = state.agent.invoke(AgentInput::user(req.message), &session, &context).await?;
    let response = reply.field(&state.response_field)?.to_string();
    Ok(Json(ChatResponse { response }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingAgent;
    use axum::body::{ to_bytes, Body };
    use axum::http::{ header, Method, Request };
    use tower::ServiceExt;

    fn app(agent: Arc<RecordingAgent>) -> Router {
        router(AppState { agent, response_field: "punny_response".into() })
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn returns_extracted_field() {
        let agent = Arc::new(RecordingAgent::new("punny_response"));
        let response = app(agent.clone())
            .oneshot(post_chat(r#"{"user_id": "u1", "message": "hello"}"#)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["response"], "echo: hello");
        assert_eq!(agent.invocation_count(), 1);
    }

    #[tokio::test]
    async fn missing_message_is_rejected_before_agent() {
        let agent = Arc::new(RecordingAgent::new("punny_response"));
        let response = app(agent.clone())
            .oneshot(post_chat(r#"{"user_id": "u1"}"#)).await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(agent.invocation_count(), 0);
    }

    #[tokio::test]
    async fn agent_failure_is_server_error() {
        let response = app(Arc::new(RecordingAgent::failing()))
            .oneshot(post_chat(r#"{"user_id": "u1", "message": "hello"}"#)).await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unexpected_reply_shape_is_server_error() {
        let agent = Arc::new(RecordingAgent::new("weather_conditions"));
        let response = app(agent)
            .oneshot(post_chat(r#"{"user_id": "u1", "message": "hello"}"#)).await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("punny_response"));
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/chat")
            .header(header::ORIGIN, "http://example.test")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(Arc::new(RecordingAgent::new("punny_response")))
            .oneshot(request).await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
