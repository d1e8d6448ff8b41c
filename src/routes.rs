use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::VerifierError;
use crate::layout::CallLayout;
use crate::types::{ArtifactsResponse, ErrorResponse, HealthResponse, VerifyRequest, VerifyResponse};
use crate::verifier::{Verifier, VerifyEndpoint};

/// Shared application state passed to all route handlers.
pub struct AppState<E> {
    pub verifier: Verifier<E>,
}

fn error_status(error: &VerifierError) -> StatusCode {
    match error {
        VerifierError::MalformedInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        VerifierError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND
        }
        VerifierError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        VerifierError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        VerifierError::VerificationFailed(_) => StatusCode::CONFLICT,
        VerifierError::EndpointUnavailable(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(error: VerifierError) -> (StatusCode, Json<serde_json::Value>) {
    let status = error_status(&error);
    let body = ErrorResponse {
        error: error.to_string(),
        kind: error.kind().to_string(),
    };
    (status, Json(serde_json::json!(body)))
}

/// POST /verify: load the artifacts, encode them and call the verifier.
///
/// Request body: VerifyRequest { mode: "estimate" | "execute", layout? }
/// Response: VerifyResponse { mode, accepted?, gasEstimate?, layout, arguments }
pub async fn verify_handler<E: VerifyEndpoint>(
    State(state): State<Arc<AppState<E>>>,
    Json(req): Json<VerifyRequest>,
) -> impl IntoResponse {
    let layout = match req.layout.as_deref() {
        Some(text) => match text.parse::<CallLayout>() {
            Ok(layout) => layout,
            Err(e) => return error_response(e),
        },
        None => state.verifier.layout().clone(),
    };

    match state.verifier.verify_with_layout(req.mode, &layout).await {
        Ok(report) => (
            StatusCode::OK,
            Json(serde_json::json!(VerifyResponse::from(report))),
        ),
        Err(e) => {
            tracing::warn!("Verify request failed: {}", e);
            error_response(e)
        }
    }
}

/// GET /artifacts: which artifact files are present and decodable.
pub async fn artifacts_handler<E: VerifyEndpoint>(
    State(state): State<Arc<AppState<E>>>,
) -> impl IntoResponse {
    let store = state.verifier.store();
    (
        StatusCode::OK,
        Json(serde_json::json!(ArtifactsResponse {
            directory: store.dir().display().to_string(),
            artifacts: store.inventory(),
        })),
    )
}

/// GET /health: health check endpoint.
pub async fn health_handler<E: VerifyEndpoint>(
    State(state): State<Arc<AppState<E>>>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!(HealthResponse {
            status: "ok".to_string(),
            endpoint: state.verifier.endpoint().describe(),
            layout: state.verifier.layout().to_string(),
        })),
    )
}

/// Build the axum router with all routes.
pub fn build_router<E: VerifyEndpoint + 'static>(state: Arc<AppState<E>>) -> axum::Router {
    use axum::routing::{get, post};
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    axum::Router::new()
        .route("/verify", post(verify_handler::<E>))
        .route("/artifacts", get(artifacts_handler::<E>))
        .route("/health", get(health_handler::<E>))
        .layer(cors)
        .with_state(state)
}
