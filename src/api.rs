use crate::engine::SearchContext;
use crate::index::IndexStats;
use crate::render::JsonRenderer;
use crate::widget::{SearchWidget, TextInput};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.0);
        tracing::error!("API error: {}", message);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(message)),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// ========== Handlers ==========

type AppState = Arc<SearchContext>;

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

/// Renders exactly what the widget would hand to the view: `{"data": [...]}`
async fn search_posts(
    State(context): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut widget = SearchWidget::new(
        context.as_ref(),
        TextInput::new(req.q),
        JsonRenderer::new(Vec::<u8>::new()),
    );
    widget.search()?;
    let body = widget.into_renderer().into_inner();

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

async fn get_post(State(context): State<AppState>, Path(id): Path<String>) -> Response {
    // Site-generated ids are usually URL paths with a leading slash
    let post = context.get(&id).or_else(|| context.get(&format!("/{}", id)));

    match post {
        Some(post) => Json(ApiResponse::success(post.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(format!("Post with id '{}' not found", id))),
        )
            .into_response(),
    }
}

async fn get_stats(State(context): State<AppState>) -> Json<ApiResponse<IndexStats>> {
    Json(ApiResponse::success(context.index().stats()))
}

// ========== Router ==========

pub fn create_router(context: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/search", get(search_posts))
        .route("/posts/*id", get(get_post))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(context)
}
