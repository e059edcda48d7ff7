use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate show id {0}")]
    DuplicateId(u64),

    #[error("no show ids left to assign")]
    IdsExhausted,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Parameter '{param}' is invalid: '{value}' {reason}")]
    Validation {
        param: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Chart rendering is not available")]
    RenderUnavailable,
}

impl CatalogError {
    pub fn invalid(param: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        CatalogError::Validation {
            param,
            value: value.into(),
            reason,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::Validation { .. } => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Store(_) | CatalogError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::RenderUnavailable => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
