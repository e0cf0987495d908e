use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use tracing::error;

use crate::application::dto::ErrorResponse;
use crate::domain::errors::DomainError;

/// Envoltorio para devolver un `DomainError` como respuesta HTTP.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::Storage(_)
            | DomainError::Inference(_)
            | DomainError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self.0);
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_input_is_a_client_error() {
        let status = |e: DomainError| ApiError::from(e).status();
        assert_eq!(status(DomainError::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(DomainError::Storage("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status(DomainError::Inference("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status(DomainError::OperationFailed("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
