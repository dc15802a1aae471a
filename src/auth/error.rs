use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Every failure an authentication operation can surface. Each variant maps
/// to one fixed client-visible message; internals are logged, never returned.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Username already taken")]
    DuplicateUsername,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password too short")]
    PasswordTooShort,
    // One message for unknown email, missing credential and bad password, so
    // responses don't reveal which accounts exist.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account is deactivated")]
    AccountDeactivated,
    // Also covers refresh against a missing or deactivated user.
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("Invalid Google token")]
    InvalidProviderToken,
    #[error("Wallet address is required")]
    MissingWalletAddress,
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AuthError {
    fn from(e: anyhow::Error) -> Self {
        AuthError::Internal(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::DuplicateEmail
            | AuthError::DuplicateUsername
            | AuthError::InvalidEmail
            | AuthError::PasswordTooShort
            | AuthError::MissingWalletAddress => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::AccountDeactivated
            | AuthError::InvalidToken
            | AuthError::InvalidProviderToken => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let AuthError::Internal(source) = &self {
            error!(error = ?source, "internal error");
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn statuses_match_error_kinds() {
        assert_eq!(
            AuthError::DuplicateEmail.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::MissingWalletAddress.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AccountDeactivated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"Invalid email or password"}"#);
    }

    #[tokio::test]
    async fn internal_error_never_leaks_detail() {
        let response = AuthError::Internal(anyhow::anyhow!("db password wrong")).into_response();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"Internal server error"}"#);
    }
}
