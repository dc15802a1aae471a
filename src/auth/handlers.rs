use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            GoogleAuthRequest, LoginRequest, MessageResponse, RefreshRequest, SignupRequest,
            TokenResponse, UserResponse, WalletAuthRequest,
        },
        error::AuthError,
        extractors::AuthUser,
        service,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/google", post(google))
        .route("/auth/wallet", post(wallet))
}

#[instrument(skip(state, payload))]
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let (user, tokens) = service::signup(&state, payload).await?;
    Ok(Json(TokenResponse::new(user, tokens)))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let (user, tokens) = service::login(&state, payload).await?;
    Ok(Json(TokenResponse::new(user, tokens)))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, AuthError> {
    let user = service::current_user(&state, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let (user, tokens) = service::refresh(&state, payload.refresh_token.as_deref()).await?;
    Ok(Json(TokenResponse::new(user, tokens)))
}

/// Tokens are stateless, so logout is a client-side discard; the endpoint
/// exists so clients have something to call.
#[instrument]
async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Successfully logged out".into(),
    })
}

#[instrument(skip(state, payload))]
async fn google(
    State(state): State<AppState>,
    Json(payload): Json<GoogleAuthRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let (user, tokens) = service::google_login(&state, &payload.google_token).await?;
    Ok(Json(TokenResponse::new(user, tokens)))
}

#[instrument(skip(state, payload))]
async fn wallet(
    State(state): State<AppState>,
    Json(payload): Json<WalletAuthRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let (user, tokens) =
        service::wallet_login(&state, payload.wallet_address.as_deref()).await?;
    Ok(Json(TokenResponse::new(user, tokens)))
}
