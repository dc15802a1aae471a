use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::dto::{LoginRequest, SignupRequest};
use crate::auth::error::AuthError;
use crate::auth::jwt::{JwtKeys, TokenPair};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::User;
use crate::auth::wallet::{normalize_address, placeholder_email};
use crate::state::AppState;

// The identity resolver: each operation maps one authentication signal to
// exactly one user row, then mints a token pair. Handlers stay thin.

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// The existence pre-checks in signup are only for friendly messages; the
/// unique constraints decide under concurrency, and their violations come
/// back through here.
fn translate_insert_error(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let constraint = db.constraint().unwrap_or_default();
            if constraint.contains("username") {
                return AuthError::DuplicateUsername;
            }
            return AuthError::DuplicateEmail;
        }
    }
    AuthError::Internal(e.into())
}

pub async fn signup(state: &AppState, req: SignupRequest) -> Result<(User, TokenPair), AuthError> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "signup with invalid email");
        return Err(AuthError::InvalidEmail);
    }
    if req.password.len() < 8 {
        return Err(AuthError::PasswordTooShort);
    }
    let username = req.username.as_deref().map(str::trim).filter(|u| !u.is_empty());
    let first_name = req.first_name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let last_name = req.last_name.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "signup with registered email");
        return Err(AuthError::DuplicateEmail);
    }
    if let Some(username) = username {
        if User::find_by_username(&state.db, username).await?.is_some() {
            warn!(username = %username, "signup with taken username");
            return Err(AuthError::DuplicateUsername);
        }
    }

    let hash = hash_password(&req.password)?;
    let user = User::create_with_password(&state.db, &email, username, first_name, last_name, &hash)
        .await
        .map_err(translate_insert_error)?;

    let tokens = JwtKeys::from_ref(state).issue_pair(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((user, tokens))
}

pub async fn login(state: &AppState, req: LoginRequest) -> Result<(User, TokenPair), AuthError> {
    let email = req.email.trim().to_lowercase();

    // Unknown email, credential-less account and wrong password all surface
    // the same way.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    let hash = user
        .password_hash
        .as_deref()
        .ok_or(AuthError::InvalidCredentials)?;
    if !verify_password(&req.password, hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login on deactivated account");
        return Err(AuthError::AccountDeactivated);
    }

    let tokens = JwtKeys::from_ref(state).issue_pair(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, tokens))
}

pub async fn google_login(state: &AppState, credential: &str) -> Result<(User, TokenPair), AuthError> {
    let claims = state
        .google
        .verify(credential)
        .await
        .ok_or(AuthError::InvalidProviderToken)?;
    let email = claims.email.trim().to_lowercase();
    let first_name = claims.first_name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let last_name = claims.last_name.as_deref().map(str::trim).filter(|s| !s.is_empty());

    // Resolution order: google id, then email (links the identity to an
    // existing account), then create.
    let resolved = match User::find_by_google_id(&state.db, &claims.google_id).await? {
        Some(user) => user,
        None => match User::find_by_email(&state.db, &email).await? {
            Some(user) => {
                info!(user_id = %user.id, "linking google identity to existing account");
                user
            }
            None => {
                let user = User::create_from_google(
                    &state.db,
                    &email,
                    &claims.google_id,
                    first_name,
                    last_name,
                    claims.is_verified,
                )
                .await
                .map_err(translate_insert_error)?;
                info!(user_id = %user.id, "created user from google identity");
                user
            }
        },
    };

    // Latest provider profile wins for non-empty names; is_verified only
    // ever moves to true. Persisted before tokens are issued.
    let user = User::apply_google_profile(
        &state.db,
        resolved.id,
        &claims.google_id,
        first_name,
        last_name,
        claims.is_verified,
    )
    .await?;

    if !user.is_active {
        warn!(user_id = %user.id, "google login on deactivated account");
        return Err(AuthError::AccountDeactivated);
    }

    let tokens = JwtKeys::from_ref(state).issue_pair(user.id)?;
    info!(user_id = %user.id, "google login");
    Ok((user, tokens))
}

pub async fn wallet_login(
    state: &AppState,
    wallet_address: Option<&str>,
) -> Result<(User, TokenPair), AuthError> {
    let address = wallet_address
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(AuthError::MissingWalletAddress)?;
    let address = normalize_address(address);

    let user = match User::find_by_wallet(&state.db, &address).await? {
        Some(user) => user,
        None => {
            // Ownership of the address is not proven on this path;
            // wallet::verify_wallet_signature exists but is not called here.
            let user = User::create_from_wallet(&state.db, &address, &placeholder_email(&address))
                .await
                .map_err(translate_insert_error)?;
            info!(user_id = %user.id, "created user from wallet address");
            user
        }
    };

    if !user.is_active {
        warn!(user_id = %user.id, "wallet login on deactivated account");
        return Err(AuthError::AccountDeactivated);
    }

    let tokens = JwtKeys::from_ref(state).issue_pair(user.id)?;
    info!(user_id = %user.id, "wallet login");
    Ok((user, tokens))
}

pub async fn refresh(
    state: &AppState,
    refresh_token: Option<&str>,
) -> Result<(User, TokenPair), AuthError> {
    let token = refresh_token.ok_or(AuthError::InvalidToken)?;
    let keys = JwtKeys::from_ref(state);
    let claims = keys.verify_refresh(token).map_err(|e| {
        warn!(error = %e, "refresh token rejected");
        AuthError::InvalidToken
    })?;

    // A vanished or deactivated subject is indistinguishable from a bad
    // token on the outside.
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AuthError::InvalidToken)?;
    if !user.is_active {
        return Err(AuthError::InvalidToken);
    }

    // Rotation: the presented refresh token is never echoed back.
    let tokens = keys.issue_pair(user.id)?;
    info!(user_id = %user.id, "tokens refreshed");
    Ok((user, tokens))
}

/// Backs GET /auth/me: the subject came from a verified access token, but
/// the row must still exist and be active.
pub async fn current_user(state: &AppState, user_id: Uuid) -> Result<User, AuthError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;
    if !user.is_active {
        return Err(AuthError::InvalidToken);
    }
    Ok(user)
}
