use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod error;
pub(crate) mod extractors;
pub mod google;
pub mod handlers;
pub mod jwt;
pub mod password;
mod repo;
pub mod repo_types;
pub mod service;
pub mod wallet;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
