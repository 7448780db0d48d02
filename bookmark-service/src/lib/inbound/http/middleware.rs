use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::CREDENTIALS_REJECTED;
use crate::inbound::http::router::AppState;

/// Extension holding the user the bearer token resolved to.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Middleware that resolves the bearer token to a user and adds it to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req)?.to_owned();

    let user = state.access_guard.authenticate(&token).await?;

    tracing::debug!(user_id = %user.id, "Request authenticated");

    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, ApiError> {
    let rejected = |detail: &str| {
        tracing::warn!(reason = detail, "Bearer token rejected");
        ApiError::Unauthorized(CREDENTIALS_REJECTED.to_string())
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| rejected("missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| rejected("Authorization header is not valid ASCII"))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| rejected("Authorization header is not a bearer credential"))
}
