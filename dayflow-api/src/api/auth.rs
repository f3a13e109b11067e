//! Bearer token middleware
//!
//! Applied with `route_layer` to the protected routes only. The verified
//! [`AuthUser`](crate::services::AuthUser) is stored in the request
//! extensions for handlers to pick up with `Extension<AuthUser>`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::services::supabase_auth::bearer_token;
use crate::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header)?.to_string();

    let user = state.auth.verify(&token).await.map_err(|e| {
        tracing::debug!(path = %request.uri().path(), "Rejected request: {}", e);
        ApiError::from(e)
    })?;

    tracing::debug!(user_id = %user.id, path = %request.uri().path(), "Authenticated request");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
