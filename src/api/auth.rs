//! Register/login handlers and the session middleware.
//!
//! Sessions are bearer JWTs; `require_session` verifies the token and makes
//! the authenticated identity available to handlers as a request extension,
//! so handlers never touch token internals.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    auth,
    core::account::{self, NewUser},
    errors::Error,
};

use super::{
    routes::AppState,
    types::{ApiError, ApiResponse, ApiResult, LoginRequest, SessionResponse, UserSummary},
};

/// Identity of the authenticated requester, inserted by [`require_session`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// User id from the session token
    pub id: i32,
    /// Email from the session token
    pub email: String,
}

impl From<crate::entities::user::Model> for UserSummary {
    fn from(model: crate::entities::user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            last_name: model.last_name,
            email: model.email,
        }
    }
}

/// `POST /api/auth/register` - creates an account and logs it in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<SessionResponse> {
    let user = account::register_user(&state.db, new_user).await?;
    let token = auth::issue_session(
        &state.config.session_secret,
        state.config.session_ttl_minutes,
        user.id,
        &user.email,
    )?;

    Ok(ApiResponse::ok(
        "Usuario registrado correctamente",
        SessionResponse {
            token,
            user: user.into(),
        },
    ))
}

/// `POST /api/auth/login` - verifies credentials and issues a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let user = account::verify_credentials(&state.db, &request.email, &request.password).await?;
    let token = auth::issue_session(
        &state.config.session_secret,
        state.config.session_ttl_minutes,
        user.id,
        &user.email,
    )?;

    Ok(ApiResponse::ok(
        "Inicio de sesión exitoso",
        SessionResponse {
            token,
            user: user.into(),
        },
    ))
}

/// Middleware guarding every authenticated route. A missing, malformed,
/// expired, or tampered bearer token short-circuits with the 401 envelope.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return ApiError(Error::Unauthenticated).into_response();
    };

    let claims = match auth::verify_session(&state.config.session_secret, token) {
        Ok(claims) => claims,
        Err(_) => return ApiError(Error::Unauthenticated).into_response(),
    };

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
    });
    next.run(request).await
}
