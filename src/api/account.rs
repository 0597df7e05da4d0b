//! Account deletion handler.

use std::sync::Arc;

use axum::{Extension, extract::State};

use crate::core::account;

use super::{
    auth::CurrentUser,
    routes::AppState,
    types::{ApiResponse, ApiResult},
};

/// `DELETE /api/account` - permanently deletes the requester's account and
/// every record it owns. The session identifies the account, so a user can
/// only ever delete themselves.
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<()> {
    account::delete_account(&state.db, user.id).await?;
    Ok(ApiResponse::ok_empty(
        "Cuenta y todos los datos asociados han sido eliminados permanentemente",
    ))
}
