use chrono::Utc;

use actlog_core::Identity;

use crate::app::AppState;
use crate::domains::auth::core::tokens::hash_token;

/// Resolves a bearer token to the caller behind it.
///
/// Errors are short codes; `db_error` is the only one that is not the
/// caller's fault.
pub async fn identity_from_session_token(
    state: &AppState,
    token: &str,
) -> Result<Identity, &'static str> {
    let token_hash = hash_token(token, &state.token_pepper);
    let session = state
        .store
        .get_session_by_access_token_hash(&token_hash)
        .await
        .map_err(|err| {
            tracing::error!(
                event = "auth_session_lookup_failed",
                error = %err,
                "Failed to load session by access token"
            );
            "db_error"
        })?
        .ok_or("invalid_token")?;
    if session.is_expired(Utc::now()) {
        return Err("token_expired");
    }

    let user = state
        .store
        .get_user(&session.user_id)
        .await
        .map_err(|err| {
            tracing::error!(
                event = "auth_user_lookup_failed",
                error = %err,
                "Failed to load user"
            );
            "db_error"
        })?
        .ok_or("user_not_found")?;
    if !user.is_active {
        return Err("user_inactive");
    }

    Ok(Identity::from_user(&user, session.id))
}
