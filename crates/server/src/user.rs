//! User registration and confirmation endpoints.

use api_types::user::{UserNew, UserView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, email, server::ServerState};

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .register_user(&payload.email, &payload.name, &payload.password)
        .await?;

    email::spawn_confirmation(&user);

    Ok((
        StatusCode::CREATED,
        Json(UserView {
            user_id: user.user_id,
            email: user.email,
            name: user.name,
            confirmed: user.confirmed,
        }),
    ))
}

pub async fn confirm(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.confirm_user(&email).await?;
    Ok(StatusCode::OK)
}
