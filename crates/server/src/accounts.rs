//! Accounts API endpoints

use std::collections::HashMap;

use api_types::account::AccountNew;
use api_types::pagination::{Paginated, PaginationMetadata};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use engine::Account;

use crate::{
    ServerError,
    server::{ServerState, page_from_params},
};

pub async fn list(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Paginated<Account>>, ServerError> {
    let page = page_from_params(&params);
    let (accounts, info) = state.engine.accounts(user.user_id, &params, page).await?;

    Ok(Json(Paginated {
        data: accounts,
        pagination_metadata: PaginationMetadata {
            page: info.page,
            per_page: info.per_page,
            pages: info.pages,
            total: info.total,
        },
    }))
}

pub async fn get_one(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Path(account_id): Path<i32>,
) -> Result<Json<Account>, ServerError> {
    let account = state.engine.account(account_id, user.user_id).await?;
    Ok(Json(account))
}

pub async fn create(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<impl IntoResponse, ServerError> {
    let account = state
        .engine
        .new_account(
            user.user_id,
            &payload.name,
            payload.has_plafond,
            payload.plafond,
            payload.initial_balance,
        )
        .await?;

    let location = format!("/api/v1/accounts/{}", account.account_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(account),
    ))
}

pub async fn update(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Path(account_id): Path<i32>,
    Json(payload): Json<AccountNew>,
) -> Result<Json<Account>, ServerError> {
    let account = state
        .engine
        .update_account(
            account_id,
            user.user_id,
            &payload.name,
            payload.has_plafond,
            payload.plafond,
            payload.initial_balance,
        )
        .await?;
    Ok(Json(account))
}

pub async fn remove(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Path(account_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(account_id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
