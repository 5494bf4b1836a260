//! Expenses API endpoints

use std::collections::HashMap;

use api_types::expense::ExpenseNew;
use api_types::pagination::{Paginated, PaginationMetadata};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use engine::Expense;

use crate::{
    ServerError,
    server::{ServerState, page_from_params},
};

pub async fn list(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Paginated<Expense>>, ServerError> {
    let page = page_from_params(&params);
    let (expenses, info) = state.engine.expenses(user.user_id, &params, page).await?;

    Ok(Json(Paginated {
        data: expenses,
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
    Path(expense_id): Path<i32>,
) -> Result<Json<Expense>, ServerError> {
    let expense = state.engine.expense(expense_id, user.user_id).await?;
    Ok(Json(expense))
}

pub async fn create(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<impl IntoResponse, ServerError> {
    let expense = state
        .engine
        .new_expense(
            user.user_id,
            payload.amount,
            &payload.category,
            &payload.date,
            payload.note.as_deref(),
            payload.account_id,
        )
        .await?;

    let location = format!("/api/v1/expenses/{}", expense.expense_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(expense),
    ))
}

pub async fn update(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<i32>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<Expense>, ServerError> {
    let expense = state
        .engine
        .update_expense(
            expense_id,
            user.user_id,
            payload.amount,
            &payload.category,
            &payload.date,
            payload.note.as_deref(),
            payload.account_id,
        )
        .await?;
    Ok(Json(expense))
}

pub async fn remove(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(expense_id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
