//! Balance API endpoints

use api_types::balance::BalanceQuery;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::{Datelike, Local, NaiveDate};
use engine::{Balance, EngineError, parse_date};

use crate::{ServerError, server::ServerState};

fn parse_bound(value: Option<&str>) -> Result<Option<NaiveDate>, EngineError> {
    value.map(parse_date).transpose()
}

/// Combine the `year`/`month` params into the 1st-of-month reference date,
/// defaulting to the current month.
fn reference_month(year: Option<i32>, month: Option<u32>) -> Result<NaiveDate, EngineError> {
    let today = Local::now().date_naive();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::MalformedFilter(format!("invalid month: {year}-{month:02}")))
}

pub async fn account_balance(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Path(account_id): Path<i32>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<Balance>, ServerError> {
    let account = state.engine.account(account_id, user.user_id).await?;
    let from = parse_bound(query.from.as_deref())?;
    let to = parse_bound(query.to.as_deref())?;
    let month = reference_month(query.year, query.month)?;

    let balance = state
        .engine
        .balance(user.user_id, Some(account), from, to, Some(month))
        .await?;
    Ok(Json(balance))
}

pub async fn global_balance(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<Balance>, ServerError> {
    let from = parse_bound(query.from.as_deref())?;
    let to = parse_bound(query.to.as_deref())?;

    let balance = state
        .engine
        .balance(user.user_id, None, from, to, None)
        .await?;
    Ok(Json(balance))
}
