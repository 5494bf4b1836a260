//! The module contains the `Expense` type representing a dated movement
//! against exactly one account.
//!
//! Amounts are signed: a negative amount is a credit/refund and is summed
//! as-is by the balance engine.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// A dated, signed monetary entry against one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: i32,
    pub amount: i64,
    pub category: String,
    /// Calendar date, no time component.
    pub date: NaiveDate,
    pub note: Option<String>,
    pub user_id: i32,
    pub account_id: i32,
}

/// Parse an ISO `YYYY-MM-DD` date coming from a payload or query string.
pub fn parse_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| EngineError::MalformedFilter(format!("invalid date: {value}")))
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub expense_id: i32,
    pub amount: i64,
    pub category: String,
    pub date: Date,
    pub note: Option<String>,
    pub user_id: i32,
    pub account_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            expense_id: model.expense_id,
            amount: model.amount,
            category: model.category,
            date: model.date,
            note: model.note,
            user_id: model.user_id,
            account_id: model.account_id,
        }
    }
}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            expense_id: ActiveValue::NotSet,
            amount: ActiveValue::Set(value.amount),
            category: ActiveValue::Set(value.category.clone()),
            date: ActiveValue::Set(value.date),
            note: ActiveValue::Set(value.note.clone()),
            user_id: ActiveValue::Set(value.user_id),
            account_id: ActiveValue::Set(value.account_id),
        }
    }
}
