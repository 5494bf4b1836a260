use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{EngineError, Expense, FieldError, ResultEngine, expenses, filter};

use super::{Engine, Page, PageInfo, checked_optional_text, checked_text, with_tx};

/// Validate the writable expense fields, normalizing the date from its
/// `YYYY-MM-DD` wire form.
fn checked_expense_fields(
    category: &str,
    date: &str,
    note: Option<&str>,
) -> ResultEngine<(String, NaiveDate, Option<String>)> {
    let mut errors = Vec::new();
    let category = checked_text("category", category, 40, &mut errors);
    let note = checked_optional_text("note", note, 200, &mut errors);
    let date = match expenses::parse_date(date) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new("date", "not a valid date (expected YYYY-MM-DD)"));
            None
        }
    };
    match date {
        Some(date) if errors.is_empty() => Ok((category, date, note)),
        _ => Err(EngineError::Validation(errors)),
    }
}

impl Engine {
    /// Fetch a single expense, checking ownership.
    pub async fn expense(&self, expense_id: i32, user_id: i32) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            self.require_expense(&db_tx, expense_id, user_id).await
        })
    }

    /// List the user's expenses, filtered by the recognized params
    /// (`category`, `account_id`, `dateBetween`, `from`, `to`) and paged.
    pub async fn expenses(
        &self,
        user_id: i32,
        params: &HashMap<String, String>,
        page: Page,
    ) -> ResultEngine<(Vec<Expense>, PageInfo)> {
        let page = page.normalized();
        with_tx!(self, |db_tx| {
            let query = expenses::Entity::find()
                .filter(expenses::Column::UserId.eq(user_id))
                .order_by_asc(expenses::Column::ExpenseId);
            let query = filter::expense_filters(query, params)?;

            let paginator = query.paginate(&db_tx, page.per_page);
            let counts = paginator.num_items_and_pages().await?;
            let models = paginator.fetch_page(page.page - 1).await?;

            let info = PageInfo {
                page: page.page,
                per_page: page.per_page,
                pages: counts.number_of_pages,
                total: counts.number_of_items,
            };
            Ok((models.into_iter().map(Expense::from).collect(), info))
        })
    }

    /// Record a new expense against one of the user's accounts.
    ///
    /// `amount` is signed: negative amounts are credits/refunds and are
    /// accepted as-is.
    pub async fn new_expense(
        &self,
        user_id: i32,
        amount: i64,
        category: &str,
        date: &str,
        note: Option<&str>,
        account_id: i32,
    ) -> ResultEngine<Expense> {
        let (category, date, note) = checked_expense_fields(category, date, note)?;

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, account_id, user_id).await?;

            let model = expenses::ActiveModel {
                expense_id: ActiveValue::NotSet,
                amount: ActiveValue::Set(amount),
                category: ActiveValue::Set(category.clone()),
                date: ActiveValue::Set(date),
                note: ActiveValue::Set(note.clone()),
                user_id: ActiveValue::Set(user_id),
                account_id: ActiveValue::Set(account_id),
            }
            .insert(&db_tx)
            .await?;
            Ok(Expense::from(model))
        })
    }

    /// Full-field update of an existing expense.
    pub async fn update_expense(
        &self,
        expense_id: i32,
        user_id: i32,
        amount: i64,
        category: &str,
        date: &str,
        note: Option<&str>,
        account_id: i32,
    ) -> ResultEngine<Expense> {
        let (category, date, note) = checked_expense_fields(category, date, note)?;

        with_tx!(self, |db_tx| {
            self.require_expense(&db_tx, expense_id, user_id).await?;
            self.require_account(&db_tx, account_id, user_id).await?;

            let model = expenses::ActiveModel {
                expense_id: ActiveValue::Set(expense_id),
                amount: ActiveValue::Set(amount),
                category: ActiveValue::Set(category.clone()),
                date: ActiveValue::Set(date),
                note: ActiveValue::Set(note.clone()),
                user_id: ActiveValue::Set(user_id),
                account_id: ActiveValue::Set(account_id),
            }
            .update(&db_tx)
            .await?;
            Ok(Expense::from(model))
        })
    }

    /// Delete an expense. Idempotent: a missing expense is not an error.
    pub async fn delete_expense(&self, expense_id: i32, user_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            match self.require_expense(&db_tx, expense_id, user_id).await {
                Ok(_) => {
                    expenses::Entity::delete_by_id(expense_id)
                        .exec(&db_tx)
                        .await?;
                    Ok(())
                }
                Err(EngineError::KeyNotFound(_)) => Ok(()),
                Err(err) => Err(err),
            }
        })
    }

    pub(crate) async fn require_expense(
        &self,
        db_tx: &DatabaseTransaction,
        expense_id: i32,
        user_id: i32,
    ) -> ResultEngine<Expense> {
        let model = expenses::Entity::find_by_id(expense_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("expense {expense_id}")))?;
        if model.user_id != user_id {
            return Err(EngineError::Forbidden(format!(
                "expense {expense_id} belongs to another user"
            )));
        }
        Ok(Expense::from(model))
    }
}
