use std::collections::HashMap;

use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{Account, EngineError, ResultEngine, accounts, filter};

use super::{Engine, Page, PageInfo, checked_text, with_tx};

impl Engine {
    /// Fetch a single account, checking ownership.
    pub async fn account(&self, account_id: i32, user_id: i32) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, account_id, user_id).await
        })
    }

    /// List the user's accounts, filtered by the recognized params
    /// (`name`, `account_id`) and paged.
    pub async fn accounts(
        &self,
        user_id: i32,
        params: &HashMap<String, String>,
        page: Page,
    ) -> ResultEngine<(Vec<Account>, PageInfo)> {
        let page = page.normalized();
        with_tx!(self, |db_tx| {
            let query = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .order_by_asc(accounts::Column::AccountId);
            let query = filter::account_filters(query, params)?;

            let paginator = query.paginate(&db_tx, page.per_page);
            let counts = paginator.num_items_and_pages().await?;
            let models = paginator.fetch_page(page.page - 1).await?;

            let info = PageInfo {
                page: page.page,
                per_page: page.per_page,
                pages: counts.number_of_pages,
                total: counts.number_of_items,
            };
            Ok((models.into_iter().map(Account::from).collect(), info))
        })
    }

    /// Create a new account for the user.
    pub async fn new_account(
        &self,
        user_id: i32,
        name: &str,
        has_plafond: bool,
        plafond: Option<i64>,
        initial_balance: i64,
    ) -> ResultEngine<Account> {
        let mut errors = Vec::new();
        let name = checked_text("name", name, 40, &mut errors);
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        with_tx!(self, |db_tx| {
            let model = accounts::ActiveModel {
                account_id: ActiveValue::NotSet,
                name: ActiveValue::Set(name.clone()),
                user_id: ActiveValue::Set(user_id),
                has_plafond: ActiveValue::Set(has_plafond),
                plafond: ActiveValue::Set(plafond),
                initial_balance: ActiveValue::Set(initial_balance),
            }
            .insert(&db_tx)
            .await?;
            Ok(Account::from(model))
        })
    }

    /// Full-field update of an existing account.
    pub async fn update_account(
        &self,
        account_id: i32,
        user_id: i32,
        name: &str,
        has_plafond: bool,
        plafond: Option<i64>,
        initial_balance: i64,
    ) -> ResultEngine<Account> {
        let mut errors = Vec::new();
        let name = checked_text("name", name, 40, &mut errors);
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, account_id, user_id).await?;

            let model = accounts::ActiveModel {
                account_id: ActiveValue::Set(account_id),
                name: ActiveValue::Set(name.clone()),
                user_id: ActiveValue::Set(user_id),
                has_plafond: ActiveValue::Set(has_plafond),
                plafond: ActiveValue::Set(plafond),
                initial_balance: ActiveValue::Set(initial_balance),
            }
            .update(&db_tx)
            .await?;
            Ok(Account::from(model))
        })
    }

    /// Delete an account.
    ///
    /// Deleting is idempotent: a missing account is not an error. Expenses
    /// referencing the account are left in place (documented policy; the
    /// schema declares no foreign key from expenses to accounts).
    pub async fn delete_account(&self, account_id: i32, user_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            match self.require_account(&db_tx, account_id, user_id).await {
                Ok(_) => {
                    accounts::Entity::delete_by_id(account_id)
                        .exec(&db_tx)
                        .await?;
                    Ok(())
                }
                Err(EngineError::KeyNotFound(_)) => Ok(()),
                Err(err) => Err(err),
            }
        })
    }

    /// Fetch an account inside an open transaction, mapping absence to
    /// `KeyNotFound` and foreign ownership to `Forbidden`.
    pub(crate) async fn require_account(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i32,
        user_id: i32,
    ) -> ResultEngine<Account> {
        let model = accounts::Entity::find_by_id(account_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("account {account_id}")))?;
        if model.user_id != user_id {
            return Err(EngineError::Forbidden(format!(
                "account {account_id} belongs to another user"
            )));
        }
        Ok(Account::from(model))
    }
}
