//! The module contains the `Account` struct and its implementation.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

/// An account.
///
/// An account is a container of expenses. It comes in two flavours:
///
/// - a plain account, tracking cumulative wealth starting from
///   `initial_balance`;
/// - a "plafond" account, a credit card with a monthly credit ceiling.
///   Its balance is available credit, not wealth, and conceptually resets
///   at the start of every calendar month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier.
    pub account_id: i32,
    pub name: String,
    pub user_id: i32,
    pub has_plafond: bool,
    /// Credit ceiling, meaningful only when `has_plafond` is true.
    pub plafond: Option<i64>,
    /// Carried-forward starting balance for plain accounts.
    pub initial_balance: i64,
}

impl Account {
    /// The starting value added to every period sum.
    ///
    /// Plafond accounts use the ceiling as baseline, overriding
    /// `initial_balance`; plain accounts use `initial_balance`.
    pub fn baseline(&self) -> i64 {
        if self.has_plafond {
            self.plafond.unwrap_or(0)
        } else {
            self.initial_balance
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub account_id: i32,
    pub name: String,
    pub user_id: i32,
    pub has_plafond: bool,
    pub plafond: Option<i64>,
    pub initial_balance: i64,
}

// Expenses keep a plain `account_id` column with no foreign key, so there
// is no relation to declare; deleting an account leaves its expenses in
// place (see `ops::accounts`).
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            account_id: model.account_id,
            name: model.name,
            user_id: model.user_id,
            has_plafond: model.has_plafond,
            plafond: model.plafond,
            initial_balance: model.initial_balance,
        }
    }
}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            account_id: ActiveValue::NotSet,
            name: ActiveValue::Set(value.name.clone()),
            user_id: ActiveValue::Set(value.user_id),
            has_plafond: ActiveValue::Set(value.has_plafond),
            plafond: ActiveValue::Set(value.plafond),
            initial_balance: ActiveValue::Set(value.initial_balance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(has_plafond: bool, plafond: Option<i64>, initial_balance: i64) -> Account {
        Account {
            account_id: 1,
            name: String::from("Conto"),
            user_id: 1,
            has_plafond,
            plafond,
            initial_balance,
        }
    }

    #[test]
    fn plain_account_baseline_is_initial_balance() {
        assert_eq!(account(false, None, 2500).baseline(), 2500);
    }

    #[test]
    fn plafond_account_baseline_is_the_ceiling() {
        assert_eq!(account(true, Some(150_000), 2500).baseline(), 150_000);
    }

    #[test]
    fn plafond_account_without_ceiling_falls_back_to_zero() {
        assert_eq!(account(true, None, 2500).baseline(), 0);
    }
}
