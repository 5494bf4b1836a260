//! The balance engine.
//!
//! Computes the derived [`Balance`] triple for a single account or for all
//! of a user's non-plafond accounts combined. Pure read-only aggregation:
//! sums run as `SUM(amount)` selects against the store, never row-by-row in
//! memory, and nothing is ever mutated.

use chrono::{Datelike, Local, NaiveDate};
use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{Account, Balance, EngineError, ResultEngine, accounts, expenses};

use super::{Engine, with_tx};

/// First day of the month containing `date`.
fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Last day of the month containing `date`.
fn last_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

impl Engine {
    /// Compute the balance for one account, or for all of the user's
    /// non-plafond accounts when `account` is `None`.
    ///
    /// - `from`/`to` bound the period for plain accounts; they default to
    ///   the minimum representable date and today. The engine always
    ///   enforces `from <= to`, regardless of account type.
    /// - `month` is the reference date for the plafond branch's
    ///   `end_period_balance`; it defaults to the current month. Only the
    ///   month it falls in matters.
    ///
    /// The caller is expected to hand in an already-authorized account;
    /// ownership is not re-checked here.
    pub async fn balance(
        &self,
        user_id: i32,
        account: Option<Account>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        month: Option<NaiveDate>,
    ) -> ResultEngine<Balance> {
        let today = Local::now().date_naive();
        let from = from.unwrap_or(NaiveDate::MIN);
        let to = to.unwrap_or(today);
        if from > to {
            return Err(EngineError::DateFilter(format!(
                "from ({from}) must not be after to ({to})"
            )));
        }
        let month = first_of_month(month.unwrap_or(today));

        with_tx!(self, |db_tx| {
            // Baseline and expense scope depend on the request shape.
            let (scope, baseline) = match &account {
                Some(account) => (
                    Condition::all()
                        .add(expenses::Column::AccountId.eq(account.account_id)),
                    account.baseline(),
                ),
                None => {
                    // Aggregate view: plafond accounts track available
                    // credit, not cumulative wealth, so they are excluded
                    // from both the id set and the baseline sum.
                    let plain: Vec<accounts::Model> = accounts::Entity::find()
                        .filter(accounts::Column::UserId.eq(user_id))
                        .filter(accounts::Column::HasPlafond.eq(false))
                        .all(&db_tx)
                        .await?;
                    let ids: Vec<i32> = plain.iter().map(|a| a.account_id).collect();
                    let baseline: i64 = plain.iter().map(|a| a.initial_balance).sum();
                    (
                        Condition::all().add(expenses::Column::AccountId.is_in(ids)),
                        baseline,
                    )
                }
            };

            let is_plafond = account.as_ref().is_some_and(|a| a.has_plafond);
            let (current, start, end) = if is_plafond {
                // Credit-limit semantics: the line resets empty at every
                // month start, so `current` only looks at this month and
                // `start` carries no history at all.
                let current = sum_expenses(
                    &db_tx,
                    scope
                        .clone()
                        .add(expenses::Column::Date.lte(today))
                        .add(expenses::Column::Date.gte(first_of_month(today))),
                )
                .await?;
                let end = sum_expenses(
                    &db_tx,
                    scope
                        .add(expenses::Column::Date.gte(month))
                        .add(expenses::Column::Date.lte(last_of_month(month))),
                )
                .await?;
                (current + baseline, 0, end + baseline)
            } else {
                let current =
                    sum_expenses(&db_tx, scope.clone().add(expenses::Column::Date.lte(today)))
                        .await?;
                let start =
                    sum_expenses(&db_tx, scope.clone().add(expenses::Column::Date.lt(from)))
                        .await?;
                let end =
                    sum_expenses(&db_tx, scope.add(expenses::Column::Date.lte(to))).await?;
                (current + baseline, start + baseline, end + baseline)
            };

            Ok(Balance {
                current_balance: current,
                start_period_balance: start,
                end_period_balance: end,
                account,
            })
        })
    }
}

/// `SUM(amount)` over the expenses matching `scope`.
///
/// An empty scope sums to SQL `NULL`; that is 0 here, never a missing
/// value, so baselines pass through unchanged.
async fn sum_expenses(db_tx: &DatabaseTransaction, scope: Condition) -> ResultEngine<i64> {
    let total: Option<Option<i64>> = expenses::Entity::find()
        .select_only()
        .column_as(expenses::Column::Amount.sum(), "total")
        .filter(scope)
        .into_tuple()
        .one(db_tx)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_month_clamps_the_day() {
        let date = NaiveDate::from_ymd_opt(2018, 2, 17).unwrap();
        assert_eq!(
            first_of_month(date),
            NaiveDate::from_ymd_opt(2018, 2, 1).unwrap()
        );
    }

    #[test]
    fn last_of_month_handles_february_and_december() {
        let feb = NaiveDate::from_ymd_opt(2018, 2, 3).unwrap();
        assert_eq!(
            last_of_month(feb),
            NaiveDate::from_ymd_opt(2018, 2, 28).unwrap()
        );

        let leap = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(
            last_of_month(leap),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
        );

        let dec = NaiveDate::from_ymd_opt(2018, 12, 31).unwrap();
        assert_eq!(
            last_of_month(dec),
            NaiveDate::from_ymd_opt(2018, 12, 31).unwrap()
        );
    }
}
