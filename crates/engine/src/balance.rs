//! The module contains the `Balance` value object.

use serde::Serialize;

use crate::Account;

/// A derived balance triple, computed on demand and never persisted.
///
/// Fields include the account baseline (`initial_balance` or `plafond`,
/// per account type): a scope with zero matching expenses yields the
/// baseline unchanged, never a missing value. The one exception is the
/// start-of-period figure of a plafond account, which is pinned to 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// Sum of expenses up to today, plus baseline.
    pub current_balance: i64,
    /// Sum of expenses strictly before the `from` boundary, plus baseline.
    /// Always 0 for plafond accounts: the credit line resets every month.
    pub start_period_balance: i64,
    /// Sum of expenses up to and including the `to` boundary (plain), or
    /// within the reference month (plafond), plus baseline.
    pub end_period_balance: i64,
    /// Source account for single-account requests; absent for the
    /// aggregate case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}
