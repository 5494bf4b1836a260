//! Request/response types shared between the server and its clients.

use serde::{Deserialize, Serialize};

pub mod account {
    use super::*;

    /// Create/update payload for an account (updates are full-field).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        #[serde(default)]
        pub has_plafond: bool,
        /// Credit ceiling; only meaningful with `has_plafond = true`.
        pub plafond: Option<i64>,
        #[serde(default)]
        pub initial_balance: i64,
    }
}

pub mod expense {
    use super::*;

    /// Create/update payload for an expense (updates are full-field).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// Signed amount: negative values are credits/refunds.
        pub amount: i64,
        pub category: String,
        /// Calendar date as `YYYY-MM-DD`.
        pub date: String,
        pub note: Option<String>,
        pub account_id: i32,
    }
}

pub mod balance {
    use super::*;

    /// Query parameters of the balance endpoints.
    ///
    /// All bounds are `YYYY-MM-DD`; `year`/`month` only apply to the
    /// plafond branch of single-account requests.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BalanceQuery {
        pub from: Option<String>,
        pub to: Option<String>,
        pub year: Option<i32>,
        pub month: Option<u32>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub email: String,
        pub name: String,
        pub password: String,
    }

    /// Public view of a user; the password hash never leaves the server.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub user_id: i32,
        pub email: String,
        pub name: String,
        pub confirmed: bool,
    }
}

pub mod pagination {
    use super::*;

    /// Pagination block attached to list responses.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaginationMetadata {
        pub page: u64,
        pub per_page: u64,
        pub pages: u64,
        pub total: u64,
    }

    /// A page of items plus its pagination block.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Paginated<T> {
        pub data: Vec<T>,
        pub pagination_metadata: PaginationMetadata,
    }
}
