//! Domain core of the expense tracker.
//!
//! The engine owns the entities (`users`, `accounts`, `expenses`), the
//! balance computation and the query filters. It talks to the store
//! through SeaORM and raises typed [`EngineError`]s; HTTP concerns live in
//! the `server` crate.

pub use accounts::Account;
pub use balance::Balance;
pub use error::{EngineError, FieldError};
pub use expenses::{Expense, parse_date};
pub use ops::{Engine, EngineBuilder, Page, PageInfo};

pub mod accounts;
pub mod auth;
mod balance;
mod error;
pub mod expenses;
pub mod filter;
mod ops;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
