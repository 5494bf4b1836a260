use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, FieldError};

use serde::Serialize;
pub use server::{router, run, run_with_listener, spawn_with_listener};

mod accounts;
mod balance;
mod email;
mod expenses;
mod server;
mod user;

pub mod types {
    pub mod account {
        pub use api_types::account::AccountNew;
        pub use engine::Account;
    }

    pub mod expense {
        pub use api_types::expense::ExpenseNew;
        pub use engine::Expense;
    }

    pub mod balance {
        pub use api_types::balance::BalanceQuery;
        pub use engine::Balance;
    }

    pub mod user {
        pub use api_types::user::{UserNew, UserView};
    }

    pub mod pagination {
        pub use api_types::pagination::{Paginated, PaginationMetadata};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

/// Wire shape of every error response: `{error: {message, type, ...}}`.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::MalformedFilter(_) | EngineError::DateFilter(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn detail_for_engine_error(err: EngineError) -> ErrorDetail {
    let kind = err.kind().to_string();
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorDetail {
                // Deliberately generic: storage details never leak to clients.
                message: "Error occurred during database activity".to_string(),
                kind,
                errors: None,
            }
        }
        EngineError::Validation(field_errors) => ErrorDetail {
            message: "Invalid data".to_string(),
            kind,
            errors: Some(field_errors),
        },
        other => ErrorDetail {
            message: other.to_string(),
            kind,
            errors: None,
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), detail_for_engine_error(err)),
            ServerError::Generic(message) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    message,
                    kind: "InvalidRequest".to_string(),
                    errors: None,
                },
            ),
        };

        (status, Json(ErrorBody { error: detail })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
