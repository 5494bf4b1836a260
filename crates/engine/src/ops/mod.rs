use sea_orm::DatabaseConnection;

use crate::FieldError;

mod accounts;
mod balances;
mod expenses;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Page request for list operations. Defaults match the original API: first
/// page, twenty rows.
#[derive(Clone, Copy, Debug)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Page {
    /// Clamp nonsense values so the paginator never divides by zero and
    /// page numbering stays 1-based.
    pub(crate) fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.max(1),
        }
    }
}

/// Resolved pagination state returned alongside list results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub pages: u64,
    pub total: u64,
}

/// Validate a required text field, collecting a message on failure.
///
/// Returns the trimmed value either way so callers can keep building the
/// rest of the error list before giving up.
fn checked_text(field: &'static str, value: &str, max: usize, errors: &mut Vec<FieldError>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, format!("{field} must not be empty")));
    } else if trimmed.len() > max {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
    trimmed.to_string()
}

/// Validate an optional text field against a length cap.
fn checked_optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let trimmed = value.map(str::trim).filter(|s| !s.is_empty());
    if let Some(text) = trimmed
        && text.len() > max
    {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
    trimmed.map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> crate::ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
