use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, FieldError, ResultEngine, auth, users};

use super::{Engine, with_tx};

/// Loose email shape check: one `@` with a dotted domain. Real validation
/// happens when the confirmation mail is (not) delivered.
fn email_is_plausible(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Registration password policy: at least 8 chars with an uppercase letter,
/// a lowercase letter and a digit.
fn password_is_compliant(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

impl Engine {
    /// Register a new user with an unconfirmed address.
    pub async fn register_user(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> ResultEngine<users::Model> {
        let email = email.trim().to_lowercase();
        let name = name.trim().to_string();

        let mut errors = Vec::new();
        if !email_is_plausible(&email) {
            errors.push(FieldError::new("email", "not a valid email address"));
        }
        if name.is_empty() {
            errors.push(FieldError::new("name", "name must not be empty"));
        }
        if !password_is_compliant(password) {
            errors.push(FieldError::new("password", "password not compliant"));
        }
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        let hash = auth::hash_password(password)?;

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Validation(vec![FieldError::new(
                    "email",
                    "user already exists",
                )]));
            }

            let model = users::ActiveModel {
                user_id: ActiveValue::NotSet,
                email: ActiveValue::Set(email.clone()),
                name: ActiveValue::Set(name.clone()),
                password: ActiveValue::Set(hash.clone()),
                confirmed: ActiveValue::Set(false),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Ok(model)
        })
    }

    /// Authentication lookup for the server middleware.
    ///
    /// Returns `None` for unknown addresses, unconfirmed users and wrong
    /// passwords alike; the caller only learns "not authenticated".
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> ResultEngine<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.database)
            .await?;

        Ok(user.filter(|u| u.confirmed && auth::verify_password(password, &u.password)))
    }

    /// Mark a registered address as confirmed.
    pub async fn confirm_user(&self, email: &str) -> ResultEngine<()> {
        let email = email.trim().to_lowercase();
        with_tx!(self, |db_tx| {
            let user = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("user {email}")))?;

            let mut user: users::ActiveModel = user.into();
            user.confirmed = ActiveValue::Set(true);
            user.update(&db_tx).await?;
            Ok(())
        })
    }
}
