//! Account business logic - registration, credential checks, deletion.
//!
//! Registration and login mirror the expense operations' shape: boundary
//! validation here, password handling delegated to [`crate::auth`], and the
//! destructive path (account deletion) as one explicit, auditable cascade
//! inside a single transaction rather than an implicit database cascade.

use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth,
    entities::{expense, expense_config, monthly_budget, monthly_data, user},
    errors::{Error, Result},
};

/// Registration payload.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// First name
    pub name: String,
    /// Last name
    pub last_name: String,
    /// Login email
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Registers a new account with a hashed password and the active flag set.
///
/// Fails with `AlreadyExists` when the email is taken and `Validation` for
/// blank fields.
pub async fn register_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    let email = new_user.email.trim().to_lowercase();
    if email.is_empty() || new_user.name.trim().is_empty() || new_user.password.is_empty() {
        return Err(Error::Validation {
            message: "name, email, and password are required".to_string(),
        });
    }

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::AlreadyExists {
            what: format!("user {email}"),
        });
    }

    let now = Utc::now();
    let model = user::ActiveModel {
        name: Set(new_user.name.trim().to_string()),
        last_name: Set(new_user.last_name.trim().to_string()),
        email: Set(email.clone()),
        password_hash: Set(auth::hash_password(&new_user.password)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    info!(user_id = result.id, "registered user");
    Ok(result)
}

/// Checks an email/password pair against the stored hash.
///
/// Unknown email, wrong password, and deactivated account all fail with the
/// same `Unauthenticated` error so the response does not reveal which field
/// was wrong.
pub async fn verify_credentials(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let account = user::Entity::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?
        .ok_or(Error::Unauthenticated)?;

    if !account.is_active || !auth::verify_password(password, &account.password_hash) {
        return Err(Error::Unauthenticated);
    }

    Ok(account)
}

/// Looks up a user by id.
pub async fn get_user(db: &DatabaseConnection, user_id: i32) -> Result<Option<user::Model>> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Permanently deletes the account and everything it owns.
///
/// The cascade order respects foreign keys - expenses and cached summaries,
/// then budgets, then configuration rows, then the user row itself - and the
/// whole sequence commits or rolls back as one transaction.
pub async fn delete_account(db: &DatabaseConnection, user_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let account = user::Entity::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            what: format!("user {user_id}"),
        })?;

    expense::Entity::delete_many()
        .filter(expense::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    monthly_data::Entity::delete_many()
        .filter(monthly_data::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    monthly_budget::Entity::delete_many()
        .filter(monthly_budget::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    expense_config::Entity::delete_many()
        .filter(expense_config::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    account.delete(&txn).await?;

    txn.commit().await?;
    info!(user_id, "deleted account and all owned data");
    Ok(())
}
