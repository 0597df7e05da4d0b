//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases and creating test
//! entities with sensible defaults.

use chrono::Local;
use sea_orm::DatabaseConnection;

use crate::{
    core::{
        account,
        expense::{self, Income, NewExpense},
        ledger::Category,
        policy::DEFAULT_POLICY,
    },
    entities,
    errors::Result,
};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user with the password `"password"`.
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    account::register_user(
        db,
        account::NewUser {
            name: "Ana".to_string(),
            last_name: "García".to_string(),
            email: email.to_string(),
            password: "password".to_string(),
        },
    )
    .await
}

/// A new expense dated today, so it always classifies into the current
/// month.
///
/// # Defaults
/// * `subcategory`: `"Supermercado"`
/// * `description`: None
#[must_use]
pub fn new_test_expense(category: Category, amount: i64) -> NewExpense {
    NewExpense {
        category,
        subcategory: "Supermercado".to_string(),
        description: None,
        amount,
        date: Local::now().date_naive(),
    }
}

/// Sets up a complete test environment: a user with the default 50/30/20
/// policy and a current-month budget over an income of 1000 with 100
/// carried-over savings. Returns (db, user, budget).
pub async fn setup_with_budget() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::monthly_budget::Model,
)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "ana@example.com").await?;
    expense::create_expense_config(&db, user.id, DEFAULT_POLICY).await?;
    let budget =
        expense::create_monthly_budget(&db, user.id, Income { net: 1_000 }, &DEFAULT_POLICY, 100)
            .await?;
    Ok((db, user, budget))
}
