//! Database connection and table creation using `SeaORM`.
//!
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::{
    entities::{Expense, ExpenseConfig, MonthlyBudget, MonthlyData, User},
    errors::Result,
};

/// Connects to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions. Idempotent, so startup
/// can run it unconditionally against a fresh or existing database.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut expense_config_table = schema.create_table_from_entity(ExpenseConfig);
    let mut monthly_budget_table = schema.create_table_from_entity(MonthlyBudget);
    let mut expense_table = schema.create_table_from_entity(Expense);
    let mut monthly_data_table = schema.create_table_from_entity(MonthlyData);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(expense_config_table.if_not_exists()))
        .await?;
    db.execute(builder.build(monthly_budget_table.if_not_exists()))
        .await?;
    db.execute(builder.build(expense_table.if_not_exists())).await?;
    db.execute(builder.build(monthly_data_table.if_not_exists()))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Every table must be queryable afterwards
        let _ = User::find().limit(1).all(&db).await?;
        let _ = ExpenseConfig::find().limit(1).all(&db).await?;
        let _ = MonthlyBudget::find().limit(1).all(&db).await?;
        let _ = Expense::find().limit(1).all(&db).await?;
        let _ = MonthlyData::find().limit(1).all(&db).await?;

        Ok(())
    }
}
