//! Expense entity - A single dated spending record.
//!
//! Each expense belongs to one user and to the monthly budget covering its
//! date's month. Deleting the owning budget (or a user-wide reset) cascades
//! to delete its expenses. The `category` column holds one of the closed set
//! `"needs"` / `"wants"` / `"savings"`, validated at the API boundary and
//! parsed into [`crate::core::ledger::Category`] by the core.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning user
    pub user_id: i32,
    /// Monthly budget this expense is recorded against
    pub monthly_budget_id: i32,
    /// Budget category: `"needs"`, `"wants"`, or `"savings"`
    pub category: String,
    /// Free-form label within the category (e.g. `"Supermercado"`)
    pub subcategory: String,
    /// Optional human-readable description
    pub description: Option<String>,
    /// Positive amount in whole currency units
    pub amount: i64,
    /// Calendar date of the expense
    pub date: Date,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each expense belongs to one monthly budget
    #[sea_orm(
        belongs_to = "super::monthly_budget::Entity",
        from = "Column::MonthlyBudgetId",
        to = "super::monthly_budget::Column::Id"
    )]
    MonthlyBudget,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::monthly_budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyBudget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
