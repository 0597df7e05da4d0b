//! Monthly budget entity - One budget per `(user, month)` pair.
//!
//! Amounts are whole currency units derived from the income and the policy
//! that was current at creation time; they are immutable once written (a new
//! budget requires a new month or an explicit reset). The `month` field is
//! the canonical zero-padded `"YYYY-MM"` key used for lookups and ordering.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly budget database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning user
    pub user_id: i32,
    /// Canonical month key (`"YYYY-MM"`, zero-padded month)
    pub month: String,
    /// Calendar year, denormalized from the month key
    pub year: i32,
    /// Net income the budget was derived from
    pub income: i64,
    /// Amount allocated to needs
    pub needs_budget: i64,
    /// Amount allocated to wants
    pub wants_budget: i64,
    /// Amount allocated to savings
    pub savings_budget: i64,
    /// Savings principal carried over from prior periods
    pub accumulated_savings: i64,
    /// When the budget was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `MonthlyBudget` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One budget has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One budget has one cached monthly summary
    #[sea_orm(has_many = "super::monthly_data::Entity")]
    MonthlyData,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::monthly_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
