//! Monthly data entity - The materialized per-month spending summary.
//!
//! This is a cache, not a source of truth: every row must be re-derivable
//! from its monthly budget, that budget's expenses, and the accumulated
//! savings. It is recomputed and upserted after every expense mutation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly summary database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_data")]
pub struct Model {
    /// Unique identifier for the summary row
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning user
    pub user_id: i32,
    /// Budget this summary was derived from, one summary per budget
    #[sea_orm(unique)]
    pub monthly_budget_id: i32,
    /// Canonical month key (`"YYYY-MM"`)
    pub month: String,
    /// Calendar year
    pub year: i32,
    /// Localized display name, e.g. `"Enero 2024"`
    pub month_name: String,
    /// Net income copied from the budget at snapshot time
    pub income: i64,
    /// Sum of expense amounts in the needs category
    pub needs_total: i64,
    /// Sum of expense amounts in the wants category
    pub wants_total: i64,
    /// Sum of expense amounts in the savings category
    pub savings_total: i64,
    /// Needs budget minus needs total
    pub needs_remaining: i64,
    /// Wants budget minus wants total
    pub wants_remaining: i64,
    /// Savings budget minus savings total, plus accumulated savings
    pub savings_remaining: i64,
    /// Sum of the three category totals
    pub total_spent: i64,
    /// Sum of the three category remainders
    pub total_remaining: i64,
}

/// Defines relationships between `MonthlyData` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each summary belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each summary is derived from one monthly budget
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
