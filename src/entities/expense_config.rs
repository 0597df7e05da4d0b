//! Expense config entity - A user's allocation policy at a point in time.
//!
//! Reconfiguring appends a new row instead of updating in place; the
//! most recently created row is the user's current policy. Percentages
//! conventionally sum to 100 but storage does not enforce it - only the
//! API boundary does, before a row is ever written.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allocation policy database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_configs")]
pub struct Model {
    /// Unique identifier for the configuration row
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning user
    pub user_id: i32,
    /// Percentage of net income allocated to needs
    pub needs_percentage: i32,
    /// Percentage of net income allocated to wants
    pub wants_percentage: i32,
    /// Percentage of net income allocated to savings
    pub savings_percentage: i32,
    /// When this configuration was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `ExpenseConfig` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each configuration row belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
