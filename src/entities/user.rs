//! User entity - Represents a registered account.
//!
//! Every other table is exclusively owned by one user; account deletion
//! cascades across all of them before removing this row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i32,
    /// First name
    pub name: String,
    /// Last name
    pub last_name: String,
    /// Login email, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// PBKDF2 password hash (format: `pbkdf2:iterations:hex_salt:hex_hash`)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the account is active
    pub is_active: bool,
    /// When the account was created
    pub created_at: DateTimeUtc,
    /// When the account was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many policy configuration rows
    #[sea_orm(has_many = "super::expense_config::Entity")]
    ExpenseConfigs,
    /// One user has many monthly budgets
    #[sea_orm(has_many = "super::monthly_budget::Entity")]
    MonthlyBudgets,
    /// One user has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One user has many cached monthly summaries
    #[sea_orm(has_many = "super::monthly_data::Entity")]
    MonthlyData,
}

impl Related<super::expense_config::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseConfigs.def()
    }
}

impl Related<super::monthly_budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyBudgets.def()
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
