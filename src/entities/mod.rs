//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod expense;
pub mod expense_config;
pub mod monthly_budget;
pub mod monthly_data;
pub mod user;

// Re-export specific types to avoid conflicts
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use expense_config::{
    Column as ExpenseConfigColumn, Entity as ExpenseConfig, Model as ExpenseConfigModel,
};
pub use monthly_budget::{
    Column as MonthlyBudgetColumn, Entity as MonthlyBudget, Model as MonthlyBudgetModel,
};
pub use monthly_data::{
    Column as MonthlyDataColumn, Entity as MonthlyData, Model as MonthlyDataModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
