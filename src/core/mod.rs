//! Core business logic module.
//!
//! The policy, ledger, and history submodules are pure and deterministic;
//! they never touch the database. The expense and account submodules drive
//! them against the persistence gateway inside transactions.

/// Account registration, credential checks, and account deletion
pub mod account;
/// Expense-domain operations: setup, budgets, expenses, snapshots, reset
pub mod expense;
/// Month keys, Spanish month names, history assembly, status classification
pub mod history;
/// Category totals and remaining balances
pub mod ledger;
/// Allocation recommendations and budget derivation
pub mod policy;
