//! JSON API - the HTTP boundary of the service.
//!
//! Handlers stay thin: they authenticate, validate input, call into
//! [`crate::core`], and wrap the outcome in the tagged
//! `{success, message, data}` envelope every endpoint responds with.
//! Failures never carry partial data.

/// Account deletion handler
pub mod account;
/// Register/login handlers and the session middleware
pub mod auth;
/// Expense-domain handlers: setup, budget, expenses, data, reset
pub mod expense;
/// Router assembly, shared state, and the server entry point
pub mod routes;
/// Response envelope, request payloads, and error-to-status mapping
pub mod types;
