//! inventory-service: incoming-goods documents, product price history,
//! users and the audit log over PostgreSQL.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use startup::{AppState, Application};
