//! Services module for inventory-service.

mod audit_log;
pub mod database;
pub mod documents;
mod lines;
pub mod metrics;
mod prices;
mod users;

pub use database::Database;
pub use documents::{format_document_number, DOCUMENT_NUMBER_PREFIX};
pub use metrics::{get_metrics, init_metrics};
