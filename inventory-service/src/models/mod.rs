//! Domain models for inventory-service.

mod audit_log;
mod document_header;
mod document_line;
mod product_price;
mod trim;
mod user;

pub use audit_log::{AuditLogEntry, ListAuditLogsFilter, NewAuditLogEntry};
pub use document_header::{
    DocumentHeader, DocumentHeaderInput, ListDocumentHeadersFilter, DEFAULT_CURRENCY,
};
pub use document_line::{DocumentLine, DocumentLineInput};
pub use product_price::{normalize_currency, CreateProductPrice, ProductPrice, UpdateProductPrice};
pub use user::{CreateUser, LoginRequest, Role, UpdateUser, User};
