//! Incoming-goods document header model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::trim::{trimmed, trimmed_opt};

/// Currency assumed when a header carries none.
pub const DEFAULT_CURRENCY: &str = "HUF";

/// Header of an incoming-goods document.
///
/// The partner fields are a snapshot taken when the document was created,
/// not a live reference to the partner record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DocumentHeader {
    pub id: i32,
    pub document_number: String,
    pub issue_date: NaiveDate,
    pub closed: bool,
    pub partner_code: String,
    pub partner_name: String,
    pub partner_zip: String,
    pub partner_city: String,
    pub partner_address: String,
    pub note: Option<String>,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub net_total: Decimal,
    pub gross_total: Decimal,
}

/// Writable header fields, used for both create and full-row update.
///
/// Strings are trimmed on deserialization; the length limits are the
/// column widths.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DocumentHeaderInput {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 20))]
    pub document_number: String,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub closed: bool,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 20))]
    pub partner_code: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 200))]
    pub partner_name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 10))]
    pub partner_zip: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 100))]
    pub partner_city: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 200))]
    pub partner_address: String,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 1000))]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 3, message = "Currency must be max 3 characters."))]
    pub currency: String,
    #[serde(default)]
    pub exchange_rate: Decimal,
    #[serde(default)]
    pub net_total: Decimal,
    #[serde(default)]
    pub gross_total: Decimal,
}

impl DocumentHeaderInput {
    /// Trim every string, drop a blank note, and default currency and
    /// exchange rate the way the store persists them.
    pub fn normalized(&self) -> Self {
        let currency = self.currency.trim();
        Self {
            document_number: self.document_number.trim().to_string(),
            issue_date: self.issue_date,
            closed: self.closed,
            partner_code: self.partner_code.trim().to_string(),
            partner_name: self.partner_name.trim().to_string(),
            partner_zip: self.partner_zip.trim().to_string(),
            partner_city: self.partner_city.trim().to_string(),
            partner_address: self.partner_address.trim().to_string(),
            note: self
                .note
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            currency: if currency.is_empty() {
                DEFAULT_CURRENCY.to_string()
            } else {
                currency.to_string()
            },
            exchange_rate: if self.exchange_rate <= Decimal::ZERO {
                Decimal::ONE
            } else {
                self.exchange_rate
            },
            net_total: self.net_total,
            gross_total: self.gross_total,
        }
    }
}

/// Filter parameters for listing headers.
#[derive(Debug, Clone, Default)]
pub struct ListDocumentHeadersFilter {
    pub search: Option<String>,
    pub take: i64,
}

impl ListDocumentHeadersFilter {
    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
