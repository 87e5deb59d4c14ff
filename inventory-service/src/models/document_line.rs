//! Incoming-goods document line model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::trim::trimmed;

/// Line of an incoming-goods document.
///
/// Lines reference their header by document number only; name, unit and VAT
/// code are copied from the product when the line is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DocumentLine {
    pub id: i32,
    pub document_number: String,
    pub product_id: i32,
    pub name: String,
    pub unit: String,
    pub vat_code: String,
    pub quantity: Decimal,
    pub unit_price_net: Decimal,
    pub unit_price_gross: Decimal,
    pub line_net: Decimal,
    pub line_gross: Decimal,
}

/// Writable line fields, used for both create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DocumentLineInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 20))]
    pub document_number: String,
    pub product_id: i32,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 200))]
    pub name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 20))]
    pub unit: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 10))]
    pub vat_code: String,
    pub quantity: Decimal,
    pub unit_price_net: Decimal,
    pub unit_price_gross: Decimal,
    pub line_net: Decimal,
    pub line_gross: Decimal,
}

impl DocumentLineInput {
    /// Copy with every string field trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            document_number: self.document_number.trim().to_string(),
            name: self.name.trim().to_string(),
            unit: self.unit.trim().to_string(),
            vat_code: self.vat_code.trim().to_string(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_snapshot_fields_only() {
        let input = DocumentLineInput {
            document_number: " BE-0000007 ".to_string(),
            product_id: 12,
            name: " Csavar M8 ".to_string(),
            unit: "db ".to_string(),
            vat_code: " 27".to_string(),
            quantity: Decimal::new(25, 1),
            unit_price_net: Decimal::new(100, 0),
            unit_price_gross: Decimal::new(127, 0),
            line_net: Decimal::new(250, 0),
            line_gross: Decimal::new(3175, 1),
        };

        let n = input.normalized();
        assert_eq!(n.document_number, "BE-0000007");
        assert_eq!(n.name, "Csavar M8");
        assert_eq!(n.unit, "db");
        assert_eq!(n.vat_code, "27");
        assert_eq!(n.product_id, 12);
        assert_eq!(n.quantity, Decimal::new(25, 1));
        assert_eq!(n.line_gross, Decimal::new(3175, 1));
    }
}
