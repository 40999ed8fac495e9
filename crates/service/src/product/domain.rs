use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A persisted product; the entity model doubles as the business view.
pub type StoredProduct = models::product::Model;

/// Candidate values for a product that has no id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl NewProduct {
    /// Applies the placeholder description when none was supplied.
    pub fn new(name: impl Into<String>, description: Option<&str>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: models::product::description_or_default(description),
            price,
        }
    }

    /// Copy these values over an existing record, keeping its id.
    pub fn apply_to(self, mut record: StoredProduct) -> StoredProduct {
        record.name = self.name;
        record.description = self.description;
        record.price = self.price;
        record
    }
}
