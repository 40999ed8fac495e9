//! Optional hypermedia links added to outbound product records.
//!
//! Links live only in the response view; the stored entity never carries them.

use configs::HypermediaConfig;
use serde::{Deserialize, Serialize};
use service::product::domain::StoredProduct;
use uuid::Uuid;

pub const REL_SELF: &str = "self";
pub const REL_ALL_PRODUCTS: &str = "All Products";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

/// A product as rendered on the wire: the record's fields plus any links.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: StoredProduct,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone)]
pub struct LinkDecorator {
    enabled: bool,
    base_url: String,
}

impl LinkDecorator {
    pub fn new(enabled: bool, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { enabled, base_url }
    }

    pub fn from_config(cfg: &HypermediaConfig) -> Self { Self::new(cfg.enabled, cfg.base_url.clone()) }

    pub fn disabled() -> Self { Self::new(false, "") }

    pub fn collection_href(&self) -> String { format!("{}/products", self.base_url) }

    pub fn product_href(&self, id: Uuid) -> String { format!("{}/products/{}", self.base_url, id) }

    pub fn plain(&self, product: StoredProduct) -> ProductView {
        ProductView { product, links: Vec::new() }
    }

    /// List entries point at their own by-id endpoint.
    pub fn with_self_link(&self, product: StoredProduct) -> ProductView {
        let href = self.product_href(product.id);
        self.decorate(product, REL_SELF, href)
    }

    /// A single record points back at the collection.
    pub fn with_collection_link(&self, product: StoredProduct) -> ProductView {
        let href = self.collection_href();
        self.decorate(product, REL_ALL_PRODUCTS, href)
    }

    fn decorate(&self, product: StoredProduct, rel: &str, href: String) -> ProductView {
        if !self.enabled {
            return self.plain(product);
        }
        ProductView { product, links: vec![Link { rel: rel.to_string(), href }] }
    }
}

impl Default for LinkDecorator {
    fn default() -> Self { Self::from_config(&HypermediaConfig::default()) }
}
