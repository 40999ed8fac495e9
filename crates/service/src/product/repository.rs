use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewProduct, StoredProduct};
use crate::errors::ServiceError;

/// Repository abstraction for product persistence.
///
/// Implementations should reject a second row with the same `(name, description)`
/// with [`ServiceError::DuplicateProduct`], the way the unique index does in Postgres.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<StoredProduct, ServiceError>;
    async fn update(&self, product: StoredProduct) -> Result<StoredProduct, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredProduct>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<StoredProduct>, ServiceError>;
    async fn delete(&self, product: &StoredProduct) -> Result<(), ServiceError>;
    async fn exists_by_name_and_description(&self, name: &str, description: &str) -> Result<bool, ServiceError>;
    async fn exists_by_name_and_description_excluding(&self, id: Uuid, name: &str, description: &str) -> Result<bool, ServiceError>;
}

/// In-memory repository, used by tests and by `storage.backend = "memory"`.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryProductRepository {
        products: RwLock<HashMap<Uuid, StoredProduct>>, // key: product id
    }

    fn holds_pair(p: &StoredProduct, name: &str, description: &str) -> bool {
        p.name == name && p.description == description
    }

    #[async_trait]
    impl ProductRepository for InMemoryProductRepository {
        async fn insert(&self, product: NewProduct) -> Result<StoredProduct, ServiceError> {
            let mut products = self.products.write().await;
            if products.values().any(|p| holds_pair(p, &product.name, &product.description)) {
                return Err(ServiceError::DuplicateProduct);
            }
            let stored = StoredProduct {
                id: Uuid::new_v4(),
                name: product.name,
                description: product.description,
                price: product.price,
            };
            products.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn update(&self, product: StoredProduct) -> Result<StoredProduct, ServiceError> {
            let mut products = self.products.write().await;
            if !products.contains_key(&product.id) {
                return Err(ServiceError::not_found("product"));
            }
            if products
                .values()
                .any(|p| p.id != product.id && holds_pair(p, &product.name, &product.description))
            {
                return Err(ServiceError::DuplicateProduct);
            }
            products.insert(product.id, product.clone());
            Ok(product)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredProduct>, ServiceError> {
            Ok(self.products.read().await.get(&id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<StoredProduct>, ServiceError> {
            Ok(self.products.read().await.values().cloned().collect())
        }

        async fn delete(&self, product: &StoredProduct) -> Result<(), ServiceError> {
            self.products.write().await.remove(&product.id);
            Ok(())
        }

        async fn exists_by_name_and_description(&self, name: &str, description: &str) -> Result<bool, ServiceError> {
            Ok(self.products.read().await.values().any(|p| holds_pair(p, name, description)))
        }

        async fn exists_by_name_and_description_excluding(&self, id: Uuid, name: &str, description: &str) -> Result<bool, ServiceError> {
            Ok(self
                .products
                .read()
                .await
                .values()
                .any(|p| p.id != id && holds_pair(p, name, description)))
        }
    }

}
