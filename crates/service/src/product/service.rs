use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{NewProduct, StoredProduct};
use super::repository::ProductRepository;
use crate::errors::ServiceError;

/// Product business service independent of web framework.
///
/// Holds the one catalog rule: no two products share a `(name, description)` pair.
pub struct ProductService<R: ProductRepository + ?Sized = dyn ProductRepository> {
    repo: Arc<R>,
}

impl<R: ProductRepository + ?Sized> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a product unless its `(name, description)` pair is already taken.
    ///
    /// # Examples
    /// ```
    /// use service::product::{ProductService, domain::NewProduct, repository::memory::InMemoryProductRepository};
    /// use service::errors::ServiceError;
    /// use rust_decimal::Decimal;
    /// use std::sync::Arc;
    /// let svc = ProductService::new(Arc::new(InMemoryProductRepository::default()));
    /// let created = tokio_test::block_on(svc.create_product(NewProduct::new("Widget", Some("A widget"), Decimal::new(999, 2)))).unwrap();
    /// assert_eq!(created.name, "Widget");
    /// let again = tokio_test::block_on(svc.create_product(NewProduct::new("Widget", Some("A widget"), Decimal::ONE)));
    /// assert!(matches!(again, Err(ServiceError::DuplicateProduct)));
    /// ```
    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn create_product(&self, candidate: NewProduct) -> Result<StoredProduct, ServiceError> {
        models::product::validate_name(&candidate.name)?;
        if self.repo.exists_by_name_and_description(&candidate.name, &candidate.description).await? {
            debug!(description = %candidate.description, "product pair already stored");
            return Err(ServiceError::DuplicateProduct);
        }
        let created = self.repo.insert(candidate).await?;
        info!(id = %created.id, "product_created");
        Ok(created)
    }

    pub async fn get_all_products(&self) -> Result<Vec<StoredProduct>, ServiceError> {
        self.repo.find_all().await
    }

    /// `Ok(None)` when no product has this id.
    pub async fn get_product_by_id(&self, id: Uuid) -> Result<Option<StoredProduct>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Overwrite a fetched record with `changes` and save it under the same id.
    ///
    /// The duplicate check skips the record itself, so re-submitting the values a
    /// product already holds succeeds; colliding with another product does not.
    #[instrument(skip(self, record, changes), fields(id = %record.id))]
    pub async fn update_product(&self, record: StoredProduct, changes: NewProduct) -> Result<StoredProduct, ServiceError> {
        models::product::validate_name(&changes.name)?;
        if self
            .repo
            .exists_by_name_and_description_excluding(record.id, &changes.name, &changes.description)
            .await?
        {
            warn!(name = %changes.name, description = %changes.description, "update collides with another product");
            return Err(ServiceError::DuplicateProduct);
        }
        let updated = self.repo.update(changes.apply_to(record)).await?;
        info!(id = %updated.id, "product_updated");
        Ok(updated)
    }

    /// Remove a record the caller already fetched.
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn delete_product(&self, record: &StoredProduct) -> Result<(), ServiceError> {
        self.repo.delete(record).await?;
        info!(id = %record.id, "product_deleted");
        Ok(())
    }
}
