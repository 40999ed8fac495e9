use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::product::domain::{NewProduct, StoredProduct};
use crate::product::repository::ProductRepository;
use models::product;

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn insert(&self, p: NewProduct) -> Result<StoredProduct, ServiceError> {
        Ok(product::create(&self.db, &p.name, &p.description, p.price).await?)
    }

    async fn update(&self, p: StoredProduct) -> Result<StoredProduct, ServiceError> {
        Ok(product::update(&self.db, p).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredProduct>, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_all(&self) -> Result<Vec<StoredProduct>, ServiceError> {
        product::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete(&self, p: &StoredProduct) -> Result<(), ServiceError> {
        product::Entity::delete_by_id(p.id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(())
    }

    async fn exists_by_name_and_description(&self, name: &str, description: &str) -> Result<bool, ServiceError> {
        Ok(product::exists_by_name_and_description(&self.db, name, description, None).await?)
    }

    async fn exists_by_name_and_description_excluding(&self, id: Uuid, name: &str, description: &str) -> Result<bool, ServiceError> {
        Ok(product::exists_by_name_and_description(&self.db, name, description, Some(id)).await?)
    }
}
