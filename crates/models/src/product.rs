use rust_decimal::Decimal;
use sea_orm::{
    entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Stored when a product is created or updated without a description.
pub const DEFAULT_DESCRIPTION: &str = "Description not available.";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name must not be blank".into()));
    }
    Ok(())
}

/// `None` becomes [`DEFAULT_DESCRIPTION`]; a present value is kept verbatim.
pub fn description_or_default(description: Option<&str>) -> String {
    description.unwrap_or(DEFAULT_DESCRIPTION).to_string()
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    description: &str,
    price: Decimal,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        price: Set(price),
    };
    Ok(am.insert(db).await?)
}

/// Overwrite every mutable column of the row identified by `model.id`.
pub async fn update<C: ConnectionTrait>(db: &C, model: Model) -> Result<Model, ModelError> {
    validate_name(&model.name)?;
    let am = ActiveModel {
        id: Unchanged(model.id),
        name: Set(model.name),
        description: Set(model.description),
        price: Set(model.price),
    };
    Ok(am.update(db).await?)
}

/// True when some row other than `exclude` holds the `(name, description)` pair.
pub async fn exists_by_name_and_description<C: ConnectionTrait>(
    db: &C,
    name: &str,
    description: &str,
    exclude: Option<Uuid>,
) -> Result<bool, ModelError> {
    let mut query = Entity::find()
        .filter(Column::Name.eq(name))
        .filter(Column::Description.eq(description));
    if let Some(id) = exclude {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}
