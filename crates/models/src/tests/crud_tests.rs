use anyhow::Result;
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::errors::ModelError;
use crate::product;

use super::setup_test_db;

#[tokio::test]
async fn test_product_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let name = format!("crud_product_{}", Uuid::new_v4());
    let created = product::create(&db, &name, "A widget", Decimal::new(999, 2)).await?;
    assert_eq!(created.name, name);
    assert_eq!(created.price, Decimal::new(999, 2));

    let found = product::Entity::find_by_id(created.id).one(&db).await?.expect("inserted row");
    assert_eq!(found, created);

    let mut changed = found.clone();
    changed.price = Decimal::new(2000, 2);
    changed.description = "Still a widget".into();
    let updated = product::update(&db, changed).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.description, "Still a widget");

    product::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(product::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_unique_name_description() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let name = format!("uniq_product_{}", Uuid::new_v4());
    let first = product::create(&db, &name, "D1", Decimal::new(10, 0)).await?;
    assert!(product::exists_by_name_and_description(&db, &name, "D1", None).await?);
    assert!(!product::exists_by_name_and_description(&db, &name, "D1", Some(first.id)).await?);

    // same pair should violate the unique index
    let dup = product::create(&db, &name, "D1", Decimal::new(20, 0)).await;
    assert!(matches!(dup, Err(ModelError::Duplicate(_))));

    let other = product::create(&db, &name, "D2", Decimal::new(20, 0)).await?;
    product::Entity::delete_by_id(first.id).exec(&db).await?;
    product::Entity::delete_by_id(other.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let ghost = product::Model {
        id: Uuid::new_v4(),
        name: "ghost".into(),
        description: "never stored".into(),
        price: Decimal::ONE,
    };
    let res = product::update(&db, ghost).await;
    assert!(matches!(res, Err(ModelError::NotFound)));
    Ok(())
}
