use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Products: composite unique (name, description)
        manager
            .create_index(
                Index::create()
                    .name("idx_products_name_description")
                    .table(Products::Table)
                    .col(Products::Name)
                    .col(Products::Description)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_name_description")
                    .table(Products::Table)
                    .to_owned(),
            )
            .await
    }
}
