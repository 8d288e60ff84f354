use sea_orm_migration::prelude::*;

use super::m20260118_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(ShopPrices::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(ShopPrices::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(ShopPrices::DealerId).big_integer().not_null())
          .col(ColumnDef::new(ShopPrices::ProductId).integer().not_null())
          .col(ColumnDef::new(ShopPrices::Price).big_integer().not_null())
          .col(ColumnDef::new(ShopPrices::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_shop_prices_dealer")
              .from(ShopPrices::Table, ShopPrices::DealerId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_shop_prices_dealer_product")
          .table(ShopPrices::Table)
          .col(ShopPrices::DealerId)
          .col(ShopPrices::ProductId)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(ShopPrices::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum ShopPrices {
  Table,
  Id,
  DealerId,
  ProductId,
  Price,
  CreatedAt,
}
