use sea_orm_migration::prelude::*;

use super::{
  m20260118_000001_create_users::Users, m20260118_000002_create_orders::Orders,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Commissions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Commissions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Commissions::DealerId).big_integer().not_null())
          .col(ColumnDef::new(Commissions::OrderId).integer().null())
          .col(ColumnDef::new(Commissions::Amount).big_integer().not_null())
          .col(
            ColumnDef::new(Commissions::Status)
              .string()
              .not_null()
              .default("pending"),
          )
          .col(ColumnDef::new(Commissions::AvailableAt).date_time().null())
          .col(ColumnDef::new(Commissions::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_commissions_dealer")
              .from(Commissions::Table, Commissions::DealerId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_commissions_order")
              .from(Commissions::Table, Commissions::OrderId)
              .to(Orders::Table, Orders::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_commissions_dealer_status")
          .table(Commissions::Table)
          .col(Commissions::DealerId)
          .col(Commissions::Status)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Commissions::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Commissions {
  Table,
  Id,
  DealerId,
  OrderId,
  Amount,
  Status,
  AvailableAt,
  CreatedAt,
}
