use sea_orm_migration::prelude::*;

use super::m20260118_000005_create_commissions::Commissions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // One commission per order. NULL order ids (referral-less paths) are
    // exempt since SQLite treats NULLs as distinct in unique indexes.
    manager
      .create_index(
        Index::create()
          .name("idx_commissions_order_unique")
          .table(Commissions::Table)
          .col(Commissions::OrderId)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_index(
        Index::drop()
          .name("idx_commissions_order_unique")
          .table(Commissions::Table)
          .to_owned(),
      )
      .await
  }
}
