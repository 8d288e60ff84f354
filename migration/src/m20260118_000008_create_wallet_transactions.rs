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
          .table(WalletTransactions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(WalletTransactions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(WalletTransactions::UserId)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(WalletTransactions::Amount)
              .big_integer()
              .not_null(),
          )
          .col(ColumnDef::new(WalletTransactions::TxType).string().not_null())
          .col(ColumnDef::new(WalletTransactions::Description).string().null())
          .col(ColumnDef::new(WalletTransactions::OrderId).integer().null())
          .col(
            ColumnDef::new(WalletTransactions::CreatedAt)
              .date_time()
              .not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_wallet_transactions_user")
              .from(WalletTransactions::Table, WalletTransactions::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_wallet_transactions_user")
          .table(WalletTransactions::Table)
          .col(WalletTransactions::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(WalletTransactions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum WalletTransactions {
  Table,
  Id,
  UserId,
  Amount,
  TxType,
  Description,
  OrderId,
  CreatedAt,
}
