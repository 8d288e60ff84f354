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
          .table(Withdrawals::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Withdrawals::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Withdrawals::AgentId).big_integer().not_null())
          .col(
            ColumnDef::new(Withdrawals::RequestedAmount)
              .big_integer()
              .not_null(),
          )
          .col(ColumnDef::new(Withdrawals::Amount).big_integer().not_null())
          .col(
            ColumnDef::new(Withdrawals::FeeAmount)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Withdrawals::Status)
              .string()
              .not_null()
              .default("pending"),
          )
          .col(ColumnDef::new(Withdrawals::Network).string().not_null())
          .col(
            ColumnDef::new(Withdrawals::MobileMoneyAccountName)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(Withdrawals::MobileMoneyNumber).string().not_null(),
          )
          .col(ColumnDef::new(Withdrawals::Notes).string().null())
          .col(ColumnDef::new(Withdrawals::ProcessedAt).date_time().null())
          .col(ColumnDef::new(Withdrawals::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_withdrawals_agent")
              .from(Withdrawals::Table, Withdrawals::AgentId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_withdrawals_agent_status")
          .table(Withdrawals::Table)
          .col(Withdrawals::AgentId)
          .col(Withdrawals::Status)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Withdrawals::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Withdrawals {
  Table,
  Id,
  AgentId,
  RequestedAmount,
  Amount,
  FeeAmount,
  Status,
  Network,
  MobileMoneyAccountName,
  MobileMoneyNumber,
  Notes,
  ProcessedAt,
  CreatedAt,
}
