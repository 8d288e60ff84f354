use sea_orm_migration::prelude::*;

use super::m20260118_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // commission_id is a lookup-only reference; no foreign key on purpose so
    // withdrawn referral rows survive deletion of the parent commission
    manager
      .create_table(
        Table::create()
          .table(ReferralCommissions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(ReferralCommissions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(ReferralCommissions::ReferrerId)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(ReferralCommissions::CommissionId).integer().null(),
          )
          .col(
            ColumnDef::new(ReferralCommissions::Amount)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(ReferralCommissions::ReferralType)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(ReferralCommissions::Status)
              .string()
              .not_null()
              .default("pending"),
          )
          .col(
            ColumnDef::new(ReferralCommissions::AvailableAt).date_time().null(),
          )
          .col(
            ColumnDef::new(ReferralCommissions::CreatedAt)
              .date_time()
              .not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_referral_commissions_referrer")
              .from(
                ReferralCommissions::Table,
                ReferralCommissions::ReferrerId,
              )
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_referral_commissions_referrer_status")
          .table(ReferralCommissions::Table)
          .col(ReferralCommissions::ReferrerId)
          .col(ReferralCommissions::Status)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_referral_commissions_commission")
          .table(ReferralCommissions::Table)
          .col(ReferralCommissions::CommissionId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(ReferralCommissions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum ReferralCommissions {
  Table,
  Id,
  ReferrerId,
  CommissionId,
  Amount,
  ReferralType,
  Status,
  AvailableAt,
  CreatedAt,
}
