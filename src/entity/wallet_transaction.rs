use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum WalletTxType {
  #[sea_orm(string_value = "deposit")]
  #[default]
  Deposit,
  #[sea_orm(string_value = "purchase")]
  Purchase,
  #[sea_orm(string_value = "refund")]
  Refund,
  #[sea_orm(string_value = "upgrade_fee")]
  UpgradeFee,
  #[sea_orm(string_value = "withdrawal_refund")]
  WithdrawalRefund,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_transactions")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub user_id: i64,
  /// Signed amount in pesewas; debits are negative.
  pub amount: i64,
  pub tx_type: WalletTxType,
  pub description: Option<String>,
  pub order_id: Option<i32>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::UserId",
    to = "user::Column::Id"
  )]
  User,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
