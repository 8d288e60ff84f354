use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
  commission, order, referral_commission, shop_price, wallet_transaction,
  withdrawal,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum UserRole {
  #[sea_orm(string_value = "customer")]
  #[default]
  Customer,
  /// Legacy role name superseded by `dealer`; still present on older
  /// accounts and treated as equivalent everywhere.
  #[sea_orm(string_value = "agent")]
  Agent,
  #[sea_orm(string_value = "dealer")]
  Dealer,
  #[sea_orm(string_value = "admin")]
  Admin,
}

impl UserRole {
  pub fn is_dealer(&self) -> bool {
    matches!(self, UserRole::Agent | UserRole::Dealer)
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i64,
  pub name: String,
  #[sea_orm(unique)]
  pub phone: String,
  pub role: UserRole,
  pub balance: i64,
  pub referred_by: Option<i64>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "order::Entity")]
  Orders,
  #[sea_orm(has_many = "shop_price::Entity")]
  ShopPrices,
  #[sea_orm(has_many = "commission::Entity")]
  Commissions,
  #[sea_orm(has_many = "referral_commission::Entity")]
  ReferralCommissions,
  #[sea_orm(has_many = "withdrawal::Entity")]
  Withdrawals,
  #[sea_orm(has_many = "wallet_transaction::Entity")]
  WalletTransactions,
}

impl Related<order::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Orders.def()
  }
}

impl Related<shop_price::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ShopPrices.def()
  }
}

impl Related<commission::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Commissions.def()
  }
}

impl Related<referral_commission::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ReferralCommissions.def()
  }
}

impl Related<withdrawal::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Withdrawals.def()
  }
}

impl Related<wallet_transaction::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::WalletTransactions.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
