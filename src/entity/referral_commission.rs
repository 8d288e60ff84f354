use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{commission::CommissionStatus, user};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ReferralType {
  /// Percentage override on a referred dealer's sale commission.
  #[sea_orm(string_value = "order_commission")]
  #[default]
  OrderCommission,
  /// Flat bonus paid when a referred user upgrades to dealer.
  #[sea_orm(string_value = "agent_upgrade")]
  AgentUpgrade,
  #[sea_orm(string_value = "referral_bonus")]
  ReferralBonus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_commissions")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub referrer_id: i64,
  /// Lookup-only link to the parent commission. Deliberately not a
  /// relation: withdrawn rows must survive deletion of the parent.
  pub commission_id: Option<i32>,
  pub amount: i64,
  pub referral_type: ReferralType,
  pub status: CommissionStatus,
  pub available_at: Option<DateTime>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::ReferrerId",
    to = "user::Column::Id"
  )]
  Referrer,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Referrer.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
