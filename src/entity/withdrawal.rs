use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum WithdrawalStatus {
  #[sea_orm(string_value = "pending")]
  #[default]
  Pending,
  /// Ledger rows are consumed at this step, before payment posts.
  #[sea_orm(string_value = "processing")]
  Processing,
  /// Legacy single-step admin flow; no ledger consumption.
  #[sea_orm(string_value = "approved")]
  Approved,
  #[sea_orm(string_value = "paid")]
  Paid,
  #[sea_orm(string_value = "rejected")]
  Rejected,
}

/// Mobile-money carriers settlements are paid out through.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Network {
  #[sea_orm(string_value = "mtn")]
  #[default]
  Mtn,
  #[sea_orm(string_value = "telecel")]
  Telecel,
  #[sea_orm(string_value = "airteltigo")]
  AirtelTigo,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawals")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub agent_id: i64,
  pub requested_amount: i64,
  /// Amount actually paid out; equals requested_amount until a fee
  /// adjustment is applied.
  pub amount: i64,
  pub fee_amount: i64,
  pub status: WithdrawalStatus,
  pub network: Network,
  pub mobile_money_account_name: String,
  pub mobile_money_number: String,
  pub notes: Option<String>,
  pub processed_at: Option<DateTime>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::AgentId",
    to = "user::Column::Id"
  )]
  Agent,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Agent.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
