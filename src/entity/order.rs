use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{commission, order_item, user};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum OrderStatus {
  #[sea_orm(string_value = "processing")]
  #[default]
  Processing,
  #[sea_orm(string_value = "completed")]
  Completed,
  #[sea_orm(string_value = "cancelled")]
  Cancelled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  #[sea_orm(unique)]
  pub reference: String,
  pub user_id: i64,
  pub dealer_id: Option<i64>,
  pub total: i64,
  pub status: OrderStatus,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::UserId",
    to = "user::Column::Id"
  )]
  Customer,
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::DealerId",
    to = "user::Column::Id"
  )]
  Dealer,
  #[sea_orm(has_many = "order_item::Entity")]
  Items,
  #[sea_orm(has_one = "commission::Entity")]
  Commission,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Customer.def()
  }
}

impl Related<order_item::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Items.def()
  }
}

impl Related<commission::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Commission.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
