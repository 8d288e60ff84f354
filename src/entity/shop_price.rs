use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_prices")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub dealer_id: i64,
  pub product_id: i32,
  /// The dealer's resale price in pesewas; one row per (dealer, product).
  pub price: i64,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::DealerId",
    to = "user::Column::Id"
  )]
  Dealer,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Dealer.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
