use serde::Deserialize;

use crate::{
  config::CommissionConfig,
  entity::{OrderStatus, order, order_item, shop_price},
  prelude::*,
  sv::{Commission, Referral, Wallet},
};

#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
  pub product_id: i32,
  /// Base price snapshot, pesewas.
  pub unit_price: i64,
  /// Data volume for bundle products, not a unit count.
  pub quantity: i32,
  pub beneficiary_number: String,
}

pub struct Order<'a, C> {
  db: &'a C,
  config: &'a CommissionConfig,
}

impl<'a, C: ConnectionTrait + TransactionTrait> Order<'a, C> {
  pub fn new(db: &'a C, config: &'a CommissionConfig) -> Self {
    Self { db, config }
  }

  /// Places an order in a single transaction covering the wallet debit,
  /// the order with its lines, and the dealer commission. Lines are
  /// charged at the dealer's resale price when one is configured, the
  /// base price otherwise, flat per line. The referral override runs
  /// after commit and never fails a checkout.
  pub async fn checkout(
    &self,
    user_id: i64,
    dealer_id: Option<i64>,
    items: Vec<CheckoutItem>,
  ) -> Result<order::Model> {
    if items.is_empty() {
      return Err(Error::InvalidArgs("Order has no items".into()));
    }
    for item in &items {
      if item.unit_price <= 0 {
        return Err(Error::InvalidArgs("Item price must be positive".into()));
      }
      if item.quantity <= 0 {
        return Err(Error::InvalidArgs(
          "Item quantity must be positive".into(),
        ));
      }
    }

    let txn = self.db.begin().await?;

    let mut total = 0;
    for item in &items {
      let resale = match dealer_id {
        Some(dealer_id) => {
          shop_price::Entity::find()
            .filter(shop_price::Column::DealerId.eq(dealer_id))
            .filter(shop_price::Column::ProductId.eq(item.product_id))
            .one(&txn)
            .await?
        }
        None => None,
      };
      total += resale.map_or(item.unit_price, |price| price.price);
    }

    let now = Utc::now().naive_utc();
    let order = order::ActiveModel {
      id: NotSet,
      reference: Set(uuid::Uuid::new_v4().to_string()),
      user_id: Set(user_id),
      dealer_id: Set(dealer_id),
      total: Set(total),
      status: Set(OrderStatus::Processing),
      created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    for item in items {
      order_item::ActiveModel {
        id: NotSet,
        order_id: Set(order.id),
        product_id: Set(item.product_id),
        unit_price: Set(item.unit_price),
        quantity: Set(item.quantity),
        beneficiary_number: Set(item.beneficiary_number),
      }
      .insert(&txn)
      .await?;
    }

    Wallet::new(&txn)
      .spend(
        user_id,
        total,
        Some(format!("Order {}", order.reference)),
        Some(order.id),
      )
      .await?;

    let commission =
      Commission::new(&txn, self.config).create_for_order(order.id).await?;

    txn.commit().await?;

    if let Some(commission) = commission {
      if let Err(err) = Referral::new(self.db, self.config)
        .create_referral_commission(&commission)
        .await
      {
        warn!("referral override for order {} failed: {}", order.id, err);
      }
    }

    Ok(order)
  }

  /// Fulfillment callback: flips a processing order to completed and
  /// releases its held commissions.
  pub async fn complete(&self, order_id: i32) -> Result<order::Model> {
    let txn = self.db.begin().await?;

    let order = order::Entity::find_by_id(order_id)
      .one(&txn)
      .await?
      .ok_or(Error::OrderNotFound)?;

    if order.status != OrderStatus::Processing {
      return Err(Error::InvalidArgs("Order is not processing".into()));
    }

    let order =
      order::ActiveModel { status: Set(OrderStatus::Completed), ..order.into() }
        .update(&txn)
        .await?;

    Commission::new(&txn, self.config).make_available(order_id).await?;

    txn.commit().await?;
    Ok(order)
  }

  /// Reversal: refunds the wallet, cancels the order and deletes its
  /// not-yet-withdrawn commission rows.
  pub async fn cancel(&self, order_id: i32) -> Result<order::Model> {
    let txn = self.db.begin().await?;

    let order = order::Entity::find_by_id(order_id)
      .one(&txn)
      .await?
      .ok_or(Error::OrderNotFound)?;

    if order.status == OrderStatus::Cancelled {
      return Err(Error::InvalidArgs("Order is already cancelled".into()));
    }

    let user_id = order.user_id;
    let total = order.total;
    let reference = order.reference.clone();

    let order =
      order::ActiveModel { status: Set(OrderStatus::Cancelled), ..order.into() }
        .update(&txn)
        .await?;

    Wallet::new(&txn)
      .refund(
        user_id,
        total,
        Some(format!("Refund for order {}", reference)),
        Some(order_id),
      )
      .await?;

    Commission::new(&txn, self.config).reverse(order_id).await?;

    txn.commit().await?;
    Ok(order)
  }

  pub async fn by_id(&self, order_id: i32) -> Result<order::Model> {
    order::Entity::find_by_id(order_id)
      .one(self.db)
      .await?
      .ok_or(Error::OrderNotFound)
  }

  pub async fn items(&self, order_id: i32) -> Result<Vec<order_item::Model>> {
    Ok(
      order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(self.db)
        .await?,
    )
  }

  pub async fn for_user(&self, user_id: i64) -> Result<Vec<order::Model>> {
    Ok(
      order::Entity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }

  pub async fn for_dealer(&self, dealer_id: i64) -> Result<Vec<order::Model>> {
    Ok(
      order::Entity::find()
        .filter(order::Column::DealerId.eq(dealer_id))
        .order_by_desc(order::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }
}
