use sea_orm::SqlErr;

use crate::{
  config::CommissionConfig,
  entity::{
    CommissionStatus, commission, order, order_item, referral_commission,
    shop_price,
  },
  prelude::*,
};

pub struct Commission<'a, C> {
  db: &'a C,
  config: &'a CommissionConfig,
}

impl<'a, C: ConnectionTrait + TransactionTrait> Commission<'a, C> {
  pub fn new(db: &'a C, config: &'a CommissionConfig) -> Self {
    Self { db, config }
  }

  /// Computes and persists the commission for an order attributed to a
  /// dealer. Each line contributes `max(0, resale - base)` exactly once;
  /// quantity is data volume for bundle products, never a multiplier.
  /// Returns the existing entry on re-invocation and `None` when the
  /// order has no dealer or no positive margin.
  pub async fn create_for_order(
    &self,
    order_id: i32,
  ) -> Result<Option<commission::Model>> {
    let order = order::Entity::find_by_id(order_id)
      .one(self.db)
      .await?
      .ok_or(Error::OrderNotFound)?;

    let Some(dealer_id) = order.dealer_id else {
      return Ok(None);
    };

    if let Some(existing) = commission::Entity::find()
      .filter(commission::Column::OrderId.eq(order_id))
      .one(self.db)
      .await?
    {
      return Ok(Some(existing));
    }

    let items = order_item::Entity::find()
      .filter(order_item::Column::OrderId.eq(order_id))
      .all(self.db)
      .await?;

    let mut total = 0;
    for item in &items {
      let resale = shop_price::Entity::find()
        .filter(shop_price::Column::DealerId.eq(dealer_id))
        .filter(shop_price::Column::ProductId.eq(item.product_id))
        .one(self.db)
        .await?;

      match resale {
        Some(price) => total += (price.price - item.unit_price).max(0),
        None => {
          warn!(
            "dealer {} has no shop price for product {}, order {} line earns nothing",
            dealer_id, item.product_id, order_id
          );
        }
      }
    }

    if total <= 0 {
      return Ok(None);
    }

    let now = Utc::now().naive_utc();
    let inserted = commission::ActiveModel {
      id: NotSet,
      dealer_id: Set(dealer_id),
      order_id: Set(Some(order_id)),
      amount: Set(total),
      status: Set(CommissionStatus::Available),
      available_at: Set(Some(now)),
      created_at: Set(now),
    }
    .insert(self.db)
    .await;

    match inserted {
      Ok(entry) => Ok(Some(entry)),
      // A concurrent call won the insert; the unique index on order_id
      // keeps the ledger at one entry per order.
      Err(err)
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
      {
        Ok(
          commission::Entity::find()
            .filter(commission::Column::OrderId.eq(order_id))
            .one(self.db)
            .await?,
        )
      }
      Err(err) => Err(err.into()),
    }
  }

  /// Releases an order's held commissions. Pending entries flip to
  /// available, stamped with the end of the refund window; pending
  /// referral rows linked to any of the order's entries follow with the
  /// same stamp.
  pub async fn make_available(&self, order_id: i32) -> Result<()> {
    let txn = self.db.begin().await?;

    let entries = commission::Entity::find()
      .filter(commission::Column::OrderId.eq(order_id))
      .all(&txn)
      .await?;

    let available_at =
      Utc::now().naive_utc() + TimeDelta::days(self.config.refund_window_days);
    let ids: Vec<i32> = entries.iter().map(|entry| entry.id).collect();

    for entry in entries {
      if entry.status == CommissionStatus::Pending {
        commission::ActiveModel {
          status: Set(CommissionStatus::Available),
          available_at: Set(Some(available_at)),
          ..entry.into()
        }
        .update(&txn)
        .await?;
      }
    }

    let held = referral_commission::Entity::find()
      .filter(referral_commission::Column::CommissionId.is_in(ids))
      .filter(referral_commission::Column::Status.eq(CommissionStatus::Pending))
      .all(&txn)
      .await?;

    for row in held {
      referral_commission::ActiveModel {
        status: Set(CommissionStatus::Available),
        available_at: Set(Some(available_at)),
        ..row.into()
      }
      .update(&txn)
      .await?;
    }

    txn.commit().await?;
    Ok(())
  }

  /// Deletes an order's not-yet-withdrawn ledger rows on reversal.
  /// Withdrawn entries and their referral rows stay; paid-out money is
  /// not clawed back.
  pub async fn reverse(&self, order_id: i32) -> Result<()> {
    let txn = self.db.begin().await?;

    let entries = commission::Entity::find()
      .filter(commission::Column::OrderId.eq(order_id))
      .all(&txn)
      .await?;

    for entry in entries {
      if entry.status == CommissionStatus::Withdrawn {
        continue;
      }

      referral_commission::Entity::delete_many()
        .filter(referral_commission::Column::CommissionId.eq(entry.id))
        .filter(
          referral_commission::Column::Status.ne(CommissionStatus::Withdrawn),
        )
        .exec(&txn)
        .await?;

      commission::Entity::delete_by_id(entry.id).exec(&txn).await?;
    }

    txn.commit().await?;
    Ok(())
  }

  pub async fn sum_for_status(
    &self,
    dealer_id: i64,
    status: CommissionStatus,
  ) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let total: Option<Option<i64>> = commission::Entity::find()
      .select_only()
      .column_as(Expr::col(commission::Column::Amount).sum(), "total")
      .filter(commission::Column::DealerId.eq(dealer_id))
      .filter(commission::Column::Status.eq(status))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(total.flatten().unwrap_or(0))
  }

  pub async fn total_earned(&self, dealer_id: i64) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let total: Option<Option<i64>> = commission::Entity::find()
      .select_only()
      .column_as(Expr::col(commission::Column::Amount).sum(), "total")
      .filter(commission::Column::DealerId.eq(dealer_id))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(total.flatten().unwrap_or(0))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{entity::*, sv::test_utils::test_db, sv::wallet::PESEWAS};

  async fn seed_user(
    db: &DatabaseConnection,
    phone: &str,
    role: UserRole,
  ) -> i64 {
    let now = Utc::now().naive_utc();
    let user = user::ActiveModel {
      id: NotSet,
      name: Set("Test User".into()),
      phone: Set(phone.into()),
      role: Set(role),
      balance: Set(0),
      referred_by: Set(None),
      created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    user.id
  }

  async fn seed_order(
    db: &DatabaseConnection,
    user_id: i64,
    dealer_id: Option<i64>,
    total: i64,
  ) -> i32 {
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
    .insert(db)
    .await
    .unwrap();
    order.id
  }

  async fn seed_item(
    db: &DatabaseConnection,
    order_id: i32,
    product_id: i32,
    unit_price: i64,
    quantity: i32,
  ) {
    order_item::ActiveModel {
      id: NotSet,
      order_id: Set(order_id),
      product_id: Set(product_id),
      unit_price: Set(unit_price),
      quantity: Set(quantity),
      beneficiary_number: Set("+233550000000".into()),
    }
    .insert(db)
    .await
    .unwrap();
  }

  async fn seed_shop_price(
    db: &DatabaseConnection,
    dealer_id: i64,
    product_id: i32,
    price: i64,
  ) {
    let now = Utc::now().naive_utc();
    shop_price::ActiveModel {
      id: NotSet,
      dealer_id: Set(dealer_id),
      product_id: Set(product_id),
      price: Set(price),
      created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
  }

  #[tokio::test]
  async fn sequential_calls_are_idempotent() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000001", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000002", UserRole::Dealer).await;

    seed_shop_price(&db, dealer, 1, 80 * PESEWAS).await;
    let order = seed_order(&db, customer, Some(dealer), 80 * PESEWAS).await;
    seed_item(&db, order, 1, 60 * PESEWAS, 1).await;

    let sv = Commission::new(&db, &config);
    let first = sv.create_for_order(order).await.unwrap().unwrap();
    let second = sv.create_for_order(order).await.unwrap().unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.amount, 20 * PESEWAS);

    let count = commission::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 1);
  }

  #[tokio::test]
  async fn concurrent_calls_create_one_entry() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000003", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000004", UserRole::Dealer).await;

    seed_shop_price(&db, dealer, 1, 80 * PESEWAS).await;
    let order = seed_order(&db, customer, Some(dealer), 80 * PESEWAS).await;
    seed_item(&db, order, 1, 60 * PESEWAS, 1).await;

    let first = Commission::new(&db, &config);
    let second = Commission::new(&db, &config);
    let (a, b) =
      tokio::join!(first.create_for_order(order), second.create_for_order(order));

    let a = a.unwrap().unwrap();
    let b = b.unwrap().unwrap();
    assert_eq!(a.id, b.id);

    let count = commission::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 1);
  }

  #[tokio::test]
  async fn negative_margin_lines_contribute_zero() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000005", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000006", UserRole::Dealer).await;

    // Resale below base on one product, above on another.
    seed_shop_price(&db, dealer, 1, 50 * PESEWAS).await;
    seed_shop_price(&db, dealer, 2, 90 * PESEWAS).await;
    let order = seed_order(&db, customer, Some(dealer), 140 * PESEWAS).await;
    seed_item(&db, order, 1, 60 * PESEWAS, 1).await;
    seed_item(&db, order, 2, 60 * PESEWAS, 1).await;

    let entry = Commission::new(&db, &config)
      .create_for_order(order)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(entry.amount, 30 * PESEWAS);
  }

  #[tokio::test]
  async fn quantity_never_multiplies_the_margin() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000007", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000008", UserRole::Dealer).await;

    seed_shop_price(&db, dealer, 1, 63 * PESEWAS).await;
    let order = seed_order(&db, customer, Some(dealer), 63 * PESEWAS).await;
    seed_item(&db, order, 1, 60 * PESEWAS, 5).await;

    let entry = Commission::new(&db, &config)
      .create_for_order(order)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(entry.amount, 3 * PESEWAS);
  }

  #[tokio::test]
  async fn unpriced_lines_are_skipped() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000009", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000010", UserRole::Dealer).await;

    seed_shop_price(&db, dealer, 1, 80 * PESEWAS).await;
    let order = seed_order(&db, customer, Some(dealer), 140 * PESEWAS).await;
    seed_item(&db, order, 1, 60 * PESEWAS, 1).await;
    // Product 9 has no shop price row.
    seed_item(&db, order, 9, 60 * PESEWAS, 1).await;

    let entry = Commission::new(&db, &config)
      .create_for_order(order)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(entry.amount, 20 * PESEWAS);
  }

  #[tokio::test]
  async fn zero_margin_creates_no_entry() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000011", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000012", UserRole::Dealer).await;

    seed_shop_price(&db, dealer, 1, 60 * PESEWAS).await;
    let order = seed_order(&db, customer, Some(dealer), 60 * PESEWAS).await;
    seed_item(&db, order, 1, 60 * PESEWAS, 1).await;

    let entry = Commission::new(&db, &config)
      .create_for_order(order)
      .await
      .unwrap();
    assert!(entry.is_none());
    assert_eq!(commission::Entity::find().count(&db).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn order_without_dealer_is_a_noop() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000013", UserRole::Customer).await;

    let order = seed_order(&db, customer, None, 60 * PESEWAS).await;
    seed_item(&db, order, 1, 60 * PESEWAS, 1).await;

    let entry = Commission::new(&db, &config)
      .create_for_order(order)
      .await
      .unwrap();
    assert!(entry.is_none());
  }

  #[tokio::test]
  async fn make_available_releases_pending_rows_and_linked_referrals() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000014", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000015", UserRole::Dealer).await;
    let referrer = seed_user(&db, "+233250000016", UserRole::Dealer).await;

    let order = seed_order(&db, customer, Some(dealer), 80 * PESEWAS).await;
    let now = Utc::now().naive_utc();
    let entry = commission::ActiveModel {
      id: NotSet,
      dealer_id: Set(dealer),
      order_id: Set(Some(order)),
      amount: Set(20 * PESEWAS),
      status: Set(CommissionStatus::Pending),
      available_at: Set(None),
      created_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();
    let referral = referral_commission::ActiveModel {
      id: NotSet,
      referrer_id: Set(referrer),
      commission_id: Set(Some(entry.id)),
      amount: Set(2 * PESEWAS),
      referral_type: Set(ReferralType::OrderCommission),
      status: Set(CommissionStatus::Pending),
      available_at: Set(None),
      created_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();

    Commission::new(&db, &config).make_available(order).await.unwrap();

    let entry =
      commission::Entity::find_by_id(entry.id).one(&db).await.unwrap().unwrap();
    assert_eq!(entry.status, CommissionStatus::Available);
    let window_floor = Utc::now().naive_utc() + TimeDelta::days(6);
    assert!(entry.available_at.unwrap() > window_floor);

    let referral = referral_commission::Entity::find_by_id(referral.id)
      .one(&db)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(referral.status, CommissionStatus::Available);
    assert_eq!(referral.available_at, entry.available_at);
  }

  #[tokio::test]
  async fn make_available_releases_referrals_of_already_available_entries() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000017", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000018", UserRole::Dealer).await;
    let referrer = seed_user(&db, "+233250000019", UserRole::Dealer).await;

    seed_shop_price(&db, dealer, 1, 80 * PESEWAS).await;
    let order = seed_order(&db, customer, Some(dealer), 80 * PESEWAS).await;
    seed_item(&db, order, 1, 60 * PESEWAS, 1).await;

    // The dominant path: the entry itself is born available, while its
    // referral override waits out the refund window as pending.
    let entry = Commission::new(&db, &config)
      .create_for_order(order)
      .await
      .unwrap()
      .unwrap();
    let now = Utc::now().naive_utc();
    let referral = referral_commission::ActiveModel {
      id: NotSet,
      referrer_id: Set(referrer),
      commission_id: Set(Some(entry.id)),
      amount: Set(2 * PESEWAS),
      referral_type: Set(ReferralType::OrderCommission),
      status: Set(CommissionStatus::Pending),
      available_at: Set(entry.available_at),
      created_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();

    Commission::new(&db, &config).make_available(order).await.unwrap();

    let referral = referral_commission::Entity::find_by_id(referral.id)
      .one(&db)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(referral.status, CommissionStatus::Available);
  }

  #[tokio::test]
  async fn reverse_deletes_unwithdrawn_and_keeps_withdrawn() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let customer = seed_user(&db, "+233250000020", UserRole::Customer).await;
    let dealer = seed_user(&db, "+233250000021", UserRole::Dealer).await;
    let referrer = seed_user(&db, "+233250000022", UserRole::Dealer).await;
    let now = Utc::now().naive_utc();

    let reversible = seed_order(&db, customer, Some(dealer), 80 * PESEWAS).await;
    let live = commission::ActiveModel {
      id: NotSet,
      dealer_id: Set(dealer),
      order_id: Set(Some(reversible)),
      amount: Set(20 * PESEWAS),
      status: Set(CommissionStatus::Available),
      available_at: Set(Some(now)),
      created_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();
    let live_referral = referral_commission::ActiveModel {
      id: NotSet,
      referrer_id: Set(referrer),
      commission_id: Set(Some(live.id)),
      amount: Set(2 * PESEWAS),
      referral_type: Set(ReferralType::OrderCommission),
      status: Set(CommissionStatus::Pending),
      available_at: Set(None),
      created_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();

    let settled = seed_order(&db, customer, Some(dealer), 80 * PESEWAS).await;
    let paid = commission::ActiveModel {
      id: NotSet,
      dealer_id: Set(dealer),
      order_id: Set(Some(settled)),
      amount: Set(20 * PESEWAS),
      status: Set(CommissionStatus::Withdrawn),
      available_at: Set(Some(now)),
      created_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();

    let sv = Commission::new(&db, &config);
    sv.reverse(reversible).await.unwrap();
    sv.reverse(settled).await.unwrap();

    assert!(
      commission::Entity::find_by_id(live.id).one(&db).await.unwrap().is_none()
    );
    assert!(
      referral_commission::Entity::find_by_id(live_referral.id)
        .one(&db)
        .await
        .unwrap()
        .is_none()
    );
    // Already paid out: untouched.
    assert!(
      commission::Entity::find_by_id(paid.id).one(&db).await.unwrap().is_some()
    );
  }

  #[tokio::test]
  async fn sums_split_by_status() {
    let db = test_db::setup().await;
    let config = CommissionConfig::default();
    let dealer = seed_user(&db, "+233250000023", UserRole::Dealer).await;
    let now = Utc::now().naive_utc();

    for (amount, status) in [
      (10 * PESEWAS, CommissionStatus::Available),
      (15 * PESEWAS, CommissionStatus::Available),
      (7 * PESEWAS, CommissionStatus::Withdrawn),
    ] {
      commission::ActiveModel {
        id: NotSet,
        dealer_id: Set(dealer),
        order_id: Set(None),
        amount: Set(amount),
        status: Set(status),
        available_at: Set(Some(now)),
        created_at: Set(now),
      }
      .insert(&db)
      .await
      .unwrap();
    }

    let sv = Commission::new(&db, &config);
    let available =
      sv.sum_for_status(dealer, CommissionStatus::Available).await.unwrap();
    assert_eq!(available, 25 * PESEWAS);
    assert_eq!(sv.total_earned(dealer).await.unwrap(), 32 * PESEWAS);
  }
}
