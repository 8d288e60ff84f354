use chrono::NaiveTime;

use crate::{
  entity::{ReferralType, referral_commission, user},
  prelude::*,
  sv::wallet::PESEWAS,
};

/// Largest single referral commission allowed per type.
pub fn amount_ceiling(ty: ReferralType) -> i64 {
  match ty {
    ReferralType::AgentUpgrade => 50 * PESEWAS,
    ReferralType::OrderCommission => 1000 * PESEWAS,
    ReferralType::ReferralBonus => 100 * PESEWAS,
  }
}

/// Per-referrer cap on same-type commissions created within one UTC day.
pub fn daily_limit(ty: ReferralType) -> i64 {
  match ty {
    ReferralType::AgentUpgrade => 500 * PESEWAS,
    ReferralType::OrderCommission => 2000 * PESEWAS,
    ReferralType::ReferralBonus => 300 * PESEWAS,
  }
}

pub fn validate_commission_amount(amount: i64, ty: ReferralType) -> bool {
  amount > 0 && amount <= amount_ceiling(ty)
}

pub struct Validation<'a, C> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Validation<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  /// Daily-cap gate. Sums the referrer's same-type commissions created
  /// today and requires the sum to stay strictly below the cap. The
  /// incoming entry's amount is deliberately not added to the sum, so a
  /// referrer sitting just under the cap can still overshoot it with one
  /// large final entry. The check is advisory; nothing locks between the
  /// read and the subsequent insert.
  pub async fn can_create_commission(
    &self,
    referrer_id: i64,
    ty: ReferralType,
  ) -> Result<bool> {
    use sea_orm::sea_query::Expr;

    let start = Utc::now().date_naive().and_time(NaiveTime::MIN);
    let end = start + TimeDelta::days(1);

    let total: Option<Option<i64>> = referral_commission::Entity::find()
      .select_only()
      .column_as(Expr::col(referral_commission::Column::Amount).sum(), "total")
      .filter(referral_commission::Column::ReferrerId.eq(referrer_id))
      .filter(referral_commission::Column::ReferralType.eq(ty))
      .filter(referral_commission::Column::CreatedAt.gte(start))
      .filter(referral_commission::Column::CreatedAt.lt(end))
      .into_tuple()
      .one(self.db)
      .await?;

    let today = total.flatten().unwrap_or(0);
    Ok(today < daily_limit(ty))
  }

  /// Referrer must exist and currently hold a dealer-capable role; the
  /// role is re-checked on every call rather than cached.
  pub async fn validate_referrer(
    &self,
    referrer_id: i64,
  ) -> Result<user::Model> {
    let referrer = user::Entity::find_by_id(referrer_id)
      .one(self.db)
      .await?
      .ok_or(Error::ReferrerNotFound)?;

    if !referrer.role.is_dealer() {
      return Err(Error::ReferrerNotEligible);
    }

    Ok(referrer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{entity::*, sv::test_utils::test_db};

  async fn seed_user(
    db: &DatabaseConnection,
    phone: &str,
    role: UserRole,
  ) -> i64 {
    let now = Utc::now().naive_utc();
    let user = user::ActiveModel {
      id: NotSet,
      name: Set("Referrer".into()),
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

  async fn seed_referral_row(
    db: &DatabaseConnection,
    referrer_id: i64,
    amount: i64,
    ty: ReferralType,
  ) {
    let now = Utc::now().naive_utc();
    referral_commission::ActiveModel {
      id: NotSet,
      referrer_id: Set(referrer_id),
      commission_id: Set(None),
      amount: Set(amount),
      referral_type: Set(ty),
      status: Set(CommissionStatus::Available),
      available_at: Set(Some(now)),
      created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
  }

  #[test]
  fn ceiling_rejects_oversized_upgrade_bonus() {
    assert!(!validate_commission_amount(60 * PESEWAS, ReferralType::AgentUpgrade));
    assert!(validate_commission_amount(40 * PESEWAS, ReferralType::AgentUpgrade));
    // The ceiling itself is still allowed.
    assert!(validate_commission_amount(50 * PESEWAS, ReferralType::AgentUpgrade));
  }

  #[test]
  fn ceiling_rejects_non_positive_amounts() {
    assert!(!validate_commission_amount(0, ReferralType::OrderCommission));
    assert!(!validate_commission_amount(-100, ReferralType::ReferralBonus));
  }

  #[tokio::test]
  async fn daily_cap_checks_existing_sum_only() {
    let db = test_db::setup().await;
    let referrer = seed_user(&db, "+233240000001", UserRole::Dealer).await;

    seed_referral_row(
      &db,
      referrer,
      1000 * PESEWAS,
      ReferralType::OrderCommission,
    )
    .await;
    seed_referral_row(&db, referrer, 999 * PESEWAS, ReferralType::OrderCommission)
      .await;

    // 1999 under the 2000 cap: still creatable, whatever the new amount is.
    let ok = Validation::new(&db)
      .can_create_commission(referrer, ReferralType::OrderCommission)
      .await
      .unwrap();
    assert!(ok);

    seed_referral_row(&db, referrer, PESEWAS, ReferralType::OrderCommission)
      .await;

    // Exactly at the cap: blocked.
    let ok = Validation::new(&db)
      .can_create_commission(referrer, ReferralType::OrderCommission)
      .await
      .unwrap();
    assert!(!ok);
  }

  #[tokio::test]
  async fn daily_cap_only_counts_same_type_rows() {
    let db = test_db::setup().await;
    let referrer = seed_user(&db, "+233240000002", UserRole::Dealer).await;

    seed_referral_row(&db, referrer, 500 * PESEWAS, ReferralType::AgentUpgrade)
      .await;

    // The agent-upgrade ledger is at its cap, order commissions are not.
    let upgrades = Validation::new(&db)
      .can_create_commission(referrer, ReferralType::AgentUpgrade)
      .await
      .unwrap();
    assert!(!upgrades);

    let orders = Validation::new(&db)
      .can_create_commission(referrer, ReferralType::OrderCommission)
      .await
      .unwrap();
    assert!(orders);
  }

  #[tokio::test]
  async fn referrer_must_exist_and_hold_dealer_role() {
    let db = test_db::setup().await;

    let missing = Validation::new(&db).validate_referrer(999).await;
    assert!(matches!(missing, Err(Error::ReferrerNotFound)));

    let customer = seed_user(&db, "+233240000003", UserRole::Customer).await;
    let result = Validation::new(&db).validate_referrer(customer).await;
    assert!(matches!(result, Err(Error::ReferrerNotEligible)));

    let agent = seed_user(&db, "+233240000004", UserRole::Agent).await;
    assert!(Validation::new(&db).validate_referrer(agent).await.is_ok());

    let dealer = seed_user(&db, "+233240000005", UserRole::Dealer).await;
    assert!(Validation::new(&db).validate_referrer(dealer).await.is_ok());
  }
}
