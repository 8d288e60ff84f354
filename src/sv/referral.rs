use crate::{
  config::CommissionConfig,
  entity::{
    CommissionStatus, ReferralType, commission, referral_commission, user,
  },
  prelude::*,
  sv::validation::{self, Validation},
  utils,
};

pub struct Referral<'a, C> {
  db: &'a C,
  config: &'a CommissionConfig,
}

impl<'a, C: ConnectionTrait> Referral<'a, C> {
  pub fn new(db: &'a C, config: &'a CommissionConfig) -> Self {
    Self { db, config }
  }

  /// Flat bonus for referring a user who just upgraded to dealer,
  /// credited as immediately available. Validation failures are logged
  /// and reported as `false`, never as errors; an upgrade must not fail
  /// over its bonus.
  pub async fn create_agent_upgrade_commission(
    &self,
    referrer_id: i64,
    amount: i64,
  ) -> Result<bool> {
    if !validation::validate_commission_amount(amount, ReferralType::AgentUpgrade)
    {
      warn!(
        "upgrade bonus {} for referrer {} fails the amount ceiling",
        utils::format_amount(amount),
        referrer_id
      );
      return Ok(false);
    }

    let gate = Validation::new(self.db);
    match gate.validate_referrer(referrer_id).await {
      Ok(_) => {}
      Err(err @ (Error::ReferrerNotFound | Error::ReferrerNotEligible)) => {
        warn!("upgrade bonus for referrer {} skipped: {}", referrer_id, err);
        return Ok(false);
      }
      Err(err) => return Err(err),
    }

    if !gate
      .can_create_commission(referrer_id, ReferralType::AgentUpgrade)
      .await?
    {
      warn!("referrer {} hit the daily agent-upgrade cap", referrer_id);
      return Ok(false);
    }

    let now = Utc::now().naive_utc();
    referral_commission::ActiveModel {
      id: NotSet,
      referrer_id: Set(referrer_id),
      commission_id: Set(None),
      amount: Set(amount),
      referral_type: Set(ReferralType::AgentUpgrade),
      status: Set(CommissionStatus::Available),
      available_at: Set(Some(now)),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    Ok(true)
  }

  /// Percentage override for the referrer of the dealer who earned a
  /// commission. Held as pending and released together with the parent.
  /// Silently no-ops when the dealer has no referrer or validation
  /// declines the entry.
  pub async fn create_referral_commission(
    &self,
    commission: &commission::Model,
  ) -> Result<()> {
    let dealer = user::Entity::find_by_id(commission.dealer_id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    let Some(referrer_id) = dealer.referred_by else {
      return Ok(());
    };

    let amount = commission.amount * self.config.referral_rate_percent / 100;

    if !validation::validate_commission_amount(
      amount,
      ReferralType::OrderCommission,
    ) {
      warn!(
        "referral override {} on commission {} fails the amount ceiling",
        utils::format_amount(amount),
        commission.id
      );
      return Ok(());
    }

    let gate = Validation::new(self.db);
    match gate.validate_referrer(referrer_id).await {
      Ok(_) => {}
      Err(err @ (Error::ReferrerNotFound | Error::ReferrerNotEligible)) => {
        warn!(
          "referral override on commission {} skipped: {}",
          commission.id, err
        );
        return Ok(());
      }
      Err(err) => return Err(err),
    }

    if !gate
      .can_create_commission(referrer_id, ReferralType::OrderCommission)
      .await?
    {
      warn!("referrer {} hit the daily order-commission cap", referrer_id);
      return Ok(());
    }

    let now = Utc::now().naive_utc();
    referral_commission::ActiveModel {
      id: NotSet,
      referrer_id: Set(referrer_id),
      commission_id: Set(Some(commission.id)),
      amount: Set(amount),
      referral_type: Set(ReferralType::OrderCommission),
      status: Set(CommissionStatus::Pending),
      available_at: Set(commission.available_at),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    Ok(())
  }

  pub async fn sum_for_status(
    &self,
    referrer_id: i64,
    status: CommissionStatus,
  ) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let total: Option<Option<i64>> = referral_commission::Entity::find()
      .select_only()
      .column_as(Expr::col(referral_commission::Column::Amount).sum(), "total")
      .filter(referral_commission::Column::ReferrerId.eq(referrer_id))
      .filter(referral_commission::Column::Status.eq(status))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(total.flatten().unwrap_or(0))
  }

  pub async fn total_earned(&self, referrer_id: i64) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let total: Option<Option<i64>> = referral_commission::Entity::find()
      .select_only()
      .column_as(Expr::col(referral_commission::Column::Amount).sum(), "total")
      .filter(referral_commission::Column::ReferrerId.eq(referrer_id))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(total.flatten().unwrap_or(0))
  }
}
