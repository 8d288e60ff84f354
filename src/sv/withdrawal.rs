//! Withdrawal settlement over the commission ledger.
//!
//! A withdrawal reserves balance from the moment it is requested and
//! consumes ledger rows when an admin begins processing it, before the
//! payout posts. Consumption treats every commission row as an atomic
//! unit: rows are taken oldest-first, and a row larger than the amount
//! still owed is skipped whole, never split. A withdrawal can therefore
//! finish processing with part of its amount unattributed to any
//! consumed row; the shortfall stays available and is logged.

use crate::{
  entity::{
    CommissionStatus, Network, WithdrawalStatus, commission,
    referral_commission, user, withdrawal,
  },
  prelude::*,
  sv::Wallet,
  utils,
};

pub struct Withdrawal<'a, C> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> Withdrawal<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  /// Commission plus referral balance currently marked available.
  async fn earned_available(&self, agent_id: i64) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let commissions: Option<Option<i64>> = commission::Entity::find()
      .select_only()
      .column_as(Expr::col(commission::Column::Amount).sum(), "total")
      .filter(commission::Column::DealerId.eq(agent_id))
      .filter(commission::Column::Status.eq(CommissionStatus::Available))
      .into_tuple()
      .one(self.db)
      .await?;

    let referrals: Option<Option<i64>> = referral_commission::Entity::find()
      .select_only()
      .column_as(Expr::col(referral_commission::Column::Amount).sum(), "total")
      .filter(referral_commission::Column::ReferrerId.eq(agent_id))
      .filter(referral_commission::Column::Status.eq(CommissionStatus::Available))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(commissions.flatten().unwrap_or(0) + referrals.flatten().unwrap_or(0))
  }

  /// Balance shown on the dealer withdrawal page and enforced when a
  /// request is created. Reserves the requested amount of every
  /// withdrawal that is not rejected or paid. Can go negative; display
  /// clamps it, request validation does not.
  pub async fn available_balance_for_withdrawal_page(
    &self,
    agent_id: i64,
  ) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let reserved: Option<Option<i64>> = withdrawal::Entity::find()
      .select_only()
      .column_as(Expr::col(withdrawal::Column::RequestedAmount).sum(), "total")
      .filter(withdrawal::Column::AgentId.eq(agent_id))
      .filter(withdrawal::Column::Status.is_not_in([
        WithdrawalStatus::Rejected,
        WithdrawalStatus::Paid,
      ]))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(
      self.earned_available(agent_id).await?
        - reserved.flatten().unwrap_or(0),
    )
  }

  /// Balance shown in the admin dealer list. Same exclusion set as the
  /// withdrawal page but reserves `amount` instead of `requested_amount`,
  /// so the two surfaces disagree once a fee adjusts `amount`.
  pub async fn available_balance_for_admin_list(
    &self,
    agent_id: i64,
  ) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let reserved: Option<Option<i64>> = withdrawal::Entity::find()
      .select_only()
      .column_as(Expr::col(withdrawal::Column::Amount).sum(), "total")
      .filter(withdrawal::Column::AgentId.eq(agent_id))
      .filter(withdrawal::Column::Status.is_not_in([
        WithdrawalStatus::Rejected,
        WithdrawalStatus::Paid,
      ]))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(
      self.earned_available(agent_id).await?
        - reserved.flatten().unwrap_or(0),
    )
  }

  /// Balance shown on the dealer dashboard. Reserves `amount` of pending
  /// and approved withdrawals only; processing ones do not count here
  /// even though their ledger rows may already be consumed.
  pub async fn available_balance_for_dashboard(
    &self,
    agent_id: i64,
  ) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let reserved: Option<Option<i64>> = withdrawal::Entity::find()
      .select_only()
      .column_as(Expr::col(withdrawal::Column::Amount).sum(), "total")
      .filter(withdrawal::Column::AgentId.eq(agent_id))
      .filter(withdrawal::Column::Status.is_in([
        WithdrawalStatus::Pending,
        WithdrawalStatus::Approved,
      ]))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(
      self.earned_available(agent_id).await?
        - reserved.flatten().unwrap_or(0),
    )
  }

  /// Creates a pending request after checking the caller-supplied
  /// surface minimum and the raw withdrawal-page balance.
  pub async fn request(
    &self,
    dealer_id: i64,
    amount: i64,
    network: Network,
    account_name: String,
    account_number: String,
    minimum: i64,
  ) -> Result<withdrawal::Model> {
    if amount < minimum {
      return Err(Error::WithdrawalBelowMinimum { minimum });
    }

    let txn = self.db.begin().await?;

    let user = user::Entity::find_by_id(dealer_id)
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;

    if !user.role.is_dealer() {
      return Err(Error::WithdrawalNotAllowed);
    }

    let available = Withdrawal::new(&txn)
      .available_balance_for_withdrawal_page(dealer_id)
      .await?;
    if amount > available {
      return Err(Error::InsufficientBalance);
    }

    let now = Utc::now().naive_utc();
    let request = withdrawal::ActiveModel {
      id: NotSet,
      agent_id: Set(dealer_id),
      requested_amount: Set(amount),
      amount: Set(amount),
      // TODO: apply the carrier fee schedule; amount tracks the request until then
      fee_amount: Set(0),
      status: Set(WithdrawalStatus::Pending),
      network: Set(network),
      mobile_money_account_name: Set(account_name),
      mobile_money_number: Set(account_number),
      notes: Set(None),
      processed_at: Set(None),
      created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(request)
  }

  /// Admin starts paying out a pending request. Funds are committed
  /// here: the consumption pass runs now, not at final payment.
  pub async fn begin_processing(
    &self,
    id: i32,
    notes: Option<String>,
  ) -> Result<withdrawal::Model> {
    let txn = self.db.begin().await?;

    let request = withdrawal::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::WithdrawalNotFound)?;

    if request.status != WithdrawalStatus::Pending {
      return Err(Error::WithdrawalNotPending);
    }

    let agent_id = request.agent_id;
    let amount = request.amount;

    let now = Utc::now().naive_utc();
    let request = withdrawal::ActiveModel {
      status: Set(WithdrawalStatus::Processing),
      processed_at: Set(Some(now)),
      notes: Set(notes),
      ..request.into()
    }
    .update(&txn)
    .await?;

    let leftover = Withdrawal::new(&txn)
      .mark_commissions_as_withdrawn(agent_id, amount)
      .await?;
    if leftover > 0 {
      warn!(
        "withdrawal {} left {} unconsumed, no available row was small enough",
        id,
        utils::format_amount(leftover)
      );
    }

    txn.commit().await?;
    Ok(request)
  }

  /// Finalizes the payout. Ledger rows were consumed when processing
  /// began; approved requests from the legacy flow are paid without any
  /// consumption at all.
  pub async fn mark_paid(
    &self,
    id: i32,
    notes: Option<String>,
  ) -> Result<withdrawal::Model> {
    let request = withdrawal::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::WithdrawalNotFound)?;

    if !matches!(
      request.status,
      WithdrawalStatus::Processing | WithdrawalStatus::Approved
    ) {
      return Err(Error::WithdrawalNotPayable);
    }

    let now = Utc::now().naive_utc();
    let mut update = withdrawal::ActiveModel {
      status: Set(WithdrawalStatus::Paid),
      processed_at: Set(Some(now)),
      ..request.into()
    };
    if let Some(notes) = notes {
      update.notes = Set(Some(notes));
    }

    Ok(update.update(self.db).await?)
  }

  /// Declines a pending request. Nothing was consumed at pending, so
  /// nothing is refunded; the reservation simply lapses.
  pub async fn reject(
    &self,
    id: i32,
    notes: String,
  ) -> Result<withdrawal::Model> {
    let request = withdrawal::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::WithdrawalNotFound)?;

    if request.status != WithdrawalStatus::Pending {
      return Err(Error::WithdrawalNotPending);
    }

    let now = Utc::now().naive_utc();
    Ok(
      withdrawal::ActiveModel {
        status: Set(WithdrawalStatus::Rejected),
        processed_at: Set(Some(now)),
        notes: Set(Some(notes)),
        ..request.into()
      }
      .update(self.db)
      .await?,
    )
  }

  /// Legacy single-step flow: marks a pending request approved without
  /// consuming any ledger rows. Kept for records and tooling that
  /// predate the processing step.
  pub async fn approve(
    &self,
    id: i32,
    notes: Option<String>,
  ) -> Result<withdrawal::Model> {
    let request = withdrawal::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::WithdrawalNotFound)?;

    if request.status != WithdrawalStatus::Pending {
      return Err(Error::WithdrawalNotPending);
    }

    let now = Utc::now().naive_utc();
    let mut update = withdrawal::ActiveModel {
      status: Set(WithdrawalStatus::Approved),
      processed_at: Set(Some(now)),
      ..request.into()
    };
    if let Some(notes) = notes {
      update.notes = Set(Some(notes));
    }

    Ok(update.update(self.db).await?)
  }

  /// Legacy companion to [`Self::approve`]: rejects a pending request
  /// and credits the requested amount back onto the wallet balance.
  /// Nothing was consumed at pending, so the credit lands on top of the
  /// lapsed reservation; preserved as-is for the older admin tooling.
  pub async fn reject_with_refund(
    &self,
    id: i32,
    notes: String,
  ) -> Result<withdrawal::Model> {
    let txn = self.db.begin().await?;

    let request = withdrawal::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::WithdrawalNotFound)?;

    if request.status != WithdrawalStatus::Pending {
      return Err(Error::WithdrawalNotPending);
    }

    let agent_id = request.agent_id;
    let refund = request.requested_amount;

    let now = Utc::now().naive_utc();
    let request = withdrawal::ActiveModel {
      status: Set(WithdrawalStatus::Rejected),
      processed_at: Set(Some(now)),
      notes: Set(Some(notes)),
      ..request.into()
    }
    .update(&txn)
    .await?;

    Wallet::new(&txn)
      .credit_withdrawal_refund(agent_id, refund, id)
      .await?;

    txn.commit().await?;
    Ok(request)
  }

  /// Consumes available ledger rows to cover an amount being paid out.
  /// Rows are taken oldest-first; a row is an atomic unit, so one
  /// larger than the amount still owed is skipped whole, never split.
  /// Regular commissions are consumed before referral rows. Returns the
  /// unattributed remainder, which stays available.
  pub async fn mark_commissions_as_withdrawn(
    &self,
    agent_id: i64,
    amount: i64,
  ) -> Result<i64> {
    let txn = self.db.begin().await?;
    let mut remaining = amount;

    let entries = commission::Entity::find()
      .filter(commission::Column::DealerId.eq(agent_id))
      .filter(commission::Column::Status.eq(CommissionStatus::Available))
      .order_by_asc(commission::Column::CreatedAt)
      .all(&txn)
      .await?;

    for entry in entries {
      if remaining <= 0 {
        break;
      }
      if entry.amount > remaining {
        continue;
      }
      remaining -= entry.amount;
      commission::ActiveModel {
        status: Set(CommissionStatus::Withdrawn),
        ..entry.into()
      }
      .update(&txn)
      .await?;
    }

    if remaining > 0 {
      let rows = referral_commission::Entity::find()
        .filter(referral_commission::Column::ReferrerId.eq(agent_id))
        .filter(
          referral_commission::Column::Status.eq(CommissionStatus::Available),
        )
        .order_by_asc(referral_commission::Column::CreatedAt)
        .all(&txn)
        .await?;

      for row in rows {
        if remaining <= 0 {
          break;
        }
        if row.amount > remaining {
          continue;
        }
        remaining -= row.amount;
        referral_commission::ActiveModel {
          status: Set(CommissionStatus::Withdrawn),
          ..row.into()
        }
        .update(&txn)
        .await?;
      }
    }

    txn.commit().await?;
    Ok(remaining)
  }

  /// Inverse of [`Self::mark_commissions_as_withdrawn`] for reversing a
  /// settled withdrawal: flips withdrawn rows back to available,
  /// oldest-first with the same skip rule. Not wired to any endpoint
  /// yet, but part of the ledger contract.
  #[allow(dead_code)]
  pub async fn restore_commissions_to_available(
    &self,
    agent_id: i64,
    amount: i64,
  ) -> Result<i64> {
    let txn = self.db.begin().await?;
    let mut remaining = amount;

    let entries = commission::Entity::find()
      .filter(commission::Column::DealerId.eq(agent_id))
      .filter(commission::Column::Status.eq(CommissionStatus::Withdrawn))
      .order_by_asc(commission::Column::CreatedAt)
      .all(&txn)
      .await?;

    for entry in entries {
      if remaining <= 0 {
        break;
      }
      if entry.amount > remaining {
        continue;
      }
      remaining -= entry.amount;
      commission::ActiveModel {
        status: Set(CommissionStatus::Available),
        ..entry.into()
      }
      .update(&txn)
      .await?;
    }

    if remaining > 0 {
      let rows = referral_commission::Entity::find()
        .filter(referral_commission::Column::ReferrerId.eq(agent_id))
        .filter(
          referral_commission::Column::Status.eq(CommissionStatus::Withdrawn),
        )
        .order_by_asc(referral_commission::Column::CreatedAt)
        .all(&txn)
        .await?;

      for row in rows {
        if remaining <= 0 {
          break;
        }
        if row.amount > remaining {
          continue;
        }
        remaining -= row.amount;
        referral_commission::ActiveModel {
          status: Set(CommissionStatus::Available),
          ..row.into()
        }
        .update(&txn)
        .await?;
      }
    }

    txn.commit().await?;
    Ok(remaining)
  }

  pub async fn total_paid(&self, agent_id: i64) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let total: Option<Option<i64>> = withdrawal::Entity::find()
      .select_only()
      .column_as(Expr::col(withdrawal::Column::Amount).sum(), "total")
      .filter(withdrawal::Column::AgentId.eq(agent_id))
      .filter(withdrawal::Column::Status.eq(WithdrawalStatus::Paid))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(total.flatten().unwrap_or(0))
  }

  pub async fn by_id(&self, id: i32) -> Result<withdrawal::Model> {
    withdrawal::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::WithdrawalNotFound)
  }

  pub async fn history(&self, agent_id: i64) -> Result<Vec<withdrawal::Model>> {
    Ok(
      withdrawal::Entity::find()
        .filter(withdrawal::Column::AgentId.eq(agent_id))
        .order_by_desc(withdrawal::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }
}
