use crate::{
  entity::{WalletTxType, user, wallet_transaction},
  prelude::*,
};

/// 1 GHS = 100 pesewas. All monetary amounts are stored in pesewas.
pub const PESEWAS: i64 = 100;

pub struct Wallet<'a, C> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> Wallet<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn get(&self, user_id: i64) -> Result<i64> {
    let user = user::Entity::find_by_id(user_id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;
    Ok(user.balance)
  }

  pub async fn deposit(
    &self,
    user_id: i64,
    amount: i64,
    description: Option<String>,
  ) -> Result<i64> {
    if amount <= 0 {
      return Err(Error::InvalidArgs("Deposit amount must be positive".into()));
    }
    self.credit(user_id, amount, WalletTxType::Deposit, description, None)
      .await
  }

  pub async fn spend(
    &self,
    user_id: i64,
    amount: i64,
    description: Option<String>,
    order_id: Option<i32>,
  ) -> Result<i64> {
    if amount <= 0 {
      return Err(Error::InvalidArgs("Spend amount must be positive".into()));
    }
    self
      .debit(user_id, amount, WalletTxType::Purchase, description, order_id)
      .await
  }

  pub async fn refund(
    &self,
    user_id: i64,
    amount: i64,
    description: Option<String>,
    order_id: Option<i32>,
  ) -> Result<i64> {
    if amount <= 0 {
      return Err(Error::InvalidArgs("Refund amount must be positive".into()));
    }
    self
      .credit(user_id, amount, WalletTxType::Refund, description, order_id)
      .await
  }

  pub async fn charge_upgrade_fee(
    &self,
    user_id: i64,
    amount: i64,
  ) -> Result<i64> {
    if amount <= 0 {
      return Err(Error::InvalidArgs("Fee amount must be positive".into()));
    }
    self
      .debit(
        user_id,
        amount,
        WalletTxType::UpgradeFee,
        Some("Dealer upgrade fee".into()),
        None,
      )
      .await
  }

  pub async fn credit_withdrawal_refund(
    &self,
    user_id: i64,
    amount: i64,
    withdrawal_id: i32,
  ) -> Result<i64> {
    if amount <= 0 {
      return Err(Error::InvalidArgs("Refund amount must be positive".into()));
    }
    self
      .credit(
        user_id,
        amount,
        WalletTxType::WithdrawalRefund,
        Some(format!("Refund for rejected withdrawal #{}", withdrawal_id)),
        None,
      )
      .await
  }

  pub async fn transactions(
    &self,
    user_id: i64,
    limit: u64,
  ) -> Result<Vec<wallet_transaction::Model>> {
    Ok(
      wallet_transaction::Entity::find()
        .filter(wallet_transaction::Column::UserId.eq(user_id))
        .order_by_desc(wallet_transaction::Column::CreatedAt)
        .limit(limit)
        .all(self.db)
        .await?,
    )
  }

  async fn credit(
    &self,
    user_id: i64,
    amount: i64,
    tx_type: WalletTxType,
    description: Option<String>,
    order_id: Option<i32>,
  ) -> Result<i64> {
    let txn = self.db.begin().await?;

    let user = user::Entity::find_by_id(user_id)
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;

    let new_balance = user.balance + amount;

    user::ActiveModel { balance: Set(new_balance), ..user.into() }
      .update(&txn)
      .await?;

    let now = Utc::now().naive_utc();
    wallet_transaction::ActiveModel {
      id: NotSet,
      user_id: Set(user_id),
      amount: Set(amount),
      tx_type: Set(tx_type),
      description: Set(description),
      order_id: Set(order_id),
      created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(new_balance)
  }

  async fn debit(
    &self,
    user_id: i64,
    amount: i64,
    tx_type: WalletTxType,
    description: Option<String>,
    order_id: Option<i32>,
  ) -> Result<i64> {
    let txn = self.db.begin().await?;

    let user = user::Entity::find_by_id(user_id)
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;

    if user.balance < amount {
      return Err(Error::InsufficientBalance);
    }

    let new_balance = user.balance - amount;

    user::ActiveModel { balance: Set(new_balance), ..user.into() }
      .update(&txn)
      .await?;

    let now = Utc::now().naive_utc();
    wallet_transaction::ActiveModel {
      id: NotSet,
      user_id: Set(user_id),
      amount: Set(-amount),
      tx_type: Set(tx_type),
      description: Set(description),
      order_id: Set(order_id),
      created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(new_balance)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{entity::*, sv::test_utils::test_db};

  async fn seed_user(db: &DatabaseConnection, phone: &str, balance: i64) -> i64 {
    let now = Utc::now().naive_utc();
    let user = user::ActiveModel {
      id: NotSet,
      name: Set("Test User".into()),
      phone: Set(phone.into()),
      role: Set(UserRole::Customer),
      balance: Set(balance),
      referred_by: Set(None),
      created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    user.id
  }

  #[tokio::test]
  async fn deposit_credits_balance_and_records_transaction() {
    let db = test_db::setup().await;
    let user_id = seed_user(&db, "+233200000001", 0).await;

    let new_balance = Wallet::new(&db)
      .deposit(user_id, 1000, Some("Mobile money top-up".into()))
      .await
      .unwrap();
    assert_eq!(new_balance, 1000);

    let history = Wallet::new(&db).transactions(user_id, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, 1000);
    assert_eq!(history[0].tx_type, WalletTxType::Deposit);
  }

  #[tokio::test]
  async fn spend_debits_balance_with_negative_ledger_row() {
    let db = test_db::setup().await;
    let user_id = seed_user(&db, "+233200000002", 1000).await;

    let new_balance = Wallet::new(&db)
      .spend(user_id, 400, Some("Order test".into()), None)
      .await
      .unwrap();
    assert_eq!(new_balance, 600);

    let history = Wallet::new(&db).transactions(user_id, 10).await.unwrap();
    assert_eq!(history[0].amount, -400);
    assert_eq!(history[0].tx_type, WalletTxType::Purchase);
  }

  #[tokio::test]
  async fn spend_rejects_insufficient_balance() {
    let db = test_db::setup().await;
    let user_id = seed_user(&db, "+233200000003", 100).await;

    let result = Wallet::new(&db).spend(user_id, 500, None, None).await;
    assert!(matches!(result, Err(Error::InsufficientBalance)));

    // Balance untouched, no ledger row written.
    assert_eq!(Wallet::new(&db).get(user_id).await.unwrap(), 100);
    assert!(Wallet::new(&db).transactions(user_id, 10).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn deposit_rejects_non_positive_amounts() {
    let db = test_db::setup().await;
    let user_id = seed_user(&db, "+233200000004", 0).await;

    let result = Wallet::new(&db).deposit(user_id, 0, None).await;
    assert!(matches!(result, Err(Error::InvalidArgs(_))));

    let result = Wallet::new(&db).deposit(user_id, -50, None).await;
    assert!(matches!(result, Err(Error::InvalidArgs(_))));
  }

  #[tokio::test]
  async fn withdrawal_refund_credits_back() {
    let db = test_db::setup().await;
    let user_id = seed_user(&db, "+233200000005", 0).await;

    let new_balance = Wallet::new(&db)
      .credit_withdrawal_refund(user_id, 2500, 7)
      .await
      .unwrap();
    assert_eq!(new_balance, 2500);

    let history = Wallet::new(&db).transactions(user_id, 10).await.unwrap();
    assert_eq!(history[0].tx_type, WalletTxType::WithdrawalRefund);
    assert!(history[0].description.as_deref().unwrap().contains("#7"));
  }
}
