use crate::{
  config::CommissionConfig,
  entity::{UserRole, shop_price, user},
  prelude::*,
  sv::{Referral, Wallet},
};

pub struct User<'a, C> {
  db: &'a C,
  config: &'a CommissionConfig,
}

impl<'a, C: ConnectionTrait + TransactionTrait> User<'a, C> {
  pub fn new(db: &'a C, config: &'a CommissionConfig) -> Self {
    Self { db, config }
  }

  pub async fn register(
    &self,
    name: String,
    phone: String,
    referred_by: Option<i64>,
  ) -> Result<user::Model> {
    if name.trim().is_empty() {
      return Err(Error::InvalidArgs("Name must not be empty".into()));
    }
    if phone.trim().is_empty() {
      return Err(Error::InvalidArgs("Phone must not be empty".into()));
    }

    if user::Entity::find()
      .filter(user::Column::Phone.eq(&phone))
      .one(self.db)
      .await?
      .is_some()
    {
      return Err(Error::InvalidArgs("Phone number already registered".into()));
    }

    if let Some(referrer_id) = referred_by {
      user::Entity::find_by_id(referrer_id)
        .one(self.db)
        .await?
        .ok_or(Error::ReferrerNotFound)?;
    }

    let now = Utc::now().naive_utc();
    Ok(
      user::ActiveModel {
        id: NotSet,
        name: Set(name),
        phone: Set(phone),
        role: Set(UserRole::Customer),
        balance: Set(0),
        referred_by: Set(referred_by),
        created_at: Set(now),
      }
      .insert(self.db)
      .await?,
    )
  }

  pub async fn by_id(&self, user_id: i64) -> Result<user::Model> {
    user::Entity::find_by_id(user_id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)
  }

  /// Upgrades a customer or legacy agent to dealer for the fixed fee.
  /// The referrer's bonus is attempted after commit and never fails the
  /// upgrade.
  pub async fn upgrade_to_dealer(&self, user_id: i64) -> Result<user::Model> {
    let user = self.by_id(user_id).await?;

    match user.role {
      UserRole::Dealer => {
        return Err(Error::InvalidArgs("User is already a dealer".into()));
      }
      UserRole::Admin => {
        return Err(Error::InvalidArgs("Admins cannot become dealers".into()));
      }
      UserRole::Customer | UserRole::Agent => {}
    }

    let referred_by = user.referred_by;

    let txn = self.db.begin().await?;

    Wallet::new(&txn)
      .charge_upgrade_fee(user_id, self.config.dealer_upgrade_fee)
      .await?;

    let user = user::ActiveModel { role: Set(UserRole::Dealer), ..user.into() }
      .update(&txn)
      .await?;

    txn.commit().await?;

    if let Some(referrer_id) = referred_by {
      if let Err(err) = Referral::new(self.db, self.config)
        .create_agent_upgrade_commission(
          referrer_id,
          self.config.agent_upgrade_bonus,
        )
        .await
      {
        warn!("upgrade bonus for referrer {} failed: {}", referrer_id, err);
      }
    }

    Ok(user)
  }

  /// Sets or replaces the dealer's resale price for one product.
  pub async fn set_shop_price(
    &self,
    dealer_id: i64,
    product_id: i32,
    price: i64,
  ) -> Result<shop_price::Model> {
    if price <= 0 {
      return Err(Error::InvalidArgs("Price must be positive".into()));
    }

    let dealer = self.by_id(dealer_id).await?;
    if !dealer.role.is_dealer() {
      return Err(Error::DealerRequired);
    }

    let existing = shop_price::Entity::find()
      .filter(shop_price::Column::DealerId.eq(dealer_id))
      .filter(shop_price::Column::ProductId.eq(product_id))
      .one(self.db)
      .await?;

    let now = Utc::now().naive_utc();
    Ok(match existing {
      Some(row) => {
        shop_price::ActiveModel { price: Set(price), ..row.into() }
          .update(self.db)
          .await?
      }
      None => {
        shop_price::ActiveModel {
          id: NotSet,
          dealer_id: Set(dealer_id),
          product_id: Set(product_id),
          price: Set(price),
          created_at: Set(now),
        }
        .insert(self.db)
        .await?
      }
    })
  }

  pub async fn dealers(&self) -> Result<Vec<user::Model>> {
    Ok(
      user::Entity::find()
        .filter(
          user::Column::Role
            .eq(UserRole::Agent)
            .or(user::Column::Role.eq(UserRole::Dealer)),
        )
        .all(self.db)
        .await?,
    )
  }
}
