pub use sea_orm_migration::prelude::*;

mod m20260118_000001_create_users;
mod m20260118_000002_create_orders;
mod m20260118_000003_create_order_items;
mod m20260118_000004_create_shop_prices;
mod m20260118_000005_create_commissions;
mod m20260118_000006_create_referral_commissions;
mod m20260118_000007_create_withdrawals;
mod m20260118_000008_create_wallet_transactions;
mod m20260125_000009_add_commission_order_unique;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260118_000001_create_users::Migration),
      Box::new(m20260118_000002_create_orders::Migration),
      Box::new(m20260118_000003_create_order_items::Migration),
      Box::new(m20260118_000004_create_shop_prices::Migration),
      Box::new(m20260118_000005_create_commissions::Migration),
      Box::new(m20260118_000006_create_referral_commissions::Migration),
      Box::new(m20260118_000007_create_withdrawals::Migration),
      Box::new(m20260118_000008_create_wallet_transactions::Migration),
      Box::new(m20260125_000009_add_commission_order_unique::Migration),
    ]
  }
}
