use axum::{
  Json,
  extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    CommissionStatus, Network, order, order_item, shop_price, user,
    wallet_transaction, withdrawal,
  },
  prelude::*,
  state::AppState,
  sv,
  sv::order::CheckoutItem,
};

#[derive(Serialize)]
pub struct Status {
  success: bool,
  msg: Option<String>,
}

pub async fn health() -> Json<Status> {
  Json(Status { success: true, msg: None })
}

#[derive(Deserialize)]
pub struct RegisterReq {
  pub name: String,
  pub phone: String,
  pub referred_by: Option<i64>,
}

#[derive(Deserialize)]
pub struct DepositReq {
  pub amount: i64,
  pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct PriceReq {
  pub product_id: i32,
  pub price: i64,
}

#[derive(Deserialize)]
pub struct CheckoutReq {
  pub user_id: i64,
  pub dealer_id: Option<i64>,
  pub items: Vec<CheckoutItem>,
}

#[derive(Deserialize)]
pub struct WithdrawalReq {
  pub dealer_id: i64,
  pub amount: i64,
  pub network: Network,
  pub account_name: String,
  pub account_number: String,
}

#[derive(Deserialize)]
pub struct NotesReq {
  pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct RejectReq {
  pub notes: String,
}

#[derive(Serialize)]
pub struct WalletView {
  pub balance: i64,
  pub transactions: Vec<wallet_transaction::Model>,
}

#[derive(Serialize)]
pub struct BalanceView {
  pub available_balance: i64,
  pub commission_available: i64,
  pub referral_available: i64,
}

#[derive(Serialize)]
pub struct DashboardView {
  pub available_balance: i64,
  pub lifetime_commission: i64,
  pub lifetime_referral: i64,
  pub total_paid_out: i64,
}

#[derive(Serialize)]
pub struct AdminDealerRow {
  pub dealer: user::Model,
  pub available_balance: i64,
}

#[derive(Serialize)]
pub struct OrderView {
  pub order: order::Model,
  pub items: Vec<order_item::Model>,
}

pub async fn register(
  State(app): State<Arc<AppState>>,
  Json(req): Json<RegisterReq>,
) -> Result<Json<user::Model>> {
  let user = sv::User::new(&app.db, &app.config.commission)
    .register(req.name, req.phone, req.referred_by)
    .await?;
  Ok(Json(user))
}

pub async fn deposit(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
  Json(req): Json<DepositReq>,
) -> Result<Json<WalletView>> {
  let wallet = sv::Wallet::new(&app.db);
  let balance = wallet.deposit(id, req.amount, req.description).await?;
  let transactions = wallet.transactions(id, 20).await?;
  Ok(Json(WalletView { balance, transactions }))
}

pub async fn upgrade(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<user::Model>> {
  let user = sv::User::new(&app.db, &app.config.commission)
    .upgrade_to_dealer(id)
    .await?;
  Ok(Json(user))
}

pub async fn wallet(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<WalletView>> {
  let wallet = sv::Wallet::new(&app.db);
  let balance = wallet.get(id).await?;
  let transactions = wallet.transactions(id, 20).await?;
  Ok(Json(WalletView { balance, transactions }))
}

pub async fn user_orders(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<order::Model>>> {
  let orders =
    sv::Order::new(&app.db, &app.config.commission).for_user(id).await?;
  Ok(Json(orders))
}

pub async fn set_price(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
  Json(req): Json<PriceReq>,
) -> Result<Json<shop_price::Model>> {
  let price = sv::User::new(&app.db, &app.config.commission)
    .set_shop_price(id, req.product_id, req.price)
    .await?;
  Ok(Json(price))
}

pub async fn checkout(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CheckoutReq>,
) -> Result<Json<order::Model>> {
  let order = sv::Order::new(&app.db, &app.config.commission)
    .checkout(req.user_id, req.dealer_id, req.items)
    .await?;
  Ok(Json(order))
}

pub async fn order(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<OrderView>> {
  let orders = sv::Order::new(&app.db, &app.config.commission);
  let order = orders.by_id(id).await?;
  let items = orders.items(id).await?;
  Ok(Json(OrderView { order, items }))
}

pub async fn complete_order(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<order::Model>> {
  let order =
    sv::Order::new(&app.db, &app.config.commission).complete(id).await?;
  Ok(Json(order))
}

pub async fn cancel_order(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<order::Model>> {
  let order =
    sv::Order::new(&app.db, &app.config.commission).cancel(id).await?;
  Ok(Json(order))
}

pub async fn dealer_orders(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<order::Model>>> {
  let orders =
    sv::Order::new(&app.db, &app.config.commission).for_dealer(id).await?;
  Ok(Json(orders))
}

pub async fn dealer_balance(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<BalanceView>> {
  let raw = sv::Withdrawal::new(&app.db)
    .available_balance_for_withdrawal_page(id)
    .await?;
  let commission_available =
    sv::Commission::new(&app.db, &app.config.commission)
      .sum_for_status(id, CommissionStatus::Available)
      .await?;
  let referral_available = sv::Referral::new(&app.db, &app.config.commission)
    .sum_for_status(id, CommissionStatus::Available)
    .await?;

  Ok(Json(BalanceView {
    // Display floor; request validation still sees the raw figure.
    available_balance: raw.max(0),
    commission_available,
    referral_available,
  }))
}

pub async fn dealer_dashboard(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<DashboardView>> {
  let withdrawals = sv::Withdrawal::new(&app.db);
  let available_balance =
    withdrawals.available_balance_for_dashboard(id).await?;
  let total_paid_out = withdrawals.total_paid(id).await?;
  let lifetime_commission = sv::Commission::new(&app.db, &app.config.commission)
    .total_earned(id)
    .await?;
  let lifetime_referral = sv::Referral::new(&app.db, &app.config.commission)
    .total_earned(id)
    .await?;

  Ok(Json(DashboardView {
    available_balance,
    lifetime_commission,
    lifetime_referral,
    total_paid_out,
  }))
}

pub async fn admin_dealers(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<AdminDealerRow>>> {
  let dealers =
    sv::User::new(&app.db, &app.config.commission).dealers().await?;
  let withdrawals = sv::Withdrawal::new(&app.db);

  let mut rows = Vec::with_capacity(dealers.len());
  for dealer in dealers {
    let available_balance =
      withdrawals.available_balance_for_admin_list(dealer.id).await?;
    rows.push(AdminDealerRow { dealer, available_balance });
  }
  Ok(Json(rows))
}

pub async fn request_withdrawal(
  State(app): State<Arc<AppState>>,
  Json(req): Json<WithdrawalReq>,
) -> Result<Json<withdrawal::Model>> {
  let request = sv::Withdrawal::new(&app.db)
    .request(
      req.dealer_id,
      req.amount,
      req.network,
      req.account_name,
      req.account_number,
      app.config.withdrawal.form_minimum,
    )
    .await?;
  Ok(Json(request))
}

pub async fn withdrawal_history(
  State(app): State<Arc<AppState>>,
  Path(dealer_id): Path<i64>,
) -> Result<Json<Vec<withdrawal::Model>>> {
  let history = sv::Withdrawal::new(&app.db).history(dealer_id).await?;
  Ok(Json(history))
}

pub async fn process_withdrawal(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<NotesReq>,
) -> Result<Json<withdrawal::Model>> {
  let request =
    sv::Withdrawal::new(&app.db).begin_processing(id, req.notes).await?;
  Ok(Json(request))
}

pub async fn pay_withdrawal(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<NotesReq>,
) -> Result<Json<withdrawal::Model>> {
  let request = sv::Withdrawal::new(&app.db).mark_paid(id, req.notes).await?;
  Ok(Json(request))
}

pub async fn reject_withdrawal(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<RejectReq>,
) -> Result<Json<withdrawal::Model>> {
  let request = sv::Withdrawal::new(&app.db).reject(id, req.notes).await?;
  Ok(Json(request))
}

pub async fn approve_withdrawal_legacy(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<NotesReq>,
) -> Result<Json<withdrawal::Model>> {
  let request = sv::Withdrawal::new(&app.db).approve(id, req.notes).await?;
  Ok(Json(request))
}

pub async fn reject_withdrawal_legacy(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<RejectReq>,
) -> Result<Json<withdrawal::Model>> {
  let request =
    sv::Withdrawal::new(&app.db).reject_with_refund(id, req.notes).await?;
  Ok(Json(request))
}
