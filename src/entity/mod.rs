pub mod commission;
pub mod order;
pub mod order_item;
pub mod referral_commission;
pub mod shop_price;
pub mod user;
pub mod wallet_transaction;
pub mod withdrawal;

pub use commission::CommissionStatus;
pub use order::OrderStatus;
pub use referral_commission::ReferralType;
pub use user::UserRole;
pub use wallet_transaction::WalletTxType;
pub use withdrawal::{Network, WithdrawalStatus};
