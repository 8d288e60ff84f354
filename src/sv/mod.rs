pub mod commission;
pub mod order;
pub mod referral;
#[cfg(test)]
pub mod test_utils;
pub mod user;
pub mod validation;
pub mod wallet;
pub mod withdrawal;

pub use commission::Commission;
pub use order::Order;
pub use referral::Referral;
pub use user::User;
pub use validation::Validation;
pub use wallet::Wallet;
pub use withdrawal::Withdrawal;
