use std::env;

use crate::sv::wallet::PESEWAS;

/// Knobs for commission creation and release.
#[derive(Debug, Clone)]
pub struct CommissionConfig {
  /// Percent of a dealer commission granted to the dealer's referrer.
  pub referral_rate_percent: i64,
  /// Days a released commission stays inside the refund window.
  pub refund_window_days: i64,
  /// One-time fee charged when a customer upgrades to dealer.
  pub dealer_upgrade_fee: i64,
  /// Bonus credited to the referrer of a freshly upgraded dealer.
  pub agent_upgrade_bonus: i64,
}

impl Default for CommissionConfig {
  fn default() -> Self {
    Self {
      referral_rate_percent: 10,
      refund_window_days: 7,
      dealer_upgrade_fee: 60 * PESEWAS,
      agent_upgrade_bonus: 20 * PESEWAS,
    }
  }
}

/// Minimum withdrawal amounts per surface. The surfaces intentionally
/// disagree with each other; see the dealer dashboard vs the request form.
#[derive(Debug, Clone)]
pub struct WithdrawalLimits {
  pub page_minimum: i64,
  pub form_minimum: i64,
  pub dashboard_minimum: i64,
}

impl Default for WithdrawalLimits {
  fn default() -> Self {
    Self {
      page_minimum: 50 * PESEWAS,
      form_minimum: 100 * PESEWAS,
      dashboard_minimum: 200 * PESEWAS,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  pub commission: CommissionConfig,
  pub withdrawal: WithdrawalLimits,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: "sqlite:bundlepay.db?mode=rwc".into(),
      port: 3000,
      commission: CommissionConfig::default(),
      withdrawal: WithdrawalLimits::default(),
    }
  }
}

impl Config {
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      database_url: env::var("DATABASE_URL")
        .unwrap_or(defaults.database_url),
      port: env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults.port),
      commission: CommissionConfig {
        referral_rate_percent: env_i64(
          "REFERRAL_RATE_PERCENT",
          defaults.commission.referral_rate_percent,
        ),
        refund_window_days: env_i64(
          "REFUND_WINDOW_DAYS",
          defaults.commission.refund_window_days,
        ),
        dealer_upgrade_fee: env_i64(
          "DEALER_UPGRADE_FEE",
          defaults.commission.dealer_upgrade_fee,
        ),
        agent_upgrade_bonus: env_i64(
          "AGENT_UPGRADE_BONUS",
          defaults.commission.agent_upgrade_bonus,
        ),
      },
      withdrawal: defaults.withdrawal,
    }
  }
}

fn env_i64(key: &str, default: i64) -> i64 {
  env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
