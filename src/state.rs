use anyhow::Context;

use crate::{config::Config, prelude::*};

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    let db = Database::connect(&config.database_url)
      .await
      .context("Failed to connect to database")?;

    migration::Migrator::up(&db, None)
      .await
      .context("Failed to run migrations")?;

    info!("Database ready at {}", config.database_url);
    Ok(Self { db, config })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::{UserRole, user};

  #[tokio::test]
  async fn migrations_bootstrap_a_fresh_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundlepay.db");
    let config = Config {
      database_url: format!("sqlite:{}?mode=rwc", path.display()),
      ..Config::default()
    };

    let state = AppState::new(config).await.unwrap();

    let user = user::ActiveModel {
      id: NotSet,
      name: Set("Ama Mensah".into()),
      phone: Set("+233200000001".into()),
      role: Set(UserRole::Customer),
      balance: Set(0),
      referred_by: Set(None),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&state.db)
    .await
    .unwrap();

    assert_eq!(user.role, UserRole::Customer);
    assert_eq!(user.balance, 0);
  }
}
