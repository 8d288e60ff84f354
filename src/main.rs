mod config;
mod entity;
mod error;
mod handlers;
mod prelude;
mod state;
mod sv;
mod utils;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};
use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{config::Config, prelude::*, state::AppState};

#[tokio::main]
async fn main() {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "bundlepay=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env();
  let port = config.port;

  info!("Starting BundlePay v{}", env!("CARGO_PKG_VERSION"));

  let app_state = Arc::new(
    AppState::new(config).await.expect("Failed to initialise application"),
  );

  let governor_conf = Arc::new(
    GovernorConfigBuilder::default()
      .per_second(2)
      .burst_size(100)
      .finish()
      .expect("Failed to build rate limiter config"),
  );

  let governor_limiter = governor_conf.limiter().clone();

  tokio::spawn(async move {
    loop {
      tokio::time::sleep(Duration::from_secs(60)).await;
      governor_limiter.retain_recent();
    }
  });

  let app = Router::new()
    .route("/health", get(handlers::health))
    .route("/api/users", post(handlers::register))
    .route("/api/users/{id}/deposit", post(handlers::deposit))
    .route("/api/users/{id}/upgrade", post(handlers::upgrade))
    .route("/api/users/{id}/wallet", get(handlers::wallet))
    .route("/api/users/{id}/orders", get(handlers::user_orders))
    .route("/api/dealers/{id}/prices", post(handlers::set_price))
    .route("/api/dealers/{id}/orders", get(handlers::dealer_orders))
    .route("/api/dealers/{id}/balance", get(handlers::dealer_balance))
    .route("/api/dealers/{id}/dashboard", get(handlers::dealer_dashboard))
    .route("/api/orders", post(handlers::checkout))
    .route("/api/orders/{id}", get(handlers::order))
    .route("/api/orders/{id}/complete", post(handlers::complete_order))
    .route("/api/orders/{id}/cancel", post(handlers::cancel_order))
    .route("/api/withdrawals", post(handlers::request_withdrawal))
    .route("/api/withdrawals/{dealer_id}", get(handlers::withdrawal_history))
    .route("/api/admin/dealers", get(handlers::admin_dealers))
    .route(
      "/api/admin/withdrawals/{id}/process",
      post(handlers::process_withdrawal),
    )
    .route("/api/admin/withdrawals/{id}/pay", post(handlers::pay_withdrawal))
    .route(
      "/api/admin/withdrawals/{id}/reject",
      post(handlers::reject_withdrawal),
    )
    .route(
      "/api/admin/legacy/withdrawals/{id}/approve",
      post(handlers::approve_withdrawal_legacy),
    )
    .route(
      "/api/admin/legacy/withdrawals/{id}/reject",
      post(handlers::reject_withdrawal_legacy),
    )
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer::new(governor_conf))
        .layer(
          CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        ),
    )
    .with_state(app_state);

  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  info!("HTTP server listening on {}", addr);

  let listener =
    tokio::net::TcpListener::bind(addr).await.expect("Failed to bind");

  // The rate limiter keys on the peer address, so serve with connect info.
  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await
  .expect("Server error");
}
