use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("User not found")]
  UserNotFound,
  #[error("Order not found")]
  OrderNotFound,
  #[error("Withdrawal not found")]
  WithdrawalNotFound,
  #[error("Referrer not found")]
  ReferrerNotFound,
  #[error("Referrer is not an agent or dealer")]
  ReferrerNotEligible,
  #[error("Insufficient balance")]
  InsufficientBalance,
  #[error("Only dealers can request withdrawals")]
  WithdrawalNotAllowed,
  #[error("Minimum withdrawal amount is {}", crate::utils::format_amount(*minimum))]
  WithdrawalBelowMinimum { minimum: i64 },
  #[error("Withdrawal is not pending")]
  WithdrawalNotPending,
  #[error("Withdrawal is not ready for payout")]
  WithdrawalNotPayable,
  #[error("Only dealers can set shop prices")]
  DealerRequired,
  #[error("{0}")]
  InvalidArgs(String),
  #[error(transparent)]
  Db(#[from] sea_orm::DbErr),
  #[error("{0}")]
  Internal(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, msg) = match &self {
      Error::UserNotFound
      | Error::OrderNotFound
      | Error::WithdrawalNotFound
      | Error::ReferrerNotFound => (StatusCode::NOT_FOUND, self.to_string()),
      Error::Db(err) => {
        tracing::error!("database error: {err:?}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
      }
      Error::Internal(err) => {
        tracing::error!("internal error: {err}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
      }
      _ => (StatusCode::BAD_REQUEST, self.to_string()),
    };

    let body = json::json!({ "success": false, "msg": msg });
    (status, Json(body)).into_response()
  }
}
