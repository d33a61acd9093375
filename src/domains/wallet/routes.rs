// Wallet domain routes
// 지갑 도메인 라우터
use axum::{
    routing::{get, post},
    Router,
};
use crate::shared::services::AppState;

use super::handlers;

/// 지갑 라우터 생성
/// Create wallet router
///
/// # Routes
/// - `POST /api/wallets` - 지갑 생성
/// - `GET  /api/wallets` - 내 지갑 목록
/// - `GET  /api/wallets/:id` - 지갑 조회
/// - `GET  /api/wallets/:id/transactions` - 지갑 트랜잭션 내역
pub fn create_wallet_router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_wallet).get(handlers::get_user_wallets))
        .route("/:wallet_id", get(handlers::get_wallet))
        .route("/:wallet_id/transactions", get(handlers::get_wallet_history))
}

/// 트랜잭션 라우터 생성
/// Create transaction router
///
/// # Routes
/// - `POST /api/transactions/deposit` - 입금 요청 (pending 생성)
/// - `POST /api/transactions/withdraw` - 출금 요청 (pending 생성)
/// - `POST /api/transactions/transfer` - 이체 (두 leg 원자적 완료)
/// - `GET  /api/transactions` - 내 트랜잭션 목록
/// - `GET  /api/transactions/:id` - 트랜잭션 단건 조회
pub fn create_transaction_router() -> Router<AppState> {
    Router::new()
        .route("/deposit", post(handlers::deposit))
        .route("/withdraw", post(handlers::withdraw))
        .route("/transfer", post(handlers::transfer))
        .route("/", get(handlers::get_my_transactions))
        .route("/:transaction_id", get(handlers::get_transaction))
}
