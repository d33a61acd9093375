// Admin domain routes
// 관리자 도메인 라우터
use axum::{
    routing::{get, put},
    Router,
};
use crate::shared::services::AppState;

use super::handlers;

/// 관리자 라우터 생성
/// Create admin router
///
/// # Routes
/// - `GET /api/admin/users` - 전체 사용자 목록
/// - `GET /api/admin/transactions` - 전체 트랜잭션 목록 (상태 필터)
/// - `PUT /api/admin/transactions/:id/status` - 트랜잭션 상태 갱신 (원장 적용 경계)
/// - `PUT /api/admin/wallets/:id/status` - 지갑 동결/해제/폐쇄
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/transactions", get(handlers::list_transactions))
        .route("/transactions/:transaction_id/status", put(handlers::update_transaction_status))
        .route("/wallets/:wallet_id/status", put(handlers::update_wallet_status))
}
