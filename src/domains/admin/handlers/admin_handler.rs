// Admin Handler
// 관리자 핸들러
// 역할: 관리자 대시보드 API 엔드포인트 처리 (AdminUser extractor로 보호됨)

use crate::shared::services::AppState;
use crate::shared::middleware::auth::AdminUser;
use crate::shared::errors::{AuthError, LedgerError};
use crate::domains::admin::models::{
    AdminTransactionsQuery, UpdateTransactionStatusRequest, UpdateWalletStatusRequest,
    UsersResponse,
};
use crate::domains::wallet::models::transaction::{TransactionResponse, TransactionsResponse};
use crate::domains::wallet::models::wallet::WalletResponse;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// 전체 사용자 목록 조회 핸들러
/// List all users handler
///
/// 경로: GET /api/admin/users
/// 인증: 필요 (관리자 JWT 토큰)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of rows (default: 100)"),
        ("offset" = Option<i64>, Query, description = "Number of rows to skip (default: 0)")
    ),
    responses(
        (status = 200, description = "Users retrieved successfully", body = UsersResponse),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin",
    security(("BearerAuth" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<crate::domains::wallet::models::transaction::HistoryQuery>,
) -> Result<Json<UsersResponse>, (StatusCode, Json<serde_json::Value>)> {
    let users = app_state
        .auth_state
        .auth_service
        .list_users(query.limit, query.offset)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// 전체 트랜잭션 목록 조회 핸들러 (상태 필터 지원)
/// List all transactions handler (optional status filter)
///
/// 경로: GET /api/admin/transactions
/// 인증: 필요 (관리자 JWT 토큰)
#[utoipa::path(
    get,
    path = "/api/admin/transactions",
    params(AdminTransactionsQuery),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = TransactionsResponse),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin",
    security(("BearerAuth" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AdminTransactionsQuery>,
) -> Result<Json<TransactionsResponse>, (StatusCode, Json<serde_json::Value>)> {
    let transactions = app_state
        .wallet_state
        .transaction_service
        .list_all_transactions(query.status, query.limit, query.offset)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionsResponse { transactions }))
}

/// 트랜잭션 상태 갱신 핸들러 (상태 갱신 경계)
/// Transaction status update handler (the status-update boundary)
///
/// 경로: PUT /api/admin/transactions/{transaction_id}/status
/// 인증: 필요 (관리자 JWT 토큰)
///
/// pending -> completed 전이만 원장을 적용하고 갱신된 지갑 스냅샷을 반환함.
/// 종료 상태에서의 전이 시도는 409로 거부되고 잔고는 변하지 않음.
/// Only pending -> completed applies the ledger and returns the updated wallet
/// snapshot. Transitions out of a terminal state are rejected with 409 and
/// balances stay untouched.
#[utoipa::path(
    put,
    path = "/api/admin/transactions/{transaction_id}/status",
    params(
        ("transaction_id" = u64, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = TransactionResponse),
        (status = 404, description = "Transaction not found"),
        (status = 409, description = "Invalid state transition or wallet not active"),
        (status = 422, description = "Insufficient funds (transaction forced to failed)"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin",
    security(("BearerAuth" = []))
)]
pub async fn update_transaction_status(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(transaction_id): Path<u64>,
    Json(request): Json<UpdateTransactionStatusRequest>,
) -> Result<Json<TransactionResponse>, (StatusCode, Json<serde_json::Value>)> {
    let outcome = app_state
        .wallet_state
        .transaction_service
        .update_status(transaction_id, request.status, request.reason)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionResponse {
        transaction: outcome.transaction,
        wallet: outcome.wallet,
        message: "Transaction status updated".to_string(),
    }))
}

/// 지갑 상태 갱신 핸들러 (freeze/unfreeze/soft-close)
/// Wallet status update handler (freeze/unfreeze/soft-close)
///
/// 경로: PUT /api/admin/wallets/{wallet_id}/status
/// 인증: 필요 (관리자 JWT 토큰)
#[utoipa::path(
    put,
    path = "/api/admin/wallets/{wallet_id}/status",
    params(
        ("wallet_id" = u64, Path, description = "Wallet ID")
    ),
    request_body = UpdateWalletStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = WalletResponse),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Invalid state transition (e.g., reopening a closed wallet)"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin",
    security(("BearerAuth" = []))
)]
pub async fn update_wallet_status(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(wallet_id): Path<u64>,
    Json(request): Json<UpdateWalletStatusRequest>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .update_wallet_status(wallet_id, request.status)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(WalletResponse { wallet }))
}
