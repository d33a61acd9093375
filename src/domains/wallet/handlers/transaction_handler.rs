// Transaction Handler
// 트랜잭션 핸들러
// 역할: 입금/출금/이체/내역 API 엔드포인트 처리
//
// 입금과 출금은 pending으로 생성되고, 상태 갱신 경계(관리자 액션)를 통해
// completed/failed/cancelled로 전이됨. 이체는 두 leg가 원자적으로 즉시 완료됨.
// Deposits and withdrawals are created pending and move through the
// status-update boundary (admin action). Transfers complete both legs
// atomically right away.

use crate::shared::services::AppState;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::errors::LedgerError;
use crate::domains::wallet::models::transaction::{
    DepositRequest, HistoryQuery, TransactionResponse, TransactionsResponse, TransferRequest,
    TransferResponse, WithdrawRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// 입금 요청 핸들러
/// Deposit request handler
///
/// 경로: POST /api/transactions/deposit
/// 인증: 필요 (JWT 토큰)
#[utoipa::path(
    post,
    path = "/api/transactions/deposit",
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Deposit created (pending)", body = TransactionResponse),
        (status = 400, description = "Invalid amount or currency"),
        (status = 409, description = "Wallet is frozen or closed"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Transactions",
    security(("BearerAuth" = []))
)]
pub async fn deposit(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<DepositRequest>,
) -> Result<Json<TransactionResponse>, (StatusCode, Json<serde_json::Value>)> {
    let transaction = app_state
        .wallet_state
        .transaction_service
        .deposit(authenticated_user.user_id, request)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionResponse {
        transaction,
        wallet: None,
        message: "Deposit created, awaiting confirmation".to_string(),
    }))
}

/// 출금 요청 핸들러
/// Withdrawal request handler
///
/// 경로: POST /api/transactions/withdraw
/// 인증: 필요 (JWT 토큰, 지갑 소유자만)
#[utoipa::path(
    post,
    path = "/api/transactions/withdraw",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal created (pending)", body = TransactionResponse),
        (status = 400, description = "Invalid amount"),
        (status = 403, description = "Not the wallet owner"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Wallet is frozen or closed"),
        (status = 422, description = "Insufficient funds"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Transactions",
    security(("BearerAuth" = []))
)]
pub async fn withdraw(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<TransactionResponse>, (StatusCode, Json<serde_json::Value>)> {
    let transaction = app_state
        .wallet_state
        .transaction_service
        .withdraw(authenticated_user.user_id, request)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionResponse {
        transaction,
        wallet: None,
        message: "Withdrawal created, awaiting confirmation".to_string(),
    }))
}

/// 이체 요청 핸들러 (두 leg가 함께 커밋되거나 함께 롤백됨)
/// Transfer request handler (both legs commit or roll back together)
///
/// 경로: POST /api/transactions/transfer
/// 인증: 필요 (JWT 토큰, 출발 지갑 소유자만)
#[utoipa::path(
    post,
    path = "/api/transactions/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed", body = TransferResponse),
        (status = 400, description = "Invalid amount or currency mismatch"),
        (status = 403, description = "Not the source wallet owner"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "A wallet is frozen or closed"),
        (status = 422, description = "Insufficient funds"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Transactions",
    security(("BearerAuth" = []))
)]
pub async fn transfer(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, (StatusCode, Json<serde_json::Value>)> {
    let outcome = app_state
        .wallet_state
        .transaction_service
        .transfer(authenticated_user.user_id, request)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransferResponse {
        debit: outcome.debit,
        credit: outcome.credit,
        source_wallet: outcome.source_wallet,
        destination_wallet: outcome.destination_wallet,
        message: "Transfer completed".to_string(),
    }))
}

/// 내 트랜잭션 목록 조회 핸들러 (최신순, 페이지네이션)
/// Get my transactions handler (newest first, paginated)
///
/// 경로: GET /api/transactions
/// 인증: 필요 (JWT 토큰)
#[utoipa::path(
    get,
    path = "/api/transactions",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = TransactionsResponse),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Transactions",
    security(("BearerAuth" = []))
)]
pub async fn get_my_transactions(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<TransactionsResponse>, (StatusCode, Json<serde_json::Value>)> {
    let transactions = app_state
        .wallet_state
        .transaction_service
        .list_user_transactions(authenticated_user.user_id, query.limit, query.offset)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionsResponse { transactions }))
}

/// 트랜잭션 단건 조회 핸들러
/// Get single transaction handler
///
/// 경로: GET /api/transactions/{transaction_id}
/// 인증: 필요 (JWT 토큰, 소유자만)
#[utoipa::path(
    get,
    path = "/api/transactions/{transaction_id}",
    params(
        ("transaction_id" = u64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = TransactionResponse),
        (status = 403, description = "Not the transaction owner"),
        (status = 404, description = "Transaction not found"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Transactions",
    security(("BearerAuth" = []))
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(transaction_id): Path<u64>,
) -> Result<Json<TransactionResponse>, (StatusCode, Json<serde_json::Value>)> {
    let transaction = app_state
        .wallet_state
        .transaction_service
        .get_transaction(authenticated_user.user_id, transaction_id)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionResponse {
        transaction,
        wallet: None,
        message: "Transaction retrieved".to_string(),
    }))
}
