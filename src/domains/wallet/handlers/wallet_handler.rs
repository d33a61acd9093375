// Wallet Handler
// 지갑 핸들러
// 역할: 지갑 생성/조회/내역 API 엔드포인트 처리

use crate::shared::services::AppState;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::errors::LedgerError;
use crate::domains::wallet::models::transaction::{HistoryQuery, TransactionsResponse};
use crate::domains::wallet::models::wallet::{CreateWalletRequest, WalletResponse, WalletsResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// 지갑 생성 핸들러
/// Create wallet handler
///
/// 경로: POST /api/wallets
/// 인증: 필요 (JWT 토큰)
#[utoipa::path(
    post,
    path = "/api/wallets",
    request_body = CreateWalletRequest,
    responses(
        (status = 200, description = "Wallet created successfully", body = WalletResponse),
        (status = 400, description = "Wallet already exists or invalid currency"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets",
    security(("BearerAuth" = []))
)]
pub async fn create_wallet(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<CreateWalletRequest>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .create_wallet(authenticated_user.user_id, request)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(WalletResponse { wallet }))
}

/// 내 지갑 목록 조회 핸들러
/// Get my wallets handler
///
/// 경로: GET /api/wallets
/// 인증: 필요 (JWT 토큰)
#[utoipa::path(
    get,
    path = "/api/wallets",
    responses(
        (status = 200, description = "Wallets retrieved successfully", body = WalletsResponse),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets",
    security(("BearerAuth" = []))
)]
pub async fn get_user_wallets(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<WalletsResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallets = app_state
        .wallet_state
        .wallet_service
        .get_user_wallets(authenticated_user.user_id)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(WalletsResponse { wallets }))
}

/// 지갑 조회 핸들러
/// Get wallet handler
///
/// 경로: GET /api/wallets/{wallet_id}
/// 인증: 필요 (JWT 토큰, 소유자만)
#[utoipa::path(
    get,
    path = "/api/wallets/{wallet_id}",
    params(
        ("wallet_id" = u64, Path, description = "Wallet ID")
    ),
    responses(
        (status = 200, description = "Wallet retrieved successfully", body = WalletResponse),
        (status = 403, description = "Not the wallet owner"),
        (status = 404, description = "Wallet not found"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets",
    security(("BearerAuth" = []))
)]
pub async fn get_wallet(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(wallet_id): Path<u64>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .get_wallet(authenticated_user.user_id, wallet_id)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(WalletResponse { wallet }))
}

/// 지갑 트랜잭션 내역 조회 핸들러 (최신순, 페이지네이션)
/// Get wallet transaction history handler (newest first, paginated)
///
/// 경로: GET /api/wallets/{wallet_id}/transactions
/// 인증: 필요 (JWT 토큰, 소유자만)
#[utoipa::path(
    get,
    path = "/api/wallets/{wallet_id}/transactions",
    params(
        ("wallet_id" = u64, Path, description = "Wallet ID"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "History retrieved successfully", body = TransactionsResponse),
        (status = 403, description = "Not the wallet owner"),
        (status = 404, description = "Wallet not found"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets",
    security(("BearerAuth" = []))
)]
pub async fn get_wallet_history(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(wallet_id): Path<u64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<TransactionsResponse>, (StatusCode, Json<serde_json::Value>)> {
    let transactions = app_state
        .wallet_state
        .wallet_service
        .get_wallet_history(authenticated_user.user_id, wallet_id, query.limit, query.offset)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionsResponse { transactions }))
}
