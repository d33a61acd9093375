// Market Handler
// 마켓 핸들러
// 역할: 모의 시세 조회와 매수/매도 API 엔드포인트 처리

use crate::shared::services::AppState;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::errors::LedgerError;
use crate::domains::market::models::{
    TickerResponse, TickersResponse, TradeRequest, TradeResponse, TradeSide,
};
use crate::domains::wallet::models::wallet::WalletType;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;

/// 매도 대금이 입금되는 기준 통화
/// The quote currency sell proceeds are credited in
const QUOTE_CURRENCY: &str = "USDT";

/// 전체 시세 조회 핸들러
/// Get all tickers handler
///
/// 경로: GET /api/market/tickers
/// 인증: 불필요 (공개 시세)
#[utoipa::path(
    get,
    path = "/api/market/tickers",
    responses(
        (status = 200, description = "Tickers retrieved successfully", body = TickersResponse)
    ),
    tag = "Market"
)]
pub async fn get_tickers(
    State(app_state): State<AppState>,
) -> Json<TickersResponse> {
    let tickers = app_state.market_state.market_service.get_tickers();

    Json(TickersResponse { tickers })
}

/// 심볼별 시세 조회 핸들러
/// Get ticker by symbol handler
///
/// 경로: GET /api/market/tickers/{symbol}
/// 인증: 불필요 (공개 시세)
#[utoipa::path(
    get,
    path = "/api/market/tickers/{symbol}",
    params(
        ("symbol" = String, Path, description = "Symbol (e.g., 'BTC')")
    ),
    responses(
        (status = 200, description = "Ticker retrieved successfully", body = TickerResponse),
        (status = 404, description = "Unknown symbol")
    ),
    tag = "Market"
)]
pub async fn get_ticker(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<TickerResponse>, (StatusCode, Json<serde_json::Value>)> {
    let ticker = app_state
        .market_state
        .market_service
        .get_ticker(&symbol)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": format!("Unknown symbol: {}", symbol)
                })),
            )
        })?;

    Ok(Json(TickerResponse { ticker }))
}

/// 매수/매도 핸들러
/// Buy/sell handler
///
/// 경로: POST /api/market/trade
/// 인증: 필요 (JWT 토큰)
///
/// 체결은 단일 credit leg로만 기록됨:
/// - buy: 기준 자산 지갑에 수량만큼 credit
/// - sell: USDT 지갑에 대금(수량 * 가격)만큼 credit
/// 반대 자산의 debit leg는 기록하지 않음
/// The fill is booked as a single credit leg:
/// - buy credits the base-asset wallet with the amount
/// - sell credits the USDT wallet with the proceeds (amount * price)
/// The counter-asset debit leg is not recorded
#[utoipa::path(
    post,
    path = "/api/market/trade",
    request_body = TradeRequest,
    responses(
        (status = 200, description = "Trade booked", body = TradeResponse),
        (status = 400, description = "Invalid amount, price or symbol"),
        (status = 409, description = "Wallet is frozen or closed"),
        (status = 422, description = "Insufficient funds"),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Market",
    security(("BearerAuth" = []))
)]
pub async fn place_trade(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeResponse>, (StatusCode, Json<serde_json::Value>)> {
    if request.price <= Decimal::ZERO {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("price must be positive, got {}", request.price)
            })),
        ));
    }

    // 알려진 심볼만 거래 가능
    // Only known symbols are tradable
    if app_state
        .market_state
        .market_service
        .get_ticker(&request.symbol)
        .is_none()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("Unknown symbol: {}", request.symbol)
            })),
        ));
    }

    let fee = request.fee.unwrap_or(Decimal::ZERO);
    let wallet_type = request.wallet_type.unwrap_or(WalletType::Spot);

    // 방향에 따라 credit 대상 통화와 수량 결정
    // Pick the credited currency and amount by side
    let (currency, amount) = match request.side {
        TradeSide::Buy => (request.symbol.clone(), request.amount),
        TradeSide::Sell => (QUOTE_CURRENCY.to_string(), request.amount * request.price),
    };

    let (transaction, wallet) = app_state
        .wallet_state
        .transaction_service
        .execute_trade(authenticated_user.user_id, &currency, wallet_type, amount, fee)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TradeResponse {
        transaction,
        wallet,
        message: "Trade booked".to_string(),
    }))
}
