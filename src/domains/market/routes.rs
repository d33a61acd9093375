// Market domain routes
// 마켓 도메인 라우터
use axum::{
    routing::{get, post},
    Router,
};
use crate::shared::services::AppState;

use super::handlers;

/// 마켓 라우터 생성
/// Create market router
///
/// # Routes
/// - `GET  /api/market/tickers` - 전체 시세 (모의 데이터)
/// - `GET  /api/market/tickers/:symbol` - 심볼별 시세
/// - `POST /api/market/trade` - 매수/매도 (단일 credit leg 기록)
pub fn create_market_router() -> Router<AppState> {
    Router::new()
        .route("/tickers", get(handlers::get_tickers))
        .route("/tickers/:symbol", get(handlers::get_ticker))
        .route("/trade", post(handlers::place_trade))
}
