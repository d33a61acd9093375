use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domains::wallet::models::transaction::Transaction;
use crate::domains::wallet::models::wallet::{Wallet, WalletType};

// =====================================================
// 시세 모델 (Ticker)
// =====================================================
/// 심볼별 시세 (모의 데이터)
/// Per-symbol ticker (mocked data)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(as = Ticker)]
pub struct Ticker {
    /// Symbol (base currency)
    /// 심볼 (기준 자산)
    #[schema(example = "BTC")]
    pub symbol: String,

    /// Display name
    /// 표시 이름
    #[schema(example = "Bitcoin")]
    pub name: String,

    /// Last price (in USDT)
    /// 최근 가격 (USDT 기준)
    #[schema(value_type = String, example = "67000.0")]
    pub price: Decimal,

    /// 24h change (percent)
    /// 24시간 변동률 (퍼센트)
    #[schema(value_type = String, example = "-1.25")]
    pub change_24h: Decimal,

    /// 24h volume (in USDT)
    /// 24시간 거래량 (USDT 기준)
    #[schema(value_type = String, example = "1250000.0")]
    pub volume_24h: Decimal,

    /// 시세 생성 시각
    /// When this ticker was produced
    pub updated_at: DateTime<Utc>,
}

/// 시세 목록 응답 모델
/// Tickers list response model
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TickersResponse)]
pub struct TickersResponse {
    /// List of tickers
    /// 시세 목록
    pub tickers: Vec<Ticker>,
}

/// 단일 시세 응답 모델
/// Single ticker response model
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TickerResponse)]
pub struct TickerResponse {
    /// Ticker information
    /// 시세 정보
    pub ticker: Ticker,
}

// =====================================================
// 매수/매도 (Trade)
// =====================================================
/// 매수/매도 방향
/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// 매수/매도 요청 모델
/// Trade request model
///
/// 가격은 클라이언트가 보는 모의 시세를 그대로 사용 (주문 매칭 없음)
/// Uses the client-side mocked price as-is (no order matching)
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = TradeRequest)]
pub struct TradeRequest {
    /// Symbol (base currency)
    /// 심볼 (기준 자산)
    #[schema(example = "BTC")]
    pub symbol: String,

    /// Trade side: 'buy' or 'sell'
    /// 방향: 'buy' (매수) 또는 'sell' (매도)
    pub side: TradeSide,

    /// Amount (in base currency)
    /// 수량 (기준 자산 기준)
    #[schema(value_type = String, example = "0.5")]
    pub amount: Decimal,

    /// Price (in USDT per base unit)
    /// 가격 (기준 자산당 USDT)
    #[schema(value_type = String, example = "67000.0")]
    pub price: Decimal,

    /// Fee (credit 자산 기준, 기본값: 0)
    /// Fee (in the credited asset, default: 0)
    #[schema(value_type = Option<String>, example = "0.001")]
    pub fee: Option<Decimal>,

    /// Wallet type (기본값: spot)
    /// Wallet type (default: spot)
    pub wallet_type: Option<WalletType>,
}

/// 매수/매도 응답 모델
/// Trade response model
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TradeResponse)]
pub struct TradeResponse {
    /// 기록된 trade 트랜잭션
    /// The booked trade transaction
    pub transaction: Transaction,

    /// 갱신된 지갑
    /// Updated wallet
    pub wallet: Wallet,

    /// Message
    /// 메시지
    pub message: String,
}
