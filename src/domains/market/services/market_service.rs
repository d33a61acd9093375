use crate::domains::market::models::Ticker;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;

/// 모의 시세 테이블 (심볼, 이름, 기준 가격, 24시간 거래량; 가격 단위는 USDT)
/// Mocked price table (symbol, name, base price, 24h volume; prices in USDT)
///
/// Decimal::new(mantissa, scale): 67_000_00 / 10^2 = 67000.00
const BASE_TICKERS: &[(&str, &str, i64, u32, i64)] = &[
    ("BTC", "Bitcoin", 67_000_00, 2, 1_250_000_000),
    ("ETH", "Ethereum", 3_500_00, 2, 640_000_000),
    ("SOL", "Solana", 150_00, 2, 210_000_000),
    ("XRP", "Ripple", 52, 2, 95_000_000),
    ("USDT", "Tether", 1_0000, 4, 2_100_000_000),
];

/// 마켓 서비스 (모의 시세 제공)
/// Market Service (serves mocked prices)
///
/// 역할:
/// - 고정 테이블 기반의 심볼별 시세 제공
/// - 요청마다 ±0.5% 범위의 무작위 변동을 적용해 살아있는 시세처럼 보이게 함
///
/// 주의: 외부 시세 피드 연동 없음 (거래 UI가 쓰는 모의 데이터)
/// Note: no external feed, just the mocked data the trading UI consumes
#[derive(Clone)]
pub struct MarketService;

impl MarketService {
    /// 생성자
    /// Constructor
    pub fn new() -> Self {
        Self
    }

    /// 전체 시세 조회
    /// Get all tickers
    pub fn get_tickers(&self) -> Vec<Ticker> {
        BASE_TICKERS
            .iter()
            .map(|(symbol, name, mantissa, scale, volume)| {
                Self::ticker_with_jitter(symbol, name, Decimal::new(*mantissa, *scale), *volume)
            })
            .collect()
    }

    /// 심볼로 시세 조회
    /// Get ticker by symbol
    pub fn get_ticker(&self, symbol: &str) -> Option<Ticker> {
        let wanted = symbol.trim().to_uppercase();

        BASE_TICKERS
            .iter()
            .find(|(symbol, _, _, _, _)| *symbol == wanted)
            .map(|(symbol, name, mantissa, scale, volume)| {
                Self::ticker_with_jitter(symbol, name, Decimal::new(*mantissa, *scale), *volume)
            })
    }

    /// 기준 가격에 ±0.5% (±50bps) 무작위 변동 적용
    /// Apply a random ±0.5% (±50bps) jitter to the base price
    fn ticker_with_jitter(symbol: &str, name: &str, base_price: Decimal, volume: i64) -> Ticker {
        let mut rng = rand::thread_rng();

        // Decimal::new(bps, 4): 50 -> 0.0050
        let jitter_bps: i64 = rng.gen_range(-50..=50);
        let price = base_price + base_price * Decimal::new(jitter_bps, 4);

        // 24시간 변동률도 모의값 (±5.00%)
        let change_bps: i64 = rng.gen_range(-500..=500);
        let change_24h = Decimal::new(change_bps, 2);

        Ticker {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change_24h,
            volume_24h: Decimal::new(volume, 0),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tickers_cover_the_whole_table() {
        let service = MarketService::new();
        let tickers = service.get_tickers();

        assert_eq!(tickers.len(), BASE_TICKERS.len());
        assert!(tickers.iter().any(|t| t.symbol == "BTC"));
    }

    #[test]
    fn test_jitter_stays_within_half_a_percent() {
        let service = MarketService::new();
        let base = dec!(67000.00);

        for _ in 0..100 {
            let ticker = service.get_ticker("BTC").unwrap();
            let deviation = (ticker.price - base).abs();
            assert!(
                deviation <= base * dec!(0.005),
                "price {} deviates more than 0.5% from {}",
                ticker.price,
                base
            );
            assert!(ticker.price > Decimal::ZERO);
        }
    }

    #[test]
    fn test_symbol_lookup_is_case_insensitive() {
        let service = MarketService::new();

        assert!(service.get_ticker("btc").is_some());
        assert!(service.get_ticker(" eth ").is_some());
        assert!(service.get_ticker("DOGE").is_none());
    }
}
