// Market domain state
// 마켓 도메인 상태
use crate::domains::market::services::MarketService;

/// Market domain state
/// 마켓 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct MarketState {
    pub market_service: MarketService,
}

impl MarketState {
    /// Create MarketState
    /// MarketState 생성 (DB 불필요, 시세는 프로세스 내 모의 데이터)
    pub fn new() -> Self {
        Self {
            market_service: MarketService::new(),
        }
    }
}
