use crate::shared::database::Database;
use crate::domains::auth::services::state::AuthState;
use crate::domains::auth::services::JwtService;
use crate::domains::market::services::state::MarketState;
use crate::domains::wallet::services::state::WalletState;
use anyhow::Result;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub auth_state: AuthState,
    pub wallet_state: WalletState,
    pub market_state: MarketState,
}

impl AppState {
    /// Create AppState with database
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(db: Database) -> Result<Self> {
        // 1. 공유 서비스 생성 (JWT 등)
        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string());
        let jwt_service = JwtService::new(jwt_secret);

        // 2. 각 도메인 State 생성
        let auth_state = AuthState::new(db.clone(), jwt_service);
        let wallet_state = WalletState::new(db.clone());
        let market_state = MarketState::new();

        // 3. AppState 조합
        Ok(Self {
            db,
            auth_state,
            wallet_state,
            market_state,
        })
    }
}
