use crate::shared::database::{Database, TransactionRepository, WalletRepository};
use crate::domains::wallet::models::transaction::Transaction;
use crate::domains::wallet::models::wallet::{CreateWalletRequest, Wallet, WalletCreate, WalletStatus, WalletType};
use crate::shared::errors::LedgerError;
use chrono::Utc;

/// 지갑 서비스
/// Wallet Service
///
/// 역할:
/// - 지갑 생성 및 조회 (id, (사용자, 통화, 타입), 사용자별 목록)
/// - 지갑별 트랜잭션 내역 조회 (최신순, 페이지네이션)
/// - 지갑 상태 변경 (freeze/unfreeze/soft-close)
///
/// 주의:
/// - 잔고 변경은 이 서비스가 하지 않음 (TransactionService의 원장 적용 경로가 담당)
/// - Balance mutation is not done here (the ledger path in TransactionService owns it)
#[derive(Clone)]
pub struct WalletService {
    db: Database,
}

impl WalletService {
    /// 생성자
    /// Constructor
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 지갑 생성 (명시적 생성 호출)
    /// Create wallet (explicit creation call)
    ///
    /// 같은 (통화, 타입) 지갑이 이미 있으면 거부
    /// Rejected if a wallet for the same (currency, type) already exists
    pub async fn create_wallet(
        &self,
        user_id: u64,
        request: CreateWalletRequest,
    ) -> Result<Wallet, LedgerError> {
        let currency = normalize_currency(&request.currency)?;
        let wallet_type = request.wallet_type.unwrap_or(WalletType::Spot);

        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        // 중복 확인
        // Check for an existing wallet
        let existing = wallet_repo
            .get_by_user_currency_type(user_id, &currency, wallet_type)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to check existing wallet: {}", e)))?;

        if existing.is_some() {
            return Err(LedgerError::WalletAlreadyExists {
                currency,
                wallet_type: wallet_type.as_str().to_string(),
            });
        }

        wallet_repo
            .create(&WalletCreate {
                user_id,
                currency,
                wallet_type,
            })
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to create wallet: {}", e)))
    }

    /// 지갑 조회 (소유자 확인 포함)
    /// Get wallet (with ownership check)
    pub async fn get_wallet(&self, user_id: u64, wallet_id: u64) -> Result<Wallet, LedgerError> {
        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        let wallet = wallet_repo
            .get_by_id(wallet_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
            .ok_or(LedgerError::WalletNotFound { id: wallet_id })?;

        if wallet.user_id != user_id {
            return Err(LedgerError::NotWalletOwner { wallet_id });
        }

        Ok(wallet)
    }

    /// 사용자의 모든 지갑 조회
    /// Get all wallets for a user
    pub async fn get_user_wallets(&self, user_id: u64) -> Result<Vec<Wallet>, LedgerError> {
        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        wallet_repo
            .get_all_by_user(user_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch user wallets: {}", e)))
    }

    /// 지갑 트랜잭션 내역 조회 (최신순)
    /// Get wallet transaction history (newest first)
    pub async fn get_wallet_history(
        &self,
        user_id: u64,
        wallet_id: u64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        // 소유자 확인 (존재하지 않으면 WalletNotFound)
        // Ownership check (WalletNotFound if missing)
        self.get_wallet(user_id, wallet_id).await?;

        let transaction_repo = TransactionRepository::new(self.db.pool().clone());

        transaction_repo
            .get_all_by_wallet(wallet_id, limit, offset)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch wallet history: {}", e)))
    }

    /// 지갑 상태 변경 (freeze/unfreeze/close; 관리자 동작)
    /// Update wallet status (freeze/unfreeze/close; admin action)
    ///
    /// close는 soft-close: closed_at만 기록하고 row는 유지
    /// Close is a soft-close: records closed_at, the row stays
    pub async fn update_wallet_status(
        &self,
        wallet_id: u64,
        target: WalletStatus,
    ) -> Result<Wallet, LedgerError> {
        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        let wallet = wallet_repo
            .get_by_id(wallet_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
            .ok_or(LedgerError::WalletNotFound { id: wallet_id })?;

        if !wallet.status.can_transition_to(target) {
            return Err(LedgerError::InvalidStateTransition {
                from: wallet.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }

        let closed_at = match target {
            WalletStatus::Closed => Some(Utc::now()),
            _ => wallet.closed_at,
        };

        wallet_repo
            .update_status(wallet_id, target, closed_at)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to update wallet status: {}", e)))
    }
}

/// 통화 코드 정규화 (공백 제거 + 대문자)
/// Normalize a currency code (trim + uppercase)
pub(crate) fn normalize_currency(currency: &str) -> Result<String, LedgerError> {
    let normalized = currency.trim().to_uppercase();

    if normalized.is_empty() || normalized.len() > 16 {
        return Err(LedgerError::InvalidCurrency(format!("{:?}", currency)));
    }

    Ok(normalized)
}
