use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 지갑/원장 관련 에러
/// Wallet/ledger-related errors
#[derive(Error, Debug, PartialEq)]
pub enum LedgerError {
    /// 허용되지 않는 상태 전이 (종료 상태에서의 전이 포함)
    /// Illegal status change (including any transition out of a terminal state)
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    /// 출금이 잔고를 음수로 만들거나 available > balance를 만들게 됨
    /// The debit would drive a balance negative or leave available above balance
    #[error("Insufficient funds in wallet {wallet_id}: {details}")]
    InsufficientFunds { wallet_id: u64, details: String },

    /// frozen/closed 지갑에 대한 잔고 변경 시도
    /// Balance mutation attempted on a frozen/closed wallet
    #[error("Wallet {wallet_id} is not active (status: {status})")]
    WalletNotActive { wallet_id: u64, status: String },

    /// 트랜잭션 통화와 지갑 통화 불일치
    /// Transaction currency differs from the wallet currency
    #[error("Currency mismatch: wallet holds {wallet_currency}, transaction is in {transaction_currency}")]
    CurrencyMismatch {
        wallet_currency: String,
        transaction_currency: String,
    },

    /// 멱등성 가드를 지나 재적용이 감지됨 (도달 불가능해야 하며, error 레벨로 로깅됨)
    /// Re-application detected despite the idempotency guard (expected unreachable; logged at error level)
    #[error("Transaction {transaction_id} has already been applied to a wallet")]
    DuplicateApplication { transaction_id: u64 },

    /// 지갑을 찾을 수 없음
    /// Wallet not found
    #[error("Wallet not found: id={id}")]
    WalletNotFound { id: u64 },

    /// 트랜잭션을 찾을 수 없음
    /// Transaction not found
    #[error("Transaction not found: id={id}")]
    TransactionNotFound { id: u64 },

    /// 같은 (통화, 타입) 지갑이 이미 존재함
    /// A wallet for the same (currency, type) already exists
    #[error("Wallet already exists for {currency} ({wallet_type})")]
    WalletAlreadyExists { currency: String, wallet_type: String },

    /// 다른 사용자의 지갑에 접근
    /// Access to another user's wallet
    #[error("Wallet {wallet_id} does not belong to the authenticated user")]
    NotWalletOwner { wallet_id: u64 },

    /// 요청 금액/수수료가 유효하지 않음
    /// Invalid request amount/fee
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// 통화 코드가 유효하지 않음
    /// Invalid currency code
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// LedgerError를 HTTP 응답으로 변환
impl From<LedgerError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: LedgerError) -> Self {
        let (status, message) = match &err {
            LedgerError::InvalidStateTransition { .. } => {
                (StatusCode::CONFLICT, err.to_string())
            }
            LedgerError::InsufficientFunds { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            LedgerError::WalletNotActive { .. } => {
                (StatusCode::CONFLICT, err.to_string())
            }
            LedgerError::CurrencyMismatch { .. } => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            LedgerError::DuplicateApplication { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            LedgerError::WalletNotFound { .. } => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            LedgerError::TransactionNotFound { .. } => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            LedgerError::WalletAlreadyExists { .. } => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            LedgerError::NotWalletOwner { .. } => {
                (StatusCode::FORBIDDEN, err.to_string())
            }
            LedgerError::InvalidAmount(_) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            LedgerError::InvalidCurrency(_) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            LedgerError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(json!({ "error": message })))
    }
}
