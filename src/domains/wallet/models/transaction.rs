use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::wallet::{Wallet, WalletType};
use super::{deserialize_string_to_u64, serialize_u64_as_string};

// =====================================================
// Transaction 모델
// =====================================================
// 역할: 잔고에 영향을 주는 이벤트의 기록
// 설명: 완료되면 변경 불가 (immutable-once-completed)
//
// 타입과 방향:
// - deposit, trade: credit (잔고 증가)
// - withdrawal, fee: debit (잔고 감소)
// - transfer: 출발 지갑에 debit leg, 도착 지갑에 credit leg (row 2개)
//
// 상태 기계:
// - pending -> completed | failed | cancelled
// - completed/failed/cancelled는 종료 상태 (어떤 전이도 불가)
// - processed_at은 completed 진입 시 정확히 한 번 기록됨
// =====================================================

/// 트랜잭션 타입
/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// 입금 (credit)
    /// Deposit (credit)
    Deposit,
    /// 출금 (debit)
    /// Withdrawal (debit)
    Withdrawal,
    /// 거래 체결 (credit)
    /// Trade fill (credit)
    Trade,
    /// 수수료 차감 (debit)
    /// Fee charge (debit)
    Fee,
    /// 내부 이체 (leg마다 방향이 다름)
    /// Internal transfer (direction differs per leg)
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Trade => "trade",
            TransactionType::Fee => "fee",
            TransactionType::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(TransactionType::Deposit),
            "withdrawal" => Some(TransactionType::Withdrawal),
            "trade" => Some(TransactionType::Trade),
            "fee" => Some(TransactionType::Fee),
            "transfer" => Some(TransactionType::Transfer),
            _ => None,
        }
    }

    /// 타입이 함의하는 방향 (transfer는 leg마다 다르므로 None)
    /// The direction implied by the type (None for transfer, it differs per leg)
    pub fn implied_direction(&self) -> Option<TransactionDirection> {
        match self {
            TransactionType::Deposit | TransactionType::Trade => Some(TransactionDirection::Credit),
            TransactionType::Withdrawal | TransactionType::Fee => Some(TransactionDirection::Debit),
            TransactionType::Transfer => None,
        }
    }
}

/// 트랜잭션 방향 (금액 부호 대신 사용; amount는 항상 >= 0)
/// Transaction direction (used instead of a signed amount; amount is always >= 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionDirection {
    /// 잔고 증가
    /// Increases balances
    Credit,
    /// 잔고 감소
    /// Decreases balances
    Debit,
}

impl TransactionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionDirection::Credit => "credit",
            TransactionDirection::Debit => "debit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credit" => Some(TransactionDirection::Credit),
            "debit" => Some(TransactionDirection::Debit),
            _ => None,
        }
    }
}

/// 트랜잭션 상태
/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// 처리 대기 중
    /// Awaiting processing
    Pending,
    /// 완료 (원장 적용됨, 종료 상태)
    /// Completed (ledger applied, terminal)
    Completed,
    /// 실패 (종료 상태)
    /// Failed (terminal)
    Failed,
    /// 취소 (종료 상태)
    /// Cancelled (terminal)
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TransactionStatus::Pending),
            "completed" => Some(TransactionStatus::Completed),
            "failed" => Some(TransactionStatus::Failed),
            "cancelled" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }

    /// 종료 상태 여부
    /// Whether this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    /// 상태 전이 가능 여부
    /// Whether the transition is allowed
    ///
    /// 종료 상태에서는 같은 상태로의 재기록도 허용하지 않음 (재적용 차단)
    /// Terminal states reject even a rewrite to the same state (blocks re-application)
    pub fn can_transition_to(&self, target: TransactionStatus) -> bool {
        match self {
            TransactionStatus::Pending => target.is_terminal(),
            _ => false,
        }
    }
}

/// 트랜잭션 정보 (데이터베이스에서 조회)
/// Transaction information (retrieved from database)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = Transaction)]
pub struct Transaction {
    /// Transaction ID (BIGSERIAL, auto-generated)
    /// 트랜잭션 ID (DB에서 자동 생성)
    /// Serialized as string to avoid precision loss in JavaScript
    /// JavaScript 정밀도 손실 방지를 위해 문자열로 직렬화
    #[serde(serialize_with = "serialize_u64_as_string", deserialize_with = "deserialize_string_to_u64")]
    #[schema(value_type = String, example = "42")]
    pub id: u64,

    /// Wallet ID (어느 지갑의 잔고에 적용되는지)
    /// Wallet ID (which wallet's balances this applies to)
    #[serde(serialize_with = "serialize_u64_as_string", deserialize_with = "deserialize_string_to_u64")]
    #[schema(value_type = String, example = "1")]
    pub wallet_id: u64,

    /// User ID (조회 편의를 위한 비정규화)
    /// User ID (denormalized for query convenience)
    pub user_id: u64,

    /// Transaction type
    /// 트랜잭션 타입
    pub transaction_type: TransactionType,

    /// Direction: 'credit' or 'debit'
    /// 방향: 'credit' 또는 'debit'
    pub direction: TransactionDirection,

    /// Amount (항상 >= 0; 방향은 direction이 결정)
    /// Amount (always >= 0; the sign is carried by direction)
    #[schema(value_type = String, example = "1.5")]
    pub amount: Decimal,

    /// Fee (항상 >= 0, 기본값 0)
    /// Fee (always >= 0, defaults to 0)
    #[schema(value_type = String, example = "0.001")]
    pub fee: Decimal,

    /// Currency (지갑 통화와 일치해야 함)
    /// Currency (must match the wallet currency)
    #[schema(example = "BTC")]
    pub currency: String,

    /// Transaction status
    /// 트랜잭션 상태
    pub status: TransactionStatus,

    /// 외부 참조 (예: 온체인 트랜잭션 해시, 있으면 유일)
    /// External reference (e.g., on-chain transaction hash, unique when present)
    pub tx_hash: Option<String>,

    /// transfer의 반대쪽 leg ID
    /// The opposite leg of a transfer
    pub counterpart_id: Option<u64>,

    /// 실패 사유 (failed로 강제 전이될 때 기록)
    /// Failure reason (recorded when forced to failed)
    pub failure_reason: Option<String>,

    /// 원장 적용 시점 (completed 진입 시 정확히 한 번 기록)
    /// When the ledger was applied (written exactly once, on entering completed)
    pub processed_at: Option<DateTime<Utc>>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

// =====================================================
// 트랜잭션 요청 (Transaction Requests)
// =====================================================
/// 입금 요청 모델
/// Deposit request model
///
/// (통화, 타입)에 해당하는 지갑이 없으면 자동 생성됨
/// The (currency, type) wallet is auto-created if missing
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = DepositRequest)]
pub struct DepositRequest {
    /// Currency code
    /// 통화 코드
    #[schema(example = "BTC")]
    pub currency: String,

    /// Wallet type (기본값: spot)
    /// Wallet type (default: spot)
    pub wallet_type: Option<WalletType>,

    /// Deposit amount
    /// 입금 금액
    #[schema(value_type = String, example = "1.5")]
    pub amount: Decimal,

    /// Fee (기본값: 0)
    /// Fee (default: 0)
    #[schema(value_type = Option<String>, example = "0.001")]
    pub fee: Option<Decimal>,

    /// 외부 참조 (예: 온체인 해시)
    /// External reference (e.g., on-chain hash)
    pub tx_hash: Option<String>,
}

/// 출금 요청 모델
/// Withdrawal request model
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = WithdrawRequest)]
pub struct WithdrawRequest {
    /// Wallet ID to withdraw from
    /// 출금할 지갑 ID
    #[serde(deserialize_with = "deserialize_string_to_u64")]
    #[schema(value_type = String, example = "1")]
    pub wallet_id: u64,

    /// Withdrawal amount
    /// 출금 금액
    #[schema(value_type = String, example = "0.5")]
    pub amount: Decimal,

    /// Fee (기본값: 0)
    /// Fee (default: 0)
    #[schema(value_type = Option<String>, example = "0.0005")]
    pub fee: Option<Decimal>,
}

/// 이체 요청 모델 (같은 통화의 지갑 간)
/// Transfer request model (between wallets of the same currency)
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = TransferRequest)]
pub struct TransferRequest {
    /// Source wallet ID
    /// 출발 지갑 ID
    #[serde(deserialize_with = "deserialize_string_to_u64")]
    #[schema(value_type = String, example = "1")]
    pub from_wallet_id: u64,

    /// Destination wallet ID
    /// 도착 지갑 ID
    #[serde(deserialize_with = "deserialize_string_to_u64")]
    #[schema(value_type = String, example = "2")]
    pub to_wallet_id: u64,

    /// Transfer amount
    /// 이체 금액
    #[schema(value_type = String, example = "2.0")]
    pub amount: Decimal,

    /// Fee (출발 지갑에서 차감, 기본값: 0)
    /// Fee (charged to the source wallet, default: 0)
    #[schema(value_type = Option<String>, example = "0")]
    pub fee: Option<Decimal>,
}

/// 페이지네이션 쿼리 파라미터
/// Pagination query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// 최대 개수 (기본값: 100)
    /// Maximum number of rows (default: 100)
    pub limit: Option<i64>,

    /// 건너뛸 개수 (기본값: 0)
    /// Number of rows to skip (default: 0)
    pub offset: Option<i64>,
}

// =====================================================
// 트랜잭션 응답 (Transaction Responses)
// =====================================================
/// 트랜잭션 응답 모델 (완료 시 갱신된 지갑 스냅샷 포함)
/// Transaction response model (includes the updated wallet snapshot on completion)
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransactionResponse)]
pub struct TransactionResponse {
    /// Transaction information
    /// 트랜잭션 정보
    pub transaction: Transaction,

    /// 갱신된 지갑 (원장이 적용된 경우에만)
    /// Updated wallet (only when the ledger was applied)
    pub wallet: Option<Wallet>,

    /// Message
    /// 메시지
    pub message: String,
}

/// 트랜잭션 목록 응답 모델
/// Transactions list response model
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransactionsResponse)]
pub struct TransactionsResponse {
    /// List of transactions
    /// 트랜잭션 목록
    pub transactions: Vec<Transaction>,
}

/// 이체 응답 모델 (두 leg와 두 지갑 스냅샷)
/// Transfer response model (both legs and both wallet snapshots)
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransferResponse)]
pub struct TransferResponse {
    /// Debit leg (source wallet)
    /// 출발 지갑의 debit leg
    pub debit: Transaction,

    /// Credit leg (destination wallet)
    /// 도착 지갑의 credit leg
    pub credit: Transaction,

    /// Updated source wallet
    /// 갱신된 출발 지갑
    pub source_wallet: Wallet,

    /// Updated destination wallet
    /// 갱신된 도착 지갑
    pub destination_wallet: Wallet,

    /// Message
    /// 메시지
    pub message: String,
}

// =====================================================
// Transaction 생성용 (Repository에서 사용)
// =====================================================
/// 트랜잭션 생성 시 사용하는 내부 모델 (DB 저장용)
/// Internal model for creating transactions (for database storage)
#[derive(Debug)]
pub struct TransactionCreate {
    /// Wallet ID
    /// 지갑 ID
    pub wallet_id: u64,

    /// User ID
    /// 사용자 ID
    pub user_id: u64,

    /// Transaction type
    /// 트랜잭션 타입
    pub transaction_type: TransactionType,

    /// Direction
    /// 방향
    pub direction: TransactionDirection,

    /// Amount
    /// 금액
    pub amount: Decimal,

    /// Fee
    /// 수수료
    pub fee: Decimal,

    /// Currency
    /// 통화
    pub currency: String,

    /// External reference
    /// 외부 참조
    pub tx_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_transition_to_every_terminal_state() {
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Completed));
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Failed));
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Cancelled));
    }

    #[test]
    fn test_pending_cannot_transition_to_pending() {
        assert!(!TransactionStatus::Pending.can_transition_to(TransactionStatus::Pending));
    }

    #[test]
    fn test_terminal_states_reject_every_transition() {
        let terminal = [
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ];
        let all = [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ];

        for from in terminal {
            for to in all {
                assert!(
                    !from.can_transition_to(to),
                    "{:?} -> {:?} must be rejected",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_only_pending_is_not_terminal() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
        assert!(TransactionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_direction_implied_by_type() {
        assert_eq!(
            TransactionType::Deposit.implied_direction(),
            Some(TransactionDirection::Credit)
        );
        assert_eq!(
            TransactionType::Trade.implied_direction(),
            Some(TransactionDirection::Credit)
        );
        assert_eq!(
            TransactionType::Withdrawal.implied_direction(),
            Some(TransactionDirection::Debit)
        );
        assert_eq!(
            TransactionType::Fee.implied_direction(),
            Some(TransactionDirection::Debit)
        );
        // transfer는 leg마다 방향이 다름
        assert_eq!(TransactionType::Transfer.implied_direction(), None);
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransactionStatus::parse("settled"), None);
    }
}
