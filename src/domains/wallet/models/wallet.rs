use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{deserialize_string_to_u64, serialize_u64_as_string};

// =====================================================
// Wallet 모델
// =====================================================
// 역할: 사용자별/통화별 잔고를 나타내는 데이터 모델
// 설명: 사용자는 (통화, 타입) 쌍마다 지갑을 하나씩 가짐
//
// 잔고 구분:
// - balance: 전체 잔고 (항상 >= 0)
// - available_balance: 사용 가능 잔고 (항상 0 <= available <= balance)
//
// 상태:
// - active: 정상 (잔고 변경 가능)
// - frozen: 동결 (잔고 변경 거부, 해제 가능)
// - closed: 폐쇄 (잔고 변경 거부, 되돌릴 수 없음; soft-close)
// =====================================================

/// 지갑 타입
/// Wallet type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    /// 현물 지갑
    /// Spot wallet
    Spot,
    /// 마진 지갑
    /// Margin wallet
    Margin,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Spot => "spot",
            WalletType::Margin => "margin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "spot" => Some(WalletType::Spot),
            "margin" => Some(WalletType::Margin),
            _ => None,
        }
    }
}

/// 지갑 상태
/// Wallet status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalletStatus {
    /// 정상
    /// Active
    Active,
    /// 동결 (잔고 변경 거부)
    /// Frozen (rejects balance mutations)
    Frozen,
    /// 폐쇄 (soft-close, 삭제 아님)
    /// Closed (soft-close, never deleted)
    Closed,
}

impl WalletStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletStatus::Active => "active",
            WalletStatus::Frozen => "frozen",
            WalletStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(WalletStatus::Active),
            "frozen" => Some(WalletStatus::Frozen),
            "closed" => Some(WalletStatus::Closed),
            _ => None,
        }
    }

    /// 상태 전이 가능 여부 (closed는 되돌릴 수 없음)
    /// Whether the status change is allowed (closed cannot be reverted)
    pub fn can_transition_to(&self, target: WalletStatus) -> bool {
        match self {
            WalletStatus::Active => matches!(target, WalletStatus::Frozen | WalletStatus::Closed),
            WalletStatus::Frozen => matches!(target, WalletStatus::Active | WalletStatus::Closed),
            WalletStatus::Closed => false,
        }
    }
}

/// 지갑 정보 (데이터베이스에서 조회)
/// Wallet information (retrieved from database)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = Wallet)]
pub struct Wallet {
    /// Wallet ID (BIGSERIAL, auto-generated)
    /// 지갑 ID (DB에서 자동 생성)
    /// Serialized as string to avoid precision loss in JavaScript
    /// JavaScript 정밀도 손실 방지를 위해 문자열로 직렬화
    #[serde(serialize_with = "serialize_u64_as_string", deserialize_with = "deserialize_string_to_u64")]
    #[schema(value_type = String, example = "1")]
    pub id: u64,

    /// User ID (owner of this wallet)
    /// 사용자 ID (이 지갑의 소유자)
    pub user_id: u64,

    /// Currency code (e.g., 'BTC', 'USDT')
    /// 통화 코드 (예: 'BTC', 'USDT')
    #[schema(example = "BTC")]
    pub currency: String,

    /// Wallet type: 'spot' or 'margin'
    /// 지갑 타입: 'spot' 또는 'margin'
    pub wallet_type: WalletType,

    /// Total balance (항상 >= 0)
    /// Total balance (always >= 0)
    #[schema(value_type = String, example = "10.0")]
    pub balance: Decimal,

    /// Available balance (항상 0 <= available <= balance)
    /// Available balance (always 0 <= available <= balance)
    #[schema(value_type = String, example = "9.5")]
    pub available_balance: Decimal,

    /// Wallet status: 'active', 'frozen', or 'closed'
    /// 지갑 상태: 'active' (정상), 'frozen' (동결), 'closed' (폐쇄)
    pub status: WalletStatus,

    /// close 시점 (soft-close 기록)
    /// When the wallet was closed (soft-close record)
    pub closed_at: Option<DateTime<Utc>>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

// =====================================================
// 지갑 요청/응답 (Wallet Requests/Responses)
// =====================================================
/// 지갑 생성 요청 모델
/// Request model for creating a wallet
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = CreateWalletRequest)]
pub struct CreateWalletRequest {
    /// Currency code
    /// 통화 코드
    #[schema(example = "BTC")]
    pub currency: String,

    /// Wallet type (기본값: spot)
    /// Wallet type (default: spot)
    pub wallet_type: Option<WalletType>,
}

/// 지갑 응답 모델
/// Wallet response model
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = WalletResponse)]
pub struct WalletResponse {
    /// Wallet information
    /// 지갑 정보
    pub wallet: Wallet,
}

/// 지갑 목록 응답 모델
/// Wallets list response model
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = WalletsResponse)]
pub struct WalletsResponse {
    /// List of wallets
    /// 지갑 목록
    pub wallets: Vec<Wallet>,
}

// =====================================================
// Wallet 생성용 (Repository에서 사용)
// =====================================================
/// 지갑 생성 시 사용하는 내부 모델 (DB 저장용)
/// Internal model for creating wallets (for database storage)
#[derive(Debug)]
pub struct WalletCreate {
    /// User ID
    /// 사용자 ID
    pub user_id: u64,

    /// Currency code
    /// 통화 코드
    pub currency: String,

    /// Wallet type
    /// 지갑 타입
    pub wallet_type: WalletType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_wallet_can_be_frozen_and_closed() {
        assert!(WalletStatus::Active.can_transition_to(WalletStatus::Frozen));
        assert!(WalletStatus::Active.can_transition_to(WalletStatus::Closed));
    }

    #[test]
    fn test_frozen_wallet_can_be_reactivated_or_closed() {
        assert!(WalletStatus::Frozen.can_transition_to(WalletStatus::Active));
        assert!(WalletStatus::Frozen.can_transition_to(WalletStatus::Closed));
    }

    #[test]
    fn test_closed_wallet_cannot_transition() {
        assert!(!WalletStatus::Closed.can_transition_to(WalletStatus::Active));
        assert!(!WalletStatus::Closed.can_transition_to(WalletStatus::Frozen));
        assert!(!WalletStatus::Closed.can_transition_to(WalletStatus::Closed));
    }

    #[test]
    fn test_wallet_type_round_trips_through_strings() {
        assert_eq!(WalletType::parse("spot"), Some(WalletType::Spot));
        assert_eq!(WalletType::parse("margin"), Some(WalletType::Margin));
        assert_eq!(WalletType::parse("futures"), None);
        assert_eq!(WalletType::Spot.as_str(), "spot");
    }
}
