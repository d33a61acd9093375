use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domains::auth::models::user::UserResponse;
use crate::domains::wallet::models::transaction::TransactionStatus;
use crate::domains::wallet::models::wallet::WalletStatus;

/// 사용자 목록 응답 모델
/// Users list response model
#[derive(Debug, serde::Serialize, ToSchema)]
#[schema(as = UsersResponse)]
pub struct UsersResponse {
    /// List of users
    /// 사용자 목록
    pub users: Vec<UserResponse>,
}

/// 관리자 트랜잭션 목록 쿼리 파라미터
/// Admin transactions listing query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminTransactionsQuery {
    /// 상태 필터 (예: 'pending')
    /// Status filter (e.g., 'pending')
    pub status: Option<TransactionStatus>,

    /// 최대 개수 (기본값: 100)
    /// Maximum number of rows (default: 100)
    pub limit: Option<i64>,

    /// 건너뛸 개수 (기본값: 0)
    /// Number of rows to skip (default: 0)
    pub offset: Option<i64>,
}

/// 트랜잭션 상태 갱신 요청 모델 (상태 갱신 경계의 입력)
/// Transaction status update request model (the input of the status-update boundary)
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = UpdateTransactionStatusRequest)]
pub struct UpdateTransactionStatusRequest {
    /// 목표 상태 ('completed', 'failed', 'cancelled')
    /// Target status ('completed', 'failed', 'cancelled')
    pub status: TransactionStatus,

    /// 사유 (failed/cancelled 시 기록)
    /// Reason (recorded for failed/cancelled)
    pub reason: Option<String>,
}

/// 지갑 상태 갱신 요청 모델
/// Wallet status update request model
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = UpdateWalletStatusRequest)]
pub struct UpdateWalletStatusRequest {
    /// 목표 상태 ('active', 'frozen', 'closed')
    /// Target status ('active', 'frozen', 'closed')
    pub status: WalletStatus,
}
