use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};

/// 사용자 정보 (데이터베이스에서 조회)
/// User information (retrieved from database)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (BIGSERIAL, auto-generated)
    /// 사용자 ID (DB에서 자동 생성)
    pub id: u64,

    /// Email address (unique)
    /// 이메일 주소 (유일)
    pub email: String,

    /// Argon2 password hash (절대 응답으로 내보내지 않음)
    /// Argon2 password hash (never exposed in responses)
    pub password_hash: String,

    /// Username (optional)
    /// 사용자명 (선택사항)
    pub username: Option<String>,

    /// 관리자 여부 (관리자 대시보드 접근 권한)
    /// Admin flag (admin dashboard access)
    pub is_admin: bool,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// 사용자 응답 모델 (비밀번호 해시 제외)
/// User response model (without the password hash)
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = UserResponse)]
pub struct UserResponse {
    /// User ID
    /// 사용자 ID
    pub id: u64,

    /// Email address
    /// 이메일 주소
    #[schema(example = "user@example.com")]
    pub email: String,

    /// Username
    /// 사용자명
    #[schema(example = "johndoe")]
    pub username: Option<String>,

    /// Admin flag
    /// 관리자 여부
    pub is_admin: bool,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}
