use chrono::{DateTime, Utc};

/// Refresh Token (데이터베이스에서 조회)
/// Refresh token (retrieved from database)
///
/// 원본 토큰이 아니라 SHA-256 해시만 저장됨
/// Only the SHA-256 hash is stored, never the raw token
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revoked: bool,
}

/// Refresh Token 생성용 (DB 저장용)
/// Internal model for creating refresh tokens (for database storage)
#[derive(Debug)]
pub struct RefreshTokenCreate {
    pub user_id: u64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
