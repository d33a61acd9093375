use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;
use serde_json::json;

/// 인증된 사용자 정보 (JWT 토큰에서 추출)
/// Authenticated user information (extracted from JWT token)
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u64,
    pub email: String,
    pub is_admin: bool,
}

/// 인증된 관리자 정보 (is_admin claim 필요)
/// Authenticated admin information (requires the is_admin claim)
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: u64,
    pub email: String,
}

/// Authorization 헤더에서 Bearer 토큰을 꺼내 검증하고 Claims 반환
/// Extract and verify the Bearer token from the Authorization header, returning the claims
fn verify_bearer_token(
    parts: &Parts,
    state: &AppState,
) -> Result<crate::domains::auth::models::jwt::Claims, (StatusCode, axum::Json<serde_json::Value>)> {
    // 1. Authorization 헤더에서 토큰 추출
    let auth_header = parts
        .headers
        .get("Authorization")
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({ "error": "Missing authorization header" })),
            )
        })?
        .to_str()
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({ "error": "Invalid authorization header" })),
            )
        })?;

    // 2. "Bearer <token>" 형식 파싱
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({
                "error": "Invalid authorization format. Expected: 'Bearer <token>'"
            })),
        )
    })?;

    // 3. JWT Service로 토큰 검증 (AppState에서 가져옴)
    state
        .auth_state
        .jwt_service
        .verify_access_token(token)
        .map_err(|e| {
            let status = match e {
                AuthError::InvalidToken | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, axum::Json(json!({ "error": e.to_string() })))
        })
}

/// AuthenticatedUser를 Axum Extractor로 구현
///
/// 사용법:
/// ```ignore
/// pub async fn create_wallet(
///     State(app_state): State<AppState>,
///     authenticated_user: AuthenticatedUser,  // <- 이렇게 사용!
/// ) -> Result<...> {
///     let user_id = authenticated_user.user_id;
///     // ...
/// }
/// ```
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = (StatusCode, axum::Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer_token(parts, state)?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            email: claims.email,
            is_admin: claims.is_admin,
        })
    }
}

/// AdminUser extractor: 관리자 전용 엔드포인트 보호
/// AdminUser extractor: guards admin-only endpoints
#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, axum::Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer_token(parts, state)?;

        // 토큰은 유효하지만 관리자가 아니면 403
        // Valid token without the admin claim is a 403
        if !claims.is_admin {
            let err = AuthError::AdminRequired;
            return Err((
                StatusCode::FORBIDDEN,
                axum::Json(json!({ "error": err.to_string() })),
            ));
        }

        Ok(AdminUser {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}
