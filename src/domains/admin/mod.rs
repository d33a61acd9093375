// Admin domain
//
// 관리자 대시보드: 사용자/트랜잭션 목록, 트랜잭션 상태 갱신, 지갑 동결/폐쇄
// Admin dashboard: user/transaction listings, transaction status updates, wallet freeze/close
pub mod handlers;
pub mod models;
pub mod routes;
