// Market domain
//
// 모의 시세와 단순 매수/매도 체결 기록을 담당 (외부 시세 피드 없음)
// Mocked market data and simple buy/sell trade booking (no external price feed)
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
