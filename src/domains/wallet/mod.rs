// Wallet domain
//
// 지갑과 트랜잭션, 그리고 트랜잭션 완료 시 잔고를 변경하는 원장 규칙을 포함
// Holds wallets, transactions, and the ledger rule that mutates balances on completion
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod routes;
pub mod services;
