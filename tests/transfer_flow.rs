// =====================================================
// 이체 / 지갑 수명주기 통합 테스트
// =====================================================
// 이체의 두 leg가 함께 커밋되거나 함께 롤백되는지,
// 지갑 freeze/close 규칙이 지켜지는지 검증합니다.
//
// 로컬 PostgreSQL 필요: cargo test -- --ignored --test-threads=1
// =====================================================

mod common;
use common::*;

use exchange_api::domains::wallet::models::transaction::{
    DepositRequest, TransactionStatus, TransferRequest,
};
use exchange_api::domains::wallet::models::wallet::{CreateWalletRequest, WalletStatus};
use exchange_api::domains::wallet::services::WalletState;
use exchange_api::shared::errors::LedgerError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 입금을 생성하고 바로 완료시켜 지갑에 잔고를 채움
async fn fund_wallet(state: &WalletState, user_id: u64, currency: &str, amount: Decimal) -> u64 {
    let deposit = state
        .transaction_service
        .deposit(
            user_id,
            DepositRequest {
                currency: currency.to_string(),
                wallet_type: None,
                amount,
                fee: None,
                tx_hash: None,
            },
        )
        .await
        .expect("Failed to create deposit");

    state
        .transaction_service
        .update_status(deposit.id, TransactionStatus::Completed, None)
        .await
        .expect("Failed to complete deposit");

    deposit.wallet_id
}

/// 테스트: 이체는 출발 지갑에서 차감되고 도착 지갑에 입금됨 (두 leg 모두 completed)
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_transfer_moves_funds_between_wallets() {
    let (state, db) = setup_test().await;

    let source_id = fund_wallet(&state, TEST_USER_ID, "BTC", dec!(5.0)).await;
    let destination = state
        .wallet_service
        .create_wallet(
            OTHER_USER_ID,
            CreateWalletRequest {
                currency: "BTC".to_string(),
                wallet_type: None,
            },
        )
        .await
        .unwrap();

    let outcome = state
        .transaction_service
        .transfer(
            TEST_USER_ID,
            TransferRequest {
                from_wallet_id: source_id,
                to_wallet_id: destination.id,
                amount: dec!(2.0),
                fee: None,
            },
        )
        .await
        .expect("Transfer succeeds");

    assert_eq!(outcome.source_wallet.balance, dec!(3.0));
    assert_eq!(outcome.source_wallet.available_balance, dec!(3.0));
    assert_eq!(outcome.destination_wallet.balance, dec!(2.0));
    assert_eq!(outcome.destination_wallet.available_balance, dec!(2.0));

    // 두 leg 모두 completed이고 서로를 참조함
    assert_eq!(outcome.debit.status, TransactionStatus::Completed);
    assert_eq!(outcome.credit.status, TransactionStatus::Completed);
    assert_eq!(outcome.debit.counterpart_id, Some(outcome.credit.id));
    assert_eq!(outcome.credit.counterpart_id, Some(outcome.debit.id));
    assert!(outcome.debit.processed_at.is_some());
    assert!(outcome.credit.processed_at.is_some());

    teardown_test(&db).await;
}

/// 테스트: 도착 leg가 거부되면 출발 leg도 함께 롤백됨
///
/// 도착 지갑이 동결된 상태에서 이체하면 두 leg 모두 failed가 되고
/// 출발 지갑 잔고는 그대로 남아야 함
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_transfer_rolls_back_source_when_destination_rejects() {
    let (state, db) = setup_test().await;

    let source_id = fund_wallet(&state, TEST_USER_ID, "BTC", dec!(5.0)).await;
    let destination = state
        .wallet_service
        .create_wallet(
            OTHER_USER_ID,
            CreateWalletRequest {
                currency: "BTC".to_string(),
                wallet_type: None,
            },
        )
        .await
        .unwrap();

    // 도착 지갑 동결 (도착 leg 실패 시뮬레이션)
    state
        .wallet_service
        .update_wallet_status(destination.id, WalletStatus::Frozen)
        .await
        .unwrap();

    let result = state
        .transaction_service
        .transfer(
            TEST_USER_ID,
            TransferRequest {
                from_wallet_id: source_id,
                to_wallet_id: destination.id,
                amount: dec!(2.0),
                fee: None,
            },
        )
        .await;
    assert!(matches!(result, Err(LedgerError::WalletNotActive { .. })));

    // 출발 지갑은 그대로
    let source = state
        .wallet_service
        .get_wallet(TEST_USER_ID, source_id)
        .await
        .unwrap();
    assert_eq!(source.balance, dec!(5.0));
    assert_eq!(source.available_balance, dec!(5.0));

    // 두 leg 모두 failed로 남음 (pending에 머물지 않음)
    let legs = state
        .transaction_service
        .list_user_transactions(TEST_USER_ID, None, None)
        .await
        .unwrap();
    let debit_leg = legs
        .iter()
        .find(|t| t.counterpart_id.is_some())
        .expect("debit leg exists");
    assert_eq!(debit_leg.status, TransactionStatus::Failed);
    assert!(debit_leg.failure_reason.is_some());

    let credit_leg = state
        .transaction_service
        .get_transaction(OTHER_USER_ID, debit_leg.counterpart_id.unwrap())
        .await
        .unwrap();
    assert_eq!(credit_leg.status, TransactionStatus::Failed);

    teardown_test(&db).await;
}

/// 테스트: 잔고가 부족한 이체는 두 leg 모두 failed가 되고 지갑은 그대로
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_transfer_with_insufficient_source_fails_both_legs() {
    let (state, db) = setup_test().await;

    let source_id = fund_wallet(&state, TEST_USER_ID, "BTC", dec!(1.0)).await;
    let destination = state
        .wallet_service
        .create_wallet(
            OTHER_USER_ID,
            CreateWalletRequest {
                currency: "BTC".to_string(),
                wallet_type: None,
            },
        )
        .await
        .unwrap();

    let result = state
        .transaction_service
        .transfer(
            TEST_USER_ID,
            TransferRequest {
                from_wallet_id: source_id,
                to_wallet_id: destination.id,
                amount: dec!(2.0),
                fee: None,
            },
        )
        .await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));

    let source = state
        .wallet_service
        .get_wallet(TEST_USER_ID, source_id)
        .await
        .unwrap();
    assert_eq!(source.balance, dec!(1.0));

    let destination = state
        .wallet_service
        .get_wallet(OTHER_USER_ID, destination.id)
        .await
        .unwrap();
    assert_eq!(destination.balance, dec!(0));

    teardown_test(&db).await;
}

/// 테스트: 통화가 다른 지갑 간 이체는 거부됨
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_transfer_requires_matching_currency() {
    let (state, db) = setup_test().await;

    let source_id = fund_wallet(&state, TEST_USER_ID, "BTC", dec!(1.0)).await;
    let destination = state
        .wallet_service
        .create_wallet(
            OTHER_USER_ID,
            CreateWalletRequest {
                currency: "ETH".to_string(),
                wallet_type: None,
            },
        )
        .await
        .unwrap();

    let result = state
        .transaction_service
        .transfer(
            TEST_USER_ID,
            TransferRequest {
                from_wallet_id: source_id,
                to_wallet_id: destination.id,
                amount: dec!(0.5),
                fee: None,
            },
        )
        .await;

    assert!(matches!(result, Err(LedgerError::CurrencyMismatch { .. })));

    teardown_test(&db).await;
}

/// 테스트: 지갑 close는 soft-close이고 종료 상태임
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_wallet_close_is_soft_and_terminal() {
    let (state, db) = setup_test().await;

    let wallet = state
        .wallet_service
        .create_wallet(
            TEST_USER_ID,
            CreateWalletRequest {
                currency: "BTC".to_string(),
                wallet_type: None,
            },
        )
        .await
        .unwrap();

    let closed = state
        .wallet_service
        .update_wallet_status(wallet.id, WalletStatus::Closed)
        .await
        .unwrap();
    assert_eq!(closed.status, WalletStatus::Closed);
    assert!(closed.closed_at.is_some());

    // closed에서 되돌리기는 거부됨
    let result = state
        .wallet_service
        .update_wallet_status(wallet.id, WalletStatus::Active)
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::InvalidStateTransition { .. })
    ));

    // row는 soft-close로 남아 있어 조회 가능
    let reloaded = state
        .wallet_service
        .get_wallet(TEST_USER_ID, wallet.id)
        .await
        .unwrap();
    assert_eq!(reloaded.status, WalletStatus::Closed);

    teardown_test(&db).await;
}

/// 테스트: 지갑 내역은 최신순이고 페이지네이션이 동작함
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_wallet_history_is_newest_first_and_paginated() {
    let (state, db) = setup_test().await;

    let wallet_id = fund_wallet(&state, TEST_USER_ID, "BTC", dec!(1.0)).await;
    fund_wallet(&state, TEST_USER_ID, "BTC", dec!(2.0)).await;
    fund_wallet(&state, TEST_USER_ID, "BTC", dec!(3.0)).await;

    let history = state
        .wallet_service
        .get_wallet_history(TEST_USER_ID, wallet_id, None, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    // 최신순 (가장 마지막 입금이 먼저)
    assert_eq!(history[0].amount, dec!(3.0));
    assert_eq!(history[2].amount, dec!(1.0));

    let page = state
        .wallet_service
        .get_wallet_history(TEST_USER_ID, wallet_id, Some(1), Some(1))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].amount, dec!(2.0));

    teardown_test(&db).await;
}
