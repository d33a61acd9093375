// =====================================================
// 원장 적용 통합 테스트
// =====================================================
// 입금/출금 트랜잭션의 완료가 지갑 잔고에 정확히 한 번,
// 정확한 금액으로 반영되는지 검증합니다.
//
// 로컬 PostgreSQL 필요: cargo test -- --ignored --test-threads=1
// =====================================================

mod common;
use common::*;

use exchange_api::domains::wallet::models::transaction::{DepositRequest, TransactionStatus, WithdrawRequest};
use exchange_api::domains::wallet::models::wallet::Wallet;
use exchange_api::domains::wallet::services::WalletState;
use exchange_api::shared::errors::LedgerError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 입금을 생성하고 바로 완료시켜 잔고가 채워진 지갑을 반환
async fn funded_wallet(
    state: &WalletState,
    user_id: u64,
    currency: &str,
    amount: Decimal,
    fee: Decimal,
) -> Wallet {
    let deposit = state
        .transaction_service
        .deposit(
            user_id,
            DepositRequest {
                currency: currency.to_string(),
                wallet_type: None,
                amount,
                fee: Some(fee),
                tx_hash: None,
            },
        )
        .await
        .expect("Failed to create deposit");

    let outcome = state
        .transaction_service
        .update_status(deposit.id, TransactionStatus::Completed, None)
        .await
        .expect("Failed to complete deposit");

    outcome.wallet.expect("Completed deposit returns the wallet snapshot")
}

/// 테스트: 입금과 출금이 원장 규칙대로 잔고에 반영됨
///
/// 빈 지갑에 deposit(1.5, fee 0.001) -> (1.5, 1.499),
/// 이어서 withdrawal(0.5, fee 0.0005) -> (0.9995, 0.999)
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_deposit_and_withdrawal_follow_the_ledger_rule() {
    let (state, db) = setup_test().await;

    let wallet = funded_wallet(&state, TEST_USER_ID, "BTC", dec!(1.5), dec!(0.001)).await;
    assert_eq!(wallet.balance, dec!(1.5));
    assert_eq!(wallet.available_balance, dec!(1.499));

    let withdrawal = state
        .transaction_service
        .withdraw(
            TEST_USER_ID,
            WithdrawRequest {
                wallet_id: wallet.id,
                amount: dec!(0.5),
                fee: Some(dec!(0.0005)),
            },
        )
        .await
        .expect("Failed to create withdrawal");

    let outcome = state
        .transaction_service
        .update_status(withdrawal.id, TransactionStatus::Completed, None)
        .await
        .expect("Failed to complete withdrawal");

    let wallet = outcome.wallet.unwrap();
    assert_eq!(wallet.balance, dec!(0.9995));
    assert_eq!(wallet.available_balance, dec!(0.999));

    teardown_test(&db).await;
}

/// 테스트: 완료된 트랜잭션의 재완료 시도는 거부되고 잔고는 변하지 않음 (멱등성)
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_completed_transaction_cannot_be_reapplied() {
    let (state, db) = setup_test().await;

    let deposit = state
        .transaction_service
        .deposit(
            TEST_USER_ID,
            DepositRequest {
                currency: "BTC".to_string(),
                wallet_type: None,
                amount: dec!(1.0),
                fee: None,
                tx_hash: None,
            },
        )
        .await
        .unwrap();

    let first = state
        .transaction_service
        .update_status(deposit.id, TransactionStatus::Completed, None)
        .await
        .expect("First completion succeeds");
    let wallet_after_first = first.wallet.unwrap();
    assert_eq!(wallet_after_first.balance, dec!(1.0));

    // 같은 id로 다시 완료 요청 (재시도 시뮬레이션)
    let second = state
        .transaction_service
        .update_status(deposit.id, TransactionStatus::Completed, None)
        .await;

    assert!(matches!(
        second,
        Err(LedgerError::InvalidStateTransition { .. })
    ));

    // 잔고는 그대로
    let wallet = wallet_snapshot(&state, wallet_after_first.id).await;
    assert_eq!(wallet.balance, dec!(1.0));
    assert_eq!(wallet.available_balance, dec!(1.0));

    // processed_at은 한 번만 기록됨
    let reloaded = state
        .transaction_service
        .get_transaction(TEST_USER_ID, deposit.id)
        .await
        .unwrap();
    assert_eq!(reloaded.status, TransactionStatus::Completed);
    assert!(reloaded.processed_at.is_some());

    teardown_test(&db).await;
}

/// 테스트: 원장이 거부한 출금은 failed로 강제 전이되고 지갑은 그대로
///
/// 잔고 1.0에서 0.8짜리 출금 두 건을 만들고 순서대로 완료하면
/// 두 번째는 InsufficientFunds로 실패해야 함
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_rejected_withdrawal_is_forced_to_failed() {
    let (state, db) = setup_test().await;

    let wallet = funded_wallet(&state, TEST_USER_ID, "BTC", dec!(1.0), dec!(0)).await;

    // 생성 시점에는 둘 다 잔고가 충분해 보임
    let first = state
        .transaction_service
        .withdraw(TEST_USER_ID, WithdrawRequest { wallet_id: wallet.id, amount: dec!(0.8), fee: None })
        .await
        .unwrap();
    let second = state
        .transaction_service
        .withdraw(TEST_USER_ID, WithdrawRequest { wallet_id: wallet.id, amount: dec!(0.8), fee: None })
        .await
        .unwrap();

    // 첫 번째 완료는 성공
    let outcome = state
        .transaction_service
        .update_status(first.id, TransactionStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(outcome.wallet.unwrap().balance, dec!(0.2));

    // 두 번째 완료는 잔고 부족으로 거부되고 failed로 전이됨
    let result = state
        .transaction_service
        .update_status(second.id, TransactionStatus::Completed, None)
        .await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));

    let failed = state
        .transaction_service
        .get_transaction(TEST_USER_ID, second.id)
        .await
        .unwrap();
    assert_eq!(failed.status, TransactionStatus::Failed);
    assert!(failed.failure_reason.is_some());
    assert!(failed.processed_at.is_none());

    // 지갑은 첫 번째 출금 이후 상태 그대로
    let wallet = wallet_snapshot(&state, wallet.id).await;
    assert_eq!(wallet.balance, dec!(0.2));
    assert_eq!(wallet.available_balance, dec!(0.2));

    teardown_test(&db).await;
}

/// 테스트: 같은 지갑에 대한 동시 완료는 직렬화됨 (정확히 하나만 성공)
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_racing_withdrawals_serialize_on_the_wallet_row() {
    let (state, db) = setup_test().await;

    let wallet = funded_wallet(&state, TEST_USER_ID, "BTC", dec!(1.0), dec!(0)).await;

    let first = state
        .transaction_service
        .withdraw(TEST_USER_ID, WithdrawRequest { wallet_id: wallet.id, amount: dec!(0.8), fee: None })
        .await
        .unwrap();
    let second = state
        .transaction_service
        .withdraw(TEST_USER_ID, WithdrawRequest { wallet_id: wallet.id, amount: dec!(0.8), fee: None })
        .await
        .unwrap();

    // 두 완료를 동시에 실행
    let service_a = state.transaction_service.clone();
    let service_b = state.transaction_service.clone();
    let (result_a, result_b) = tokio::join!(
        service_a.update_status(first.id, TransactionStatus::Completed, None),
        service_b.update_status(second.id, TransactionStatus::Completed, None),
    );

    // 정확히 하나만 성공해야 함
    let successes = [result_a.is_ok(), result_b.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(successes, 1, "exactly one completion must win");

    // 잔고는 음수가 아니고, 승자 하나만 반영됨
    let wallet = wallet_snapshot(&state, wallet.id).await;
    assert_eq!(wallet.balance, dec!(0.2));
    assert_eq!(wallet.available_balance, dec!(0.2));

    teardown_test(&db).await;
}

/// 테스트: 취소된 트랜잭션은 종료 상태 (이후 어떤 전이도 불가)
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_cancelled_transaction_is_terminal() {
    let (state, db) = setup_test().await;

    let deposit = state
        .transaction_service
        .deposit(
            TEST_USER_ID,
            DepositRequest {
                currency: "BTC".to_string(),
                wallet_type: None,
                amount: dec!(1.0),
                fee: None,
                tx_hash: None,
            },
        )
        .await
        .unwrap();

    let cancelled = state
        .transaction_service
        .update_status(deposit.id, TransactionStatus::Cancelled, Some("user request".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.transaction.status, TransactionStatus::Cancelled);
    assert!(cancelled.wallet.is_none());

    // 취소된 트랜잭션의 완료 시도는 거부됨
    let result = state
        .transaction_service
        .update_status(deposit.id, TransactionStatus::Completed, None)
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::InvalidStateTransition { .. })
    ));

    // 잔고는 한 번도 변한 적이 없어야 함
    let wallets = state
        .wallet_service
        .get_user_wallets(TEST_USER_ID)
        .await
        .unwrap();
    assert_eq!(wallets[0].balance, dec!(0));
    assert_eq!(wallets[0].available_balance, dec!(0));

    teardown_test(&db).await;
}

/// 테스트: pending 사이에 지갑이 동결되면 완료가 거부되고 failed로 전이됨
#[tokio::test]
#[ignore] // requires a local Postgres
async fn test_completion_on_a_wallet_frozen_while_pending_fails() {
    let (state, db) = setup_test().await;

    use exchange_api::domains::wallet::models::wallet::WalletStatus;

    let deposit = state
        .transaction_service
        .deposit(
            TEST_USER_ID,
            DepositRequest {
                currency: "BTC".to_string(),
                wallet_type: None,
                amount: dec!(1.0),
                fee: None,
                tx_hash: None,
            },
        )
        .await
        .unwrap();

    // pending 동안 관리자가 지갑을 동결
    state
        .wallet_service
        .update_wallet_status(deposit.wallet_id, WalletStatus::Frozen)
        .await
        .unwrap();

    let result = state
        .transaction_service
        .update_status(deposit.id, TransactionStatus::Completed, None)
        .await;
    assert!(matches!(result, Err(LedgerError::WalletNotActive { .. })));

    let failed = state
        .transaction_service
        .get_transaction(TEST_USER_ID, deposit.id)
        .await
        .unwrap();
    assert_eq!(failed.status, TransactionStatus::Failed);

    // 지갑 잔고는 변하지 않음
    let wallet = wallet_snapshot(&state, deposit.wallet_id).await;
    assert_eq!(wallet.balance, dec!(0));
    assert_eq!(wallet.available_balance, dec!(0));

    teardown_test(&db).await;
}

/// 지갑 스냅샷 조회 헬퍼 (테스트 전용)
async fn wallet_snapshot(state: &WalletState, wallet_id: u64) -> Wallet {
    state
        .wallet_service
        .get_wallet(TEST_USER_ID, wallet_id)
        .await
        .expect("Failed to fetch wallet snapshot")
}
