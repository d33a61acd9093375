// =====================================================
// 원장 적용 규칙 (Ledger application rule)
// =====================================================
// 역할: 트랜잭션이 completed로 전이될 때 지갑 잔고에 줄 효과를 계산
// 설명: 순수 함수 (DB 접근 없음). 호출자(TransactionService)가
//       지갑/트랜잭션 row를 잠근 뒤 이 규칙을 평가하고 결과를 기록함
//
// 효과:
// - credit: balance += amount, available += (amount - fee)
// - debit:  balance -= (amount + fee), available -= amount
//
// 가드: 적용 결과가 지갑 불변식(balance >= 0, 0 <= available <= balance)을
// 깨뜨리면 InsufficientFunds로 거부되고 지갑은 그대로 유지됨
// =====================================================

use rust_decimal::Decimal;

use crate::domains::wallet::models::transaction::{Transaction, TransactionDirection};
use crate::domains::wallet::models::wallet::{Wallet, WalletStatus};
use crate::shared::errors::LedgerError;

/// 원장 적용 후의 지갑 잔고
/// Wallet balances after a ledger application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedBalances {
    pub balance: Decimal,
    pub available_balance: Decimal,
}

/// 한 트랜잭션이 잔고에 주는 변화량
/// The deltas a single transaction applies to the balances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEffect {
    pub balance_delta: Decimal,
    pub available_delta: Decimal,
}

impl LedgerEffect {
    /// 방향/금액/수수료로 변화량 계산
    /// Compute the deltas from direction, amount and fee
    pub fn for_entry(direction: TransactionDirection, amount: Decimal, fee: Decimal) -> Self {
        match direction {
            TransactionDirection::Credit => Self {
                balance_delta: amount,
                available_delta: amount - fee,
            },
            TransactionDirection::Debit => Self {
                balance_delta: -(amount + fee),
                available_delta: -amount,
            },
        }
    }
}

/// 트랜잭션을 지갑 스냅샷에 적용했을 때의 새 잔고 계산
/// Compute the new balances from applying a transaction to a wallet snapshot
///
/// 어떤 실패 경로에서도 지갑은 변경되지 않음 (읽기 전용 평가)
/// No failure path mutates the wallet (read-only evaluation)
pub fn apply(wallet: &Wallet, transaction: &Transaction) -> Result<AppliedBalances, LedgerError> {
    // 1. frozen/closed 지갑은 잔고 변경 거부
    if wallet.status != WalletStatus::Active {
        return Err(LedgerError::WalletNotActive {
            wallet_id: wallet.id,
            status: wallet.status.as_str().to_string(),
        });
    }

    // 2. 트랜잭션 통화는 지갑 통화와 일치해야 함
    if transaction.currency != wallet.currency {
        return Err(LedgerError::CurrencyMismatch {
            wallet_currency: wallet.currency.clone(),
            transaction_currency: transaction.currency.clone(),
        });
    }

    // 3. 금액/수수료는 음수가 될 수 없음 (방향은 direction이 결정)
    if transaction.amount < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be non-negative, got {}",
            transaction.amount
        )));
    }
    if transaction.fee < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "fee must be non-negative, got {}",
            transaction.fee
        )));
    }

    // 4. 효과 계산
    let effect = LedgerEffect::for_entry(transaction.direction, transaction.amount, transaction.fee);
    let balance = wallet.balance + effect.balance_delta;
    let available_balance = wallet.available_balance + effect.available_delta;

    // 5. 지갑 불변식 검사: balance >= 0, 0 <= available <= balance
    if balance < Decimal::ZERO || available_balance < Decimal::ZERO {
        return Err(LedgerError::InsufficientFunds {
            wallet_id: wallet.id,
            details: format!(
                "applying {} {} (fee {}) would leave balance {} / available {}",
                transaction.direction.as_str(),
                transaction.amount,
                transaction.fee,
                balance,
                available_balance
            ),
        });
    }
    if available_balance > balance {
        return Err(LedgerError::InsufficientFunds {
            wallet_id: wallet.id,
            details: format!(
                "applying {} {} (fee {}) would leave available {} above balance {}",
                transaction.direction.as_str(),
                transaction.amount,
                transaction.fee,
                available_balance,
                balance
            ),
        });
    }

    Ok(AppliedBalances {
        balance,
        available_balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::wallet::models::transaction::{TransactionStatus, TransactionType};
    use crate::domains::wallet::models::wallet::WalletType;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn wallet(balance: Decimal, available_balance: Decimal) -> Wallet {
        Wallet {
            id: 1,
            user_id: 1,
            currency: "BTC".to_string(),
            wallet_type: WalletType::Spot,
            balance,
            available_balance,
            status: WalletStatus::Active,
            closed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn transaction(
        transaction_type: TransactionType,
        direction: TransactionDirection,
        amount: Decimal,
        fee: Decimal,
    ) -> Transaction {
        Transaction {
            id: 10,
            wallet_id: 1,
            user_id: 1,
            transaction_type,
            direction,
            amount,
            fee,
            currency: "BTC".to_string(),
            status: TransactionStatus::Pending,
            tx_hash: None,
            counterpart_id: None,
            failure_reason: None,
            processed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn deposit(amount: Decimal, fee: Decimal) -> Transaction {
        transaction(TransactionType::Deposit, TransactionDirection::Credit, amount, fee)
    }

    fn withdrawal(amount: Decimal, fee: Decimal) -> Transaction {
        transaction(TransactionType::Withdrawal, TransactionDirection::Debit, amount, fee)
    }

    #[test]
    fn test_deposit_credits_balance_and_available_minus_fee() {
        let wallet = wallet(dec!(0), dec!(0));

        let applied = apply(&wallet, &deposit(dec!(1.5), dec!(0.001))).unwrap();

        assert_eq!(applied.balance, dec!(1.5));
        assert_eq!(applied.available_balance, dec!(1.499));
    }

    #[test]
    fn test_withdrawal_debits_balance_plus_fee_and_available() {
        // 위 입금 시나리오에 이어지는 출금
        let wallet = wallet(dec!(1.5), dec!(1.499));

        let applied = apply(&wallet, &withdrawal(dec!(0.5), dec!(0.0005))).unwrap();

        assert_eq!(applied.balance, dec!(0.9995));
        assert_eq!(applied.available_balance, dec!(0.999));
    }

    #[test]
    fn test_withdrawal_beyond_balance_is_insufficient_funds() {
        let wallet = wallet(dec!(1.0), dec!(1.0));

        let result = apply(&wallet, &withdrawal(dec!(2.0), dec!(0)));

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { wallet_id: 1, .. })
        ));
        // 평가는 지갑을 변경하지 않음
        assert_eq!(wallet.balance, dec!(1.0));
        assert_eq!(wallet.available_balance, dec!(1.0));
    }

    #[test]
    fn test_withdrawal_of_entire_balance_reaches_exactly_zero() {
        let wallet = wallet(dec!(1.0), dec!(1.0));

        let applied = apply(&wallet, &withdrawal(dec!(0.9), dec!(0.1))).unwrap();

        assert_eq!(applied.balance, dec!(0.0));
        assert_eq!(applied.available_balance, dec!(0.1));
    }

    #[test]
    fn test_withdrawal_fee_pushing_available_above_balance_is_rejected() {
        // balance 2.0 / available 1.0에서 amount 0.5, fee 1.2를 빼면
        // balance 0.3 / available 0.5가 되어 available > balance
        let wallet = wallet(dec!(2.0), dec!(1.0));

        let result = apply(&wallet, &withdrawal(dec!(0.5), dec!(1.2)));

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
    }

    #[test]
    fn test_withdrawal_exceeding_available_is_rejected() {
        // balance는 충분하지만 available이 부족한 경우
        let wallet = wallet(dec!(5.0), dec!(0.5));

        let result = apply(&wallet, &withdrawal(dec!(1.0), dec!(0)));

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
    }

    #[test]
    fn test_deposit_fee_larger_than_amount_needs_available_cover() {
        // fee > amount인 credit은 available을 깎음: 기존 available이 이를 감당해야 함
        let covered = wallet(dec!(10), dec!(10));
        let applied = apply(&covered, &deposit(dec!(1), dec!(2))).unwrap();
        assert_eq!(applied.balance, dec!(11));
        assert_eq!(applied.available_balance, dec!(9));

        let empty = wallet(dec!(0), dec!(0));
        let result = apply(&empty, &deposit(dec!(1), dec!(2)));
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
    }

    #[test]
    fn test_trade_is_applied_as_credit() {
        let wallet = wallet(dec!(0), dec!(0));
        let trade = transaction(
            TransactionType::Trade,
            TransactionDirection::Credit,
            dec!(3.0),
            dec!(0.003),
        );

        let applied = apply(&wallet, &trade).unwrap();

        assert_eq!(applied.balance, dec!(3.0));
        assert_eq!(applied.available_balance, dec!(2.997));
    }

    #[test]
    fn test_fee_charge_is_applied_as_debit() {
        let wallet = wallet(dec!(1.0), dec!(1.0));
        let fee_charge = transaction(
            TransactionType::Fee,
            TransactionDirection::Debit,
            dec!(0.25),
            dec!(0),
        );

        let applied = apply(&wallet, &fee_charge).unwrap();

        assert_eq!(applied.balance, dec!(0.75));
        assert_eq!(applied.available_balance, dec!(0.75));
    }

    #[test]
    fn test_transfer_legs_apply_by_direction() {
        let source = wallet(dec!(5.0), dec!(5.0));
        let out_leg = transaction(
            TransactionType::Transfer,
            TransactionDirection::Debit,
            dec!(2.0),
            dec!(0),
        );
        let applied = apply(&source, &out_leg).unwrap();
        assert_eq!(applied.balance, dec!(3.0));
        assert_eq!(applied.available_balance, dec!(3.0));

        let destination = wallet(dec!(0.0), dec!(0.0));
        let in_leg = transaction(
            TransactionType::Transfer,
            TransactionDirection::Credit,
            dec!(2.0),
            dec!(0),
        );
        let applied = apply(&destination, &in_leg).unwrap();
        assert_eq!(applied.balance, dec!(2.0));
        assert_eq!(applied.available_balance, dec!(2.0));
    }

    #[test]
    fn test_frozen_wallet_rejects_mutation() {
        let mut frozen = wallet(dec!(10), dec!(10));
        frozen.status = WalletStatus::Frozen;

        let result = apply(&frozen, &deposit(dec!(1), dec!(0)));

        assert_eq!(
            result,
            Err(LedgerError::WalletNotActive {
                wallet_id: 1,
                status: "frozen".to_string(),
            })
        );
    }

    #[test]
    fn test_closed_wallet_rejects_mutation() {
        let mut closed = wallet(dec!(0), dec!(0));
        closed.status = WalletStatus::Closed;

        let result = apply(&closed, &deposit(dec!(1), dec!(0)));

        assert!(matches!(result, Err(LedgerError::WalletNotActive { .. })));
    }

    #[test]
    fn test_currency_mismatch_is_rejected() {
        let wallet = wallet(dec!(10), dec!(10));
        let mut foreign = deposit(dec!(1), dec!(0));
        foreign.currency = "ETH".to_string();

        let result = apply(&wallet, &foreign);

        assert_eq!(
            result,
            Err(LedgerError::CurrencyMismatch {
                wallet_currency: "BTC".to_string(),
                transaction_currency: "ETH".to_string(),
            })
        );
    }

    #[test]
    fn test_negative_amount_and_fee_are_rejected() {
        let wallet = wallet(dec!(10), dec!(10));

        let mut negative_amount = deposit(dec!(1), dec!(0));
        negative_amount.amount = dec!(-1);
        assert!(matches!(
            apply(&wallet, &negative_amount),
            Err(LedgerError::InvalidAmount(_))
        ));

        let mut negative_fee = deposit(dec!(1), dec!(0));
        negative_fee.fee = dec!(-0.1);
        assert!(matches!(
            apply(&wallet, &negative_fee),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_effect_deltas_match_rule() {
        let credit = LedgerEffect::for_entry(TransactionDirection::Credit, dec!(1.5), dec!(0.001));
        assert_eq!(credit.balance_delta, dec!(1.5));
        assert_eq!(credit.available_delta, dec!(1.499));

        let debit = LedgerEffect::for_entry(TransactionDirection::Debit, dec!(0.5), dec!(0.0005));
        assert_eq!(debit.balance_delta, dec!(-0.5005));
        assert_eq!(debit.available_delta, dec!(-0.5));
    }
}
