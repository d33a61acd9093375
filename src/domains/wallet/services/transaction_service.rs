use crate::shared::database::{Database, TransactionRepository, WalletRepository};
use crate::domains::wallet::ledger;
use crate::domains::wallet::models::transaction::{
    DepositRequest, Transaction, TransactionCreate, TransactionDirection, TransactionStatus,
    TransactionType, TransferRequest, WithdrawRequest,
};
use crate::domains::wallet::models::wallet::{Wallet, WalletCreate, WalletStatus, WalletType};
use crate::domains::wallet::services::wallet_service::normalize_currency;
use crate::shared::errors::LedgerError;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// 상태 갱신 결과 (갱신된 트랜잭션 + 원장이 적용된 경우 지갑 스냅샷)
/// Status update outcome (updated transaction + wallet snapshot when the ledger was applied)
#[derive(Debug)]
pub struct StatusUpdateOutcome {
    pub transaction: Transaction,
    pub wallet: Option<Wallet>,
}

/// 이체 결과 (두 leg와 두 지갑 스냅샷)
/// Transfer outcome (both legs and both wallet snapshots)
#[derive(Debug)]
pub struct TransferOutcome {
    pub debit: Transaction,
    pub credit: Transaction,
    pub source_wallet: Wallet,
    pub destination_wallet: Wallet,
}

/// 트랜잭션 서비스
/// Transaction Service
///
/// 역할:
/// - 입금/출금/이체/거래 트랜잭션 생성 (항상 pending으로 시작)
/// - 상태 갱신 경계: pending -> completed 전이 시 원장 규칙(ledger::apply)을
///   정확히 한 번 호출해 지갑 잔고를 변경
///
/// 직렬화:
/// - 원장 적용은 하나의 DB 트랜잭션 안에서 트랜잭션 row와 지갑 row를
///   SELECT ... FOR UPDATE로 잠근 채 수행됨 (지갑 row가 직렬화 단위)
/// - 이체는 두 지갑을 id 오름차순으로 잠가 교착을 피하고, 두 leg가
///   함께 커밋되거나 함께 롤백됨
///
/// 실패 처리:
/// - InsufficientFunds / WalletNotActive / CurrencyMismatch는 롤백 후
///   트랜잭션을 failed로 강제 전이시킴 (pending으로 남지 않음)
/// - 어떤 실패 경로도 지갑 잔고를 변경하지 않음
#[derive(Clone)]
pub struct TransactionService {
    db: Database,
}

impl TransactionService {
    /// 생성자
    /// Constructor
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // =====================================================
    // 트랜잭션 생성 (Creation)
    // =====================================================

    /// 입금 트랜잭션 생성 (pending)
    /// Create a deposit transaction (pending)
    ///
    /// (통화, 타입) 지갑이 없으면 자동 생성됨 (첫 입금 시 지갑 생성)
    /// The (currency, type) wallet is auto-created on first deposit
    pub async fn deposit(
        &self,
        user_id: u64,
        request: DepositRequest,
    ) -> Result<Transaction, LedgerError> {
        let currency = normalize_currency(&request.currency)?;
        let fee = request.fee.unwrap_or(Decimal::ZERO);
        validate_amounts(request.amount, fee)?;

        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        let wallet = wallet_repo
            .create_or_get(&WalletCreate {
                user_id,
                currency: currency.clone(),
                wallet_type: request.wallet_type.unwrap_or(WalletType::Spot),
            })
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to get deposit wallet: {}", e)))?;

        // frozen/closed 지갑으로의 입금은 생성 시점에 거부
        // Deposits into a frozen/closed wallet are rejected at creation
        if wallet.status != WalletStatus::Active {
            return Err(LedgerError::WalletNotActive {
                wallet_id: wallet.id,
                status: wallet.status.as_str().to_string(),
            });
        }

        let transaction_repo = TransactionRepository::new(self.db.pool().clone());
        transaction_repo
            .create(&TransactionCreate {
                wallet_id: wallet.id,
                user_id,
                transaction_type: TransactionType::Deposit,
                direction: TransactionDirection::Credit,
                amount: request.amount,
                fee,
                currency,
                tx_hash: request.tx_hash,
            })
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to create deposit: {}", e)))
    }

    /// 출금 트랜잭션 생성 (pending)
    /// Create a withdrawal transaction (pending)
    pub async fn withdraw(
        &self,
        user_id: u64,
        request: WithdrawRequest,
    ) -> Result<Transaction, LedgerError> {
        let fee = request.fee.unwrap_or(Decimal::ZERO);
        validate_amounts(request.amount, fee)?;

        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        let wallet = wallet_repo
            .get_by_id(request.wallet_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
            .ok_or(LedgerError::WalletNotFound { id: request.wallet_id })?;

        if wallet.user_id != user_id {
            return Err(LedgerError::NotWalletOwner { wallet_id: wallet.id });
        }
        if wallet.status != WalletStatus::Active {
            return Err(LedgerError::WalletNotActive {
                wallet_id: wallet.id,
                status: wallet.status.as_str().to_string(),
            });
        }

        // 사전 잔고 확인 (최종 판정은 완료 시점에 row 잠금 아래에서 다시 수행됨)
        // Advisory funds check (the final verdict happens under the row lock at completion)
        if wallet.available_balance < request.amount || wallet.balance < request.amount + fee {
            return Err(LedgerError::InsufficientFunds {
                wallet_id: wallet.id,
                details: format!(
                    "requested {} (fee {}) but available is {} of {}",
                    request.amount, fee, wallet.available_balance, wallet.balance
                ),
            });
        }

        let transaction_repo = TransactionRepository::new(self.db.pool().clone());
        transaction_repo
            .create(&TransactionCreate {
                wallet_id: wallet.id,
                user_id,
                transaction_type: TransactionType::Withdrawal,
                direction: TransactionDirection::Debit,
                amount: request.amount,
                fee,
                currency: wallet.currency,
                tx_hash: None,
            })
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to create withdrawal: {}", e)))
    }

    /// 이체 (같은 통화의 지갑 간, 두 leg가 함께 성공하거나 함께 실패)
    /// Transfer (between same-currency wallets; both legs succeed or fail together)
    pub async fn transfer(
        &self,
        user_id: u64,
        request: TransferRequest,
    ) -> Result<TransferOutcome, LedgerError> {
        let fee = request.fee.unwrap_or(Decimal::ZERO);
        validate_amounts(request.amount, fee)?;

        if request.from_wallet_id == request.to_wallet_id {
            return Err(LedgerError::InvalidAmount(
                "source and destination wallets must differ".to_string(),
            ));
        }

        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        let source = wallet_repo
            .get_by_id(request.from_wallet_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch source wallet: {}", e)))?
            .ok_or(LedgerError::WalletNotFound { id: request.from_wallet_id })?;

        if source.user_id != user_id {
            return Err(LedgerError::NotWalletOwner { wallet_id: source.id });
        }

        let destination = wallet_repo
            .get_by_id(request.to_wallet_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch destination wallet: {}", e)))?
            .ok_or(LedgerError::WalletNotFound { id: request.to_wallet_id })?;

        if source.currency != destination.currency {
            return Err(LedgerError::CurrencyMismatch {
                wallet_currency: destination.currency.clone(),
                transaction_currency: source.currency.clone(),
            });
        }

        // 두 leg를 하나의 DB 트랜잭션 안에서 생성하고 서로 연결
        // Create both legs inside one DB transaction and link them
        let reference = format!("TRF-{}", Uuid::new_v4());
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());

        let mut db_tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let debit_leg = transaction_repo
            .create_in_tx(&mut db_tx, &TransactionCreate {
                wallet_id: source.id,
                user_id,
                transaction_type: TransactionType::Transfer,
                direction: TransactionDirection::Debit,
                amount: request.amount,
                fee,
                currency: source.currency.clone(),
                tx_hash: Some(format!("{}-out", reference)),
            })
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to create debit leg: {}", e)))?;

        // 반대쪽 credit leg (도착 지갑 소유자의 트랜잭션으로 기록)
        // The mirrored credit leg (recorded as the destination owner's transaction)
        let credit_leg = transaction_repo
            .create_in_tx(&mut db_tx, &TransactionCreate {
                wallet_id: destination.id,
                user_id: destination.user_id,
                transaction_type: TransactionType::Transfer,
                direction: TransactionDirection::Credit,
                amount: request.amount,
                fee: Decimal::ZERO, // 수수료는 출발 지갑에서만 차감
                currency: destination.currency.clone(),
                tx_hash: Some(format!("{}-in", reference)),
            })
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to create credit leg: {}", e)))?;

        transaction_repo
            .set_counterpart(&mut db_tx, debit_leg.id, credit_leg.id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to link transfer legs: {}", e)))?;
        transaction_repo
            .set_counterpart(&mut db_tx, credit_leg.id, debit_leg.id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to link transfer legs: {}", e)))?;

        db_tx
            .commit()
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to commit transfer legs: {}", e)))?;

        // 두 leg를 원자적으로 완료 (실패 시 둘 다 failed로 전이)
        // Complete both legs atomically (both forced failed on rejection)
        let (debit, credit, source_wallet, destination_wallet) =
            self.complete_transfer_pair(debit_leg.id, credit_leg.id).await?;

        Ok(TransferOutcome {
            debit,
            credit,
            source_wallet,
            destination_wallet,
        })
    }

    /// 거래 체결 기록 (단일 credit leg; 반대 자산의 debit leg는 기록하지 않음)
    /// Book a trade fill (single credit leg; the counter-asset debit leg is not recorded)
    ///
    /// 생성 즉시 원장 적용 경로를 통해 완료됨
    /// Completed immediately through the ledger application path
    pub async fn execute_trade(
        &self,
        user_id: u64,
        currency: &str,
        wallet_type: WalletType,
        amount: Decimal,
        fee: Decimal,
    ) -> Result<(Transaction, Wallet), LedgerError> {
        let currency = normalize_currency(currency)?;
        validate_amounts(amount, fee)?;

        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        let wallet = wallet_repo
            .create_or_get(&WalletCreate {
                user_id,
                currency: currency.clone(),
                wallet_type,
            })
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to get trade wallet: {}", e)))?;

        if wallet.status != WalletStatus::Active {
            return Err(LedgerError::WalletNotActive {
                wallet_id: wallet.id,
                status: wallet.status.as_str().to_string(),
            });
        }

        let transaction_repo = TransactionRepository::new(self.db.pool().clone());
        let trade = transaction_repo
            .create(&TransactionCreate {
                wallet_id: wallet.id,
                user_id,
                transaction_type: TransactionType::Trade,
                direction: TransactionDirection::Credit,
                amount,
                fee,
                currency,
                tx_hash: Some(format!("TRD-{}", Uuid::new_v4())),
            })
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to create trade: {}", e)))?;

        self.complete_single(trade.id).await
    }

    // =====================================================
    // 상태 갱신 경계 (The status-update boundary)
    // =====================================================

    /// 트랜잭션 상태 갱신 (트랜잭션 id + 목표 상태 in, 갱신된 상태 + 지갑 스냅샷 out)
    /// Update a transaction's status (transaction id + target status in,
    /// updated status + wallet snapshot out)
    ///
    /// pending -> completed 전이만 원장을 적용함. 종료 상태에서의 어떤 전이도
    /// InvalidStateTransition으로 거부되고 잔고는 변하지 않음 (멱등성 가드)
    /// Only pending -> completed applies the ledger. Any transition out of a
    /// terminal state is rejected with InvalidStateTransition and balances are
    /// untouched (the idempotency guard)
    pub async fn update_status(
        &self,
        transaction_id: u64,
        target: TransactionStatus,
        reason: Option<String>,
    ) -> Result<StatusUpdateOutcome, LedgerError> {
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());

        // 잠금 없이 먼저 조회해 전이 가능 여부와 transfer 여부를 확인
        // (잠금 아래에서 다시 검증됨; 여기서는 빠른 거부와 pair 파악용)
        // Unlocked pre-read for a fast reject and to discover the transfer pair
        // (re-validated under the row lock)
        let existing = transaction_repo
            .get_by_id(transaction_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch transaction: {}", e)))?
            .ok_or(LedgerError::TransactionNotFound { id: transaction_id })?;

        if !existing.status.can_transition_to(target) {
            return Err(LedgerError::InvalidStateTransition {
                from: existing.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }

        match target {
            TransactionStatus::Completed => {
                if existing.transaction_type == TransactionType::Transfer {
                    let counterpart_id = existing.counterpart_id.ok_or_else(|| {
                        LedgerError::DatabaseError(format!(
                            "transfer {} has no counterpart leg",
                            transaction_id
                        ))
                    })?;

                    let (debit, credit, source_wallet, destination_wallet) =
                        self.complete_transfer_pair(transaction_id, counterpart_id).await?;

                    // 요청된 leg와 그 지갑 스냅샷을 반환
                    // Return the requested leg and its wallet snapshot
                    let (transaction, wallet) = if debit.id == transaction_id {
                        (debit, source_wallet)
                    } else {
                        (credit, destination_wallet)
                    };

                    Ok(StatusUpdateOutcome {
                        transaction,
                        wallet: Some(wallet),
                    })
                } else {
                    let (transaction, wallet) = self.complete_single(transaction_id).await?;
                    Ok(StatusUpdateOutcome {
                        transaction,
                        wallet: Some(wallet),
                    })
                }
            }
            TransactionStatus::Failed | TransactionStatus::Cancelled => {
                let transaction = self
                    .transition_to_terminal(
                        transaction_id,
                        existing.counterpart_id,
                        target,
                        reason.as_deref(),
                    )
                    .await?;
                Ok(StatusUpdateOutcome {
                    transaction,
                    wallet: None,
                })
            }
            // can_transition_to가 pending을 이미 거부함
            // can_transition_to already rejected pending
            TransactionStatus::Pending => unreachable!("pending is never a transition target"),
        }
    }

    // =====================================================
    // 조회 (Queries)
    // =====================================================

    /// 트랜잭션 조회 (소유자 확인 포함)
    /// Get transaction (with ownership check)
    pub async fn get_transaction(
        &self,
        user_id: u64,
        transaction_id: u64,
    ) -> Result<Transaction, LedgerError> {
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());

        let transaction = transaction_repo
            .get_by_id(transaction_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch transaction: {}", e)))?
            .ok_or(LedgerError::TransactionNotFound { id: transaction_id })?;

        if transaction.user_id != user_id {
            return Err(LedgerError::NotWalletOwner {
                wallet_id: transaction.wallet_id,
            });
        }

        Ok(transaction)
    }

    /// 사용자의 모든 트랜잭션 조회 (최신순)
    /// Get all of a user's transactions (newest first)
    pub async fn list_user_transactions(
        &self,
        user_id: u64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());

        transaction_repo
            .get_all_by_user(user_id, limit, offset)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch transactions: {}", e)))
    }

    /// 전체 트랜잭션 조회 (관리자 대시보드용)
    /// List all transactions (for the admin dashboard)
    pub async fn list_all_transactions(
        &self,
        status: Option<TransactionStatus>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());

        transaction_repo
            .list_all(status, limit, offset)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch transactions: {}", e)))
    }

    // =====================================================
    // 원장 적용 (Ledger application)
    // =====================================================

    /// 단일 트랜잭션 완료: row 잠금 -> 상태 기계 검증 -> 원장 평가 -> 기록
    /// Complete a single transaction: lock rows -> validate the state machine ->
    /// evaluate the ledger rule -> persist
    async fn complete_single(
        &self,
        transaction_id: u64,
    ) -> Result<(Transaction, Wallet), LedgerError> {
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());
        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        let mut db_tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let txn = transaction_repo
            .lock_by_id(&mut db_tx, transaction_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to lock transaction: {}", e)))?
            .ok_or(LedgerError::TransactionNotFound { id: transaction_id })?;

        // 상태 기계: pending에서만 completed로 전이 가능 (재시도는 여기서 멈춤)
        // State machine: only pending may enter completed (retries stop here)
        if !txn.status.can_transition_to(TransactionStatus::Completed) {
            let _ = db_tx.rollback().await;
            return Err(LedgerError::InvalidStateTransition {
                from: txn.status.as_str().to_string(),
                to: TransactionStatus::Completed.as_str().to_string(),
            });
        }

        // 멱등성 백스톱: pending인데 processed_at이 있으면 재적용이 감지된 것
        // Idempotency backstop: pending with processed_at set means a detected re-application
        if txn.processed_at.is_some() {
            let _ = db_tx.rollback().await;
            tracing::error!(
                transaction_id,
                "duplicate ledger application detected on a pending transaction"
            );
            return Err(LedgerError::DuplicateApplication { transaction_id });
        }

        let wallet = wallet_repo
            .lock_by_id(&mut db_tx, txn.wallet_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to lock wallet: {}", e)))?
            .ok_or(LedgerError::WalletNotFound { id: txn.wallet_id })?;

        match ledger::apply(&wallet, &txn) {
            Ok(applied) => {
                let updated_wallet = wallet_repo
                    .update_balances(&mut db_tx, wallet.id, applied.balance, applied.available_balance)
                    .await
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to update balances: {}", e)))?;

                let completed = transaction_repo
                    .mark_completed(&mut db_tx, txn.id, Utc::now())
                    .await
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to mark completed: {}", e)))?;

                db_tx
                    .commit()
                    .await
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to commit: {}", e)))?;

                tracing::info!(
                    transaction_id = completed.id,
                    wallet_id = updated_wallet.id,
                    "ledger applied"
                );

                Ok((completed, updated_wallet))
            }
            Err(e) => {
                // 잔고는 변경하지 않고 롤백; 거부 사유가 되는 에러는 failed로 강제 전이
                // Roll back without touching balances; rejections force the row to failed
                let _ = db_tx.rollback().await;
                self.force_failed_if_rejected(&transaction_repo, &[txn.id], &e).await;
                Err(e)
            }
        }
    }

    /// 이체 pair 완료: 두 leg와 두 지갑을 잠그고 함께 커밋하거나 함께 롤백
    /// Complete a transfer pair: lock both legs and both wallets, commit or roll back together
    async fn complete_transfer_pair(
        &self,
        leg_id: u64,
        counterpart_id: u64,
    ) -> Result<(Transaction, Transaction, Wallet, Wallet), LedgerError> {
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());
        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        let mut db_tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        // leg row들을 id 오름차순으로 잠금 (완료 재시도 간 교착 방지)
        // Lock the leg rows in ascending id order (avoids deadlock between retried completions)
        let (first_id, second_id) = if leg_id < counterpart_id {
            (leg_id, counterpart_id)
        } else {
            (counterpart_id, leg_id)
        };

        let first = transaction_repo
            .lock_by_id(&mut db_tx, first_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to lock transfer leg: {}", e)))?
            .ok_or(LedgerError::TransactionNotFound { id: first_id })?;
        let second = transaction_repo
            .lock_by_id(&mut db_tx, second_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to lock transfer leg: {}", e)))?
            .ok_or(LedgerError::TransactionNotFound { id: second_id })?;

        // 두 leg 모두 pending이어야 함
        // Both legs must still be pending
        for leg in [&first, &second] {
            if !leg.status.can_transition_to(TransactionStatus::Completed) {
                let _ = db_tx.rollback().await;
                return Err(LedgerError::InvalidStateTransition {
                    from: leg.status.as_str().to_string(),
                    to: TransactionStatus::Completed.as_str().to_string(),
                });
            }
            if leg.processed_at.is_some() {
                let _ = db_tx.rollback().await;
                tracing::error!(
                    transaction_id = leg.id,
                    "duplicate ledger application detected on a pending transfer leg"
                );
                return Err(LedgerError::DuplicateApplication { transaction_id: leg.id });
            }
        }

        // debit leg와 credit leg 식별
        // Identify the debit and credit legs
        let (debit_leg, credit_leg) = match (first.direction, second.direction) {
            (TransactionDirection::Debit, TransactionDirection::Credit) => (first, second),
            (TransactionDirection::Credit, TransactionDirection::Debit) => (second, first),
            _ => {
                let _ = db_tx.rollback().await;
                return Err(LedgerError::DatabaseError(format!(
                    "transfer pair {}/{} does not have one debit and one credit leg",
                    first_id, second_id
                )));
            }
        };

        // 지갑 row들을 id 오름차순으로 잠금 (고정된 잠금 순서로 교착 방지)
        // Lock wallet rows in ascending id order (fixed lock order avoids deadlock)
        let mut wallet_ids = [debit_leg.wallet_id, credit_leg.wallet_id];
        wallet_ids.sort_unstable();

        let mut locked = Vec::with_capacity(2);
        for wallet_id in wallet_ids {
            let wallet = wallet_repo
                .lock_by_id(&mut db_tx, wallet_id)
                .await
                .map_err(|e| LedgerError::DatabaseError(format!("Failed to lock wallet: {}", e)))?
                .ok_or(LedgerError::WalletNotFound { id: wallet_id })?;
            locked.push(wallet);
        }

        let source_wallet = locked
            .iter()
            .find(|w| w.id == debit_leg.wallet_id)
            .cloned()
            .ok_or(LedgerError::WalletNotFound { id: debit_leg.wallet_id })?;
        let destination_wallet = locked
            .iter()
            .find(|w| w.id == credit_leg.wallet_id)
            .cloned()
            .ok_or(LedgerError::WalletNotFound { id: credit_leg.wallet_id })?;

        // 두 leg를 각각 원장 규칙으로 평가 (둘 중 하나라도 거부되면 전체 롤백)
        // Evaluate each leg against the ledger rule (one rejection rolls back both)
        let applied = ledger::apply(&source_wallet, &debit_leg)
            .and_then(|applied_source| {
                ledger::apply(&destination_wallet, &credit_leg)
                    .map(|applied_destination| (applied_source, applied_destination))
            });

        match applied {
            Ok((applied_source, applied_destination)) => {
                let updated_source = wallet_repo
                    .update_balances(
                        &mut db_tx,
                        source_wallet.id,
                        applied_source.balance,
                        applied_source.available_balance,
                    )
                    .await
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to update balances: {}", e)))?;
                let updated_destination = wallet_repo
                    .update_balances(
                        &mut db_tx,
                        destination_wallet.id,
                        applied_destination.balance,
                        applied_destination.available_balance,
                    )
                    .await
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to update balances: {}", e)))?;

                let processed_at = Utc::now();
                let completed_debit = transaction_repo
                    .mark_completed(&mut db_tx, debit_leg.id, processed_at)
                    .await
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to mark completed: {}", e)))?;
                let completed_credit = transaction_repo
                    .mark_completed(&mut db_tx, credit_leg.id, processed_at)
                    .await
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to mark completed: {}", e)))?;

                db_tx
                    .commit()
                    .await
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to commit: {}", e)))?;

                tracing::info!(
                    debit_id = completed_debit.id,
                    credit_id = completed_credit.id,
                    "transfer applied"
                );

                Ok((
                    completed_debit,
                    completed_credit,
                    updated_source,
                    updated_destination,
                ))
            }
            Err(e) => {
                // 한쪽 leg라도 거부되면 양쪽 모두 롤백되고 failed로 전이
                // A single rejected leg rolls back both and forces both to failed
                let _ = db_tx.rollback().await;
                self.force_failed_if_rejected(&transaction_repo, &[debit_leg.id, credit_leg.id], &e)
                    .await;
                Err(e)
            }
        }
    }

    /// failed/cancelled로의 전이 (원장 적용 없음; transfer는 pair 전체에 적용)
    /// Transition to failed/cancelled (no ledger application; applies to the whole transfer pair)
    async fn transition_to_terminal(
        &self,
        transaction_id: u64,
        counterpart_id: Option<u64>,
        target: TransactionStatus,
        reason: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());

        let mut db_tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        // transfer pair는 완료 경로와 같은 오름차순 잠금 순서를 사용
        // Transfer pairs use the same ascending lock order as the completion path
        let mut ids = match counterpart_id {
            Some(counterpart_id) => vec![transaction_id, counterpart_id],
            None => vec![transaction_id],
        };
        ids.sort_unstable();

        let mut requested = None;
        for id in &ids {
            let txn = transaction_repo
                .lock_by_id(&mut db_tx, *id)
                .await
                .map_err(|e| LedgerError::DatabaseError(format!("Failed to lock transaction: {}", e)))?
                .ok_or(LedgerError::TransactionNotFound { id: *id })?;

            if !txn.status.can_transition_to(target) {
                let _ = db_tx.rollback().await;
                return Err(LedgerError::InvalidStateTransition {
                    from: txn.status.as_str().to_string(),
                    to: target.as_str().to_string(),
                });
            }

            let updated = transaction_repo
                .update_status_in_tx(&mut db_tx, *id, target, reason)
                .await
                .map_err(|e| LedgerError::DatabaseError(format!("Failed to update status: {}", e)))?;

            if updated.id == transaction_id {
                requested = Some(updated);
            }
        }

        db_tx
            .commit()
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to commit: {}", e)))?;

        requested.ok_or(LedgerError::TransactionNotFound { id: transaction_id })
    }

    /// 거부 사유가 되는 에러면 해당 트랜잭션들을 failed로 강제 전이
    /// Force the transactions to failed when the error is a ledger rejection
    ///
    /// pending에 머물러 있지 않도록 실패 사유와 함께 기록됨
    /// Persisted with the failure reason so rows never stay stuck pending
    async fn force_failed_if_rejected(
        &self,
        transaction_repo: &TransactionRepository,
        transaction_ids: &[u64],
        error: &LedgerError,
    ) {
        let rejected = matches!(
            error,
            LedgerError::InsufficientFunds { .. }
                | LedgerError::WalletNotActive { .. }
                | LedgerError::CurrencyMismatch { .. }
        );
        if !rejected {
            return;
        }

        let reason = error.to_string();
        for &transaction_id in transaction_ids {
            if let Err(e) = transaction_repo.mark_failed(transaction_id, &reason).await {
                tracing::error!(
                    transaction_id,
                    error = %e,
                    "failed to persist failed status after ledger rejection"
                );
            } else {
                tracing::warn!(transaction_id, reason = %reason, "transaction failed");
            }
        }
    }
}

/// 요청 금액/수수료 검증 (금액은 양수, 수수료는 음수 불가)
/// Validate request amount/fee (amount must be positive, fee non-negative)
fn validate_amounts(amount: Decimal, fee: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if fee < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "fee must be non-negative, got {}",
            fee
        )));
    }
    Ok(())
}
