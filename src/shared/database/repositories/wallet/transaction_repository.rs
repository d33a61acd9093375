use sqlx::{PgPool, Postgres, Row, Transaction as DbTransaction};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use crate::domains::wallet::models::transaction::{
    Transaction, TransactionCreate, TransactionDirection, TransactionStatus, TransactionType,
};

pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 트랜잭션 생성 (항상 pending으로 시작)
    /// Create transaction (always starts as pending)
    pub async fn create(&self, transaction_create: &TransactionCreate) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (
                wallet_id, user_id, transaction_type, direction, amount, fee,
                currency, status, tx_hash, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9, $10)
            RETURNING id, wallet_id, user_id, transaction_type, direction, amount, fee,
                      currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                      created_at, updated_at
            "#,
        )
        .bind(transaction_create.wallet_id as i64)
        .bind(transaction_create.user_id as i64)
        .bind(transaction_create.transaction_type.as_str())
        .bind(transaction_create.direction.as_str())
        .bind(&transaction_create.amount)
        .bind(&transaction_create.fee)
        .bind(&transaction_create.currency)
        .bind(&transaction_create.tx_hash)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create transaction")?;

        Self::row_to_transaction(&row)
    }

    /// 트랜잭션 생성 (DB 트랜잭션 안에서; transfer 두 leg를 원자적으로 생성할 때 사용)
    /// Create transaction inside a DB transaction (used to create both transfer legs atomically)
    pub async fn create_in_tx(
        &self,
        db_tx: &mut DbTransaction<'_, Postgres>,
        transaction_create: &TransactionCreate,
    ) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (
                wallet_id, user_id, transaction_type, direction, amount, fee,
                currency, status, tx_hash, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9, $10)
            RETURNING id, wallet_id, user_id, transaction_type, direction, amount, fee,
                      currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                      created_at, updated_at
            "#,
        )
        .bind(transaction_create.wallet_id as i64)
        .bind(transaction_create.user_id as i64)
        .bind(transaction_create.transaction_type.as_str())
        .bind(transaction_create.direction.as_str())
        .bind(&transaction_create.amount)
        .bind(&transaction_create.fee)
        .bind(&transaction_create.currency)
        .bind(&transaction_create.tx_hash)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&mut *db_tx)
        .await
        .context("Failed to create transaction")?;

        Self::row_to_transaction(&row)
    }

    /// 두 transfer leg를 서로 연결
    /// Link the two legs of a transfer to each other
    pub async fn set_counterpart(
        &self,
        db_tx: &mut DbTransaction<'_, Postgres>,
        transaction_id: u64,
        counterpart_id: u64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET counterpart_id = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(counterpart_id as i64)
        .bind(Utc::now())
        .bind(transaction_id as i64)
        .execute(&mut *db_tx)
        .await
        .context("Failed to link transfer legs")?;

        Ok(())
    }

    /// 트랜잭션 ID로 조회
    /// Get transaction by ID
    pub async fn get_by_id(&self, transaction_id: u64) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, wallet_id, user_id, transaction_type, direction, amount, fee,
                   currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                   created_at, updated_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(transaction_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction by id")?;

        row.map(|r| Self::row_to_transaction(&r)).transpose()
    }

    /// 트랜잭션 row 잠금 (SELECT ... FOR UPDATE)
    /// Lock transaction row (SELECT ... FOR UPDATE)
    ///
    /// 같은 id에 대한 완료 재시도가 직렬화되어 중복 적용을 차단함
    /// Serializes retried completions of the same id, blocking double application
    pub async fn lock_by_id(
        &self,
        db_tx: &mut DbTransaction<'_, Postgres>,
        transaction_id: u64,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, wallet_id, user_id, transaction_type, direction, amount, fee,
                   currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                   created_at, updated_at
            FROM transactions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(transaction_id as i64)
        .fetch_optional(&mut *db_tx)
        .await
        .context("Failed to lock transaction row")?;

        row.map(|r| Self::row_to_transaction(&r)).transpose()
    }

    /// 사용자의 모든 트랜잭션 조회 (최신순)
    /// Get all transactions by user ID (newest first)
    pub async fn get_all_by_user(
        &self,
        user_id: u64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let rows = sqlx::query(
            r#"
            SELECT id, wallet_id, user_id, transaction_type, direction, amount, fee,
                   currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                   created_at, updated_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id as i64)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch transactions by user")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// 지갑의 트랜잭션 내역 조회 (최신순)
    /// Get transaction history by wallet ID (newest first)
    pub async fn get_all_by_wallet(
        &self,
        wallet_id: u64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let rows = sqlx::query(
            r#"
            SELECT id, wallet_id, user_id, transaction_type, direction, amount, fee,
                   currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                   created_at, updated_at
            FROM transactions
            WHERE wallet_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(wallet_id as i64)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch transactions by wallet")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// 전체 트랜잭션 조회 (관리자 대시보드용, 상태 필터 지원)
    /// List all transactions (for the admin dashboard, optional status filter)
    pub async fn list_all(
        &self,
        status: Option<TransactionStatus>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let rows = if let Some(status) = status {
            sqlx::query(
                r#"
                SELECT id, wallet_id, user_id, transaction_type, direction, amount, fee,
                       currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                       created_at, updated_at
                FROM transactions
                WHERE status = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(status.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch transactions by status")?
        } else {
            sqlx::query(
                r#"
                SELECT id, wallet_id, user_id, transaction_type, direction, amount, fee,
                       currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                       created_at, updated_at
                FROM transactions
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch transactions")?
        };

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// 완료 기록 (processed_at은 여기서 정확히 한 번 기록됨)
    /// Mark completed (processed_at is written exactly once, here)
    pub async fn mark_completed(
        &self,
        db_tx: &mut DbTransaction<'_, Postgres>,
        transaction_id: u64,
        processed_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            UPDATE transactions
            SET status = 'completed', processed_at = $1, updated_at = $2
            WHERE id = $3
            RETURNING id, wallet_id, user_id, transaction_type, direction, amount, fee,
                      currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                      created_at, updated_at
            "#,
        )
        .bind(processed_at)
        .bind(Utc::now())
        .bind(transaction_id as i64)
        .fetch_one(&mut *db_tx)
        .await
        .context("Failed to mark transaction completed")?;

        Self::row_to_transaction(&row)
    }

    /// 종료 상태 기록 (failed/cancelled; DB 트랜잭션 안에서)
    /// Record a terminal status (failed/cancelled; inside a DB transaction)
    pub async fn update_status_in_tx(
        &self,
        db_tx: &mut DbTransaction<'_, Postgres>,
        transaction_id: u64,
        status: TransactionStatus,
        failure_reason: Option<&str>,
    ) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $1, failure_reason = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, wallet_id, user_id, transaction_type, direction, amount, fee,
                      currency, status, tx_hash, counterpart_id, failure_reason, processed_at,
                      created_at, updated_at
            "#,
        )
        .bind(status.as_str())
        .bind(failure_reason)
        .bind(Utc::now())
        .bind(transaction_id as i64)
        .fetch_one(&mut *db_tx)
        .await
        .context("Failed to update transaction status")?;

        Self::row_to_transaction(&row)
    }

    /// pending 트랜잭션을 failed로 강제 전이 (원장 적용 거부 후 호출됨)
    /// Force a pending transaction to failed (called after the ledger rejects the application)
    ///
    /// WHERE status = 'pending' 조건으로 종료 상태를 덮어쓰지 않음
    /// The WHERE status = 'pending' clause never overwrites a terminal state
    pub async fn mark_failed(&self, transaction_id: u64, reason: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET status = 'failed', failure_reason = $1, updated_at = $2
            WHERE id = $3 AND status = 'pending'
            "#,
        )
        .bind(reason)
        .bind(Utc::now())
        .bind(transaction_id as i64)
        .execute(&self.pool)
        .await
        .context("Failed to mark transaction failed")?;

        Ok(())
    }

    fn row_to_transaction(row: &sqlx::postgres::PgRow) -> Result<Transaction> {
        let transaction_type: String = row.get("transaction_type");
        let direction: String = row.get("direction");
        let status: String = row.get("status");

        Ok(Transaction {
            id: row.get::<i64, _>("id") as u64,
            wallet_id: row.get::<i64, _>("wallet_id") as u64,
            user_id: row.get::<i64, _>("user_id") as u64,
            transaction_type: TransactionType::parse(&transaction_type)
                .ok_or_else(|| anyhow!("Unknown transaction type in database: {}", transaction_type))?,
            direction: TransactionDirection::parse(&direction)
                .ok_or_else(|| anyhow!("Unknown transaction direction in database: {}", direction))?,
            amount: row.get("amount"),
            fee: row.get("fee"),
            currency: row.get("currency"),
            status: TransactionStatus::parse(&status)
                .ok_or_else(|| anyhow!("Unknown transaction status in database: {}", status))?,
            tx_hash: row.get("tx_hash"),
            counterpart_id: row.get::<Option<i64>, _>("counterpart_id").map(|id| id as u64),
            failure_reason: row.get("failure_reason"),
            processed_at: row.get("processed_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
