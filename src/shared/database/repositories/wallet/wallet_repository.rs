use sqlx::{PgPool, Postgres, Row, Transaction};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::domains::wallet::models::wallet::{Wallet, WalletCreate, WalletStatus, WalletType};

pub struct WalletRepository {
    pool: PgPool,
}

impl WalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 지갑 생성
    /// Create wallet
    pub async fn create(&self, wallet_create: &WalletCreate) -> Result<Wallet> {
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (user_id, currency, wallet_type, balance, available_balance, status, created_at, updated_at)
            VALUES ($1, $2, $3, 0, 0, 'active', $4, $5)
            RETURNING id, user_id, currency, wallet_type, balance, available_balance, status, closed_at, created_at, updated_at
            "#,
        )
        .bind(wallet_create.user_id as i64)
        .bind(&wallet_create.currency)
        .bind(wallet_create.wallet_type.as_str())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create wallet")?;

        Self::row_to_wallet(&row)
    }

    /// 지갑 생성 (또는 기존 지갑 조회)
    /// Create wallet (or get existing wallet)
    ///
    /// 첫 입금 시 지갑이 없으면 자동 생성하는 데 사용
    /// Used to auto-create a wallet on first deposit
    pub async fn create_or_get(&self, wallet_create: &WalletCreate) -> Result<Wallet> {
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (user_id, currency, wallet_type, balance, available_balance, status, created_at, updated_at)
            VALUES ($1, $2, $3, 0, 0, 'active', $4, $4)
            ON CONFLICT (user_id, currency, wallet_type)
            DO UPDATE SET updated_at = $4
            RETURNING id, user_id, currency, wallet_type, balance, available_balance, status, closed_at, created_at, updated_at
            "#,
        )
        .bind(wallet_create.user_id as i64)
        .bind(&wallet_create.currency)
        .bind(wallet_create.wallet_type.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create or get wallet")?;

        Self::row_to_wallet(&row)
    }

    /// 지갑 ID로 조회
    /// Get wallet by ID
    pub async fn get_by_id(&self, wallet_id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, currency, wallet_type, balance, available_balance, status, closed_at, created_at, updated_at
            FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(wallet_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet by id")?;

        row.map(|r| Self::row_to_wallet(&r)).transpose()
    }

    /// (사용자, 통화, 타입)으로 지갑 조회
    /// Get wallet by (user, currency, type)
    pub async fn get_by_user_currency_type(
        &self,
        user_id: u64,
        currency: &str,
        wallet_type: WalletType,
    ) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, currency, wallet_type, balance, available_balance, status, closed_at, created_at, updated_at
            FROM wallets
            WHERE user_id = $1 AND currency = $2 AND wallet_type = $3
            "#,
        )
        .bind(user_id as i64)
        .bind(currency)
        .bind(wallet_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet by user, currency and type")?;

        row.map(|r| Self::row_to_wallet(&r)).transpose()
    }

    /// 사용자의 모든 지갑 조회
    /// Get all wallets by user ID
    pub async fn get_all_by_user(&self, user_id: u64) -> Result<Vec<Wallet>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, currency, wallet_type, balance, available_balance, status, closed_at, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            ORDER BY currency ASC, wallet_type ASC
            "#,
        )
        .bind(user_id as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch wallets by user")?;

        rows.iter().map(Self::row_to_wallet).collect()
    }

    /// 지갑 row 잠금 (SELECT ... FOR UPDATE)
    /// Lock wallet row (SELECT ... FOR UPDATE)
    ///
    /// 잔고 read-modify-write 동안 지갑 row가 직렬화 단위가 됨
    /// The wallet row is the unit of serialization for the balance read-modify-write
    pub async fn lock_by_id(
        &self,
        db_tx: &mut Transaction<'_, Postgres>,
        wallet_id: u64,
    ) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, currency, wallet_type, balance, available_balance, status, closed_at, created_at, updated_at
            FROM wallets
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(wallet_id as i64)
        .fetch_optional(&mut *db_tx)
        .await
        .context("Failed to lock wallet row")?;

        row.map(|r| Self::row_to_wallet(&r)).transpose()
    }

    /// 잔고 갱신 (원장 적용 결과 기록, 잠긴 트랜잭션 안에서만 호출)
    /// Update balances (records the ledger application, only called inside a locked transaction)
    pub async fn update_balances(
        &self,
        db_tx: &mut Transaction<'_, Postgres>,
        wallet_id: u64,
        balance: Decimal,
        available_balance: Decimal,
    ) -> Result<Wallet> {
        let row = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $1, available_balance = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, user_id, currency, wallet_type, balance, available_balance, status, closed_at, created_at, updated_at
            "#,
        )
        .bind(balance)
        .bind(available_balance)
        .bind(Utc::now())
        .bind(wallet_id as i64)
        .fetch_one(&mut *db_tx)
        .await
        .context("Failed to update wallet balances")?;

        Self::row_to_wallet(&row)
    }

    /// 지갑 상태 변경 (freeze/unfreeze/close)
    /// Update wallet status (freeze/unfreeze/close)
    ///
    /// close 시 closed_at을 기록 (soft-close, 삭제 아님)
    /// Records closed_at on close (soft-close, never a delete)
    pub async fn update_status(
        &self,
        wallet_id: u64,
        status: WalletStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<Wallet> {
        let row = sqlx::query(
            r#"
            UPDATE wallets
            SET status = $1, closed_at = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, user_id, currency, wallet_type, balance, available_balance, status, closed_at, created_at, updated_at
            "#,
        )
        .bind(status.as_str())
        .bind(closed_at)
        .bind(Utc::now())
        .bind(wallet_id as i64)
        .fetch_one(&self.pool)
        .await
        .context("Failed to update wallet status")?;

        Self::row_to_wallet(&row)
    }

    fn row_to_wallet(row: &sqlx::postgres::PgRow) -> Result<Wallet> {
        let wallet_type: String = row.get("wallet_type");
        let status: String = row.get("status");

        Ok(Wallet {
            id: row.get::<i64, _>("id") as u64,
            user_id: row.get::<i64, _>("user_id") as u64,
            currency: row.get("currency"),
            wallet_type: WalletType::parse(&wallet_type)
                .ok_or_else(|| anyhow!("Unknown wallet type in database: {}", wallet_type))?,
            balance: row.get("balance"),
            available_balance: row.get("available_balance"),
            status: WalletStatus::parse(&status)
                .ok_or_else(|| anyhow!("Unknown wallet status in database: {}", status))?,
            closed_at: row.get("closed_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
