use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::domain::{Wallet, WalletId};

use super::MIGRATION_001_INITIAL;

/// How long a writer waits for the database lock before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Repository for persisting and querying wallets.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database.
    /// Pass `?mode=rwc` in the URL to create the file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_timeout(database_url, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Connect with an explicit busy timeout for lock acquisition.
    pub async fn connect_with_timeout(database_url: &str, busy_timeout: Duration) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(busy_timeout);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Insert a new wallet. Used for out-of-band provisioning only.
    pub async fn insert_wallet(&self, wallet: &Wallet) -> Result<()> {
        sqlx::query("INSERT INTO wallets (id, balance) VALUES (?, ?)")
            .bind(wallet.id.to_string())
            .bind(wallet.balance.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to insert wallet")?;
        Ok(())
    }

    /// Get a wallet by ID. Sees committed data only.
    pub async fn get_wallet(&self, id: WalletId) -> Result<Option<Wallet>> {
        let row = sqlx::query("SELECT id, balance FROM wallets WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch wallet")?;

        row.as_ref().map(row_to_wallet).transpose()
    }

    /// Start a read-modify-write unit. See [`WalletTx`].
    pub async fn begin(&self) -> Result<WalletTx> {
        let tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;
        Ok(WalletTx { tx })
    }
}

/// A single atomic load/mutate/save unit over one wallet.
///
/// Dropping the handle without calling [`WalletTx::commit`] rolls back.
pub struct WalletTx {
    tx: Transaction<'static, Sqlite>,
}

impl WalletTx {
    /// Take the write lock on the wallet row, then load it.
    ///
    /// The no-op UPDATE must be the first statement in the transaction: it
    /// acquires the write lock before any read snapshot exists, so a
    /// concurrent writer on the same wallet waits for this one to finish and
    /// then reads the committed balance.
    pub async fn lock_wallet(&mut self, id: WalletId) -> Result<Option<Wallet>> {
        let locked = sqlx::query("UPDATE wallets SET balance = balance WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *self.tx)
            .await
            .context("Failed to lock wallet")?
            .rows_affected();

        if locked == 0 {
            return Ok(None);
        }

        let row = sqlx::query("SELECT id, balance FROM wallets WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&mut *self.tx)
            .await
            .context("Failed to fetch locked wallet")?;

        Ok(Some(row_to_wallet(&row)?))
    }

    /// Persist the wallet's balance.
    pub async fn save_wallet(&mut self, wallet: &Wallet) -> Result<()> {
        let updated = sqlx::query("UPDATE wallets SET balance = ? WHERE id = ?")
            .bind(wallet.balance.to_string())
            .bind(wallet.id.to_string())
            .execute(&mut *self.tx)
            .await
            .context("Failed to save wallet")?
            .rows_affected();

        if updated != 1 {
            anyhow::bail!("Expected to update wallet {}, updated {} rows", wallet.id, updated);
        }
        Ok(())
    }

    pub async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .context("Failed to commit transaction")
    }
}

fn row_to_wallet(row: &SqliteRow) -> Result<Wallet> {
    let id_str: String = row.get("id");
    let balance_str: String = row.get("balance");

    Ok(Wallet {
        id: Uuid::parse_str(&id_str).context("Invalid wallet ID")?,
        balance: Decimal::from_str(&balance_str)
            .with_context(|| format!("Invalid stored balance: {}", balance_str))?,
    })
}
