use std::str::FromStr;
use std::time::Duration;

use slot_machine_core::PlayerStore;
use slot_machine_shared::{Identity, PlayerId, SpinLogEntry, SpinRecord, StoreError, StoreResult};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://slot_machine.db";

// Schema lives in migrations/ and is embedded at compile time.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(sqlx::FromRow)]
struct SpinRow {
    id: i64,
    player_id: Option<i64>,
    bet: f64,
    winnings: f64,
    balance: f64,
}

impl From<SpinRow> for SpinLogEntry {
    fn from(row: SpinRow) -> Self {
        Self {
            id: row.id,
            player_id: row.player_id,
            bet: row.bet,
            winnings: row.winnings,
            balance: row.balance,
        }
    }
}

/// SQLite-backed store. The pool holds a single connection owned by the
/// session for its whole lifetime.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::unavailable(format!("invalid database url {url}"), e))?
            .create_if_missing(true)
            // spin_history.player_id is a weak reference
            .foreign_keys(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::unavailable(format!("could not open {url}"), e))?;
        Ok(Self { pool })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Newest first.
    pub async fn recent_spins(&self, player: Option<i64>, limit: i64) -> StoreResult<Vec<SpinLogEntry>> {
        let rows = sqlx::query_as::<_, SpinRow>(
            "SELECT id, player_id, bet, winnings, balance FROM spin_history WHERE (? IS NULL OR player_id = ?) ORDER BY id DESC LIMIT ?",
        )
        .bind(player)
        .bind(player)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::query("recent_spins", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Oldest first.
    pub async fn all_spins(&self, player: Option<i64>) -> StoreResult<Vec<SpinLogEntry>> {
        let rows = sqlx::query_as::<_, SpinRow>(
            "SELECT id, player_id, bet, winnings, balance FROM spin_history WHERE (? IS NULL OR player_id = ?) ORDER BY id ASC",
        )
        .bind(player)
        .bind(player)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::query("all_spins", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl PlayerStore for SqliteStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::query("ensure_schema", e))
    }

    async fn find_player(&self, identity: &Identity) -> StoreResult<Option<PlayerId>> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM players WHERE name = ? AND age = ? AND card = ? ORDER BY id LIMIT 1",
        )
        .bind(&identity.name)
        .bind(identity.age)
        .bind(&identity.card)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::query("find_player", e))?;
        Ok(id.map(PlayerId))
    }

    async fn create_player(&self, identity: &Identity) -> StoreResult<PlayerId> {
        let result = sqlx::query("INSERT INTO players (name, age, card) VALUES (?, ?, ?)")
            .bind(&identity.name)
            .bind(identity.age)
            .bind(&identity.card)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::query("create_player", e))?;
        Ok(PlayerId(result.last_insert_rowid()))
    }

    async fn set_balance(&self, id: PlayerId, amount: f64) -> StoreResult<()> {
        sqlx::query("UPDATE players SET balance = ? WHERE id = ?")
            .bind(amount)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::query("set_balance", e))?;
        Ok(())
    }

    async fn append_spin_record(&self, record: &SpinRecord) -> StoreResult<()> {
        sqlx::query("INSERT INTO spin_history (player_id, bet, winnings, balance) VALUES (?, ?, ?, ?)")
            .bind(record.player_id.0)
            .bind(record.bet)
            .bind(record.winnings)
            .bind(record.balance)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::query("append_spin_record", e))?;
        Ok(())
    }
}
