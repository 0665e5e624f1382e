use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use slot_machine_shared::{Identity, PlayerId, SpinRecord, StoreError, StoreResult};

/// Persistence operations the game session needs.
///
/// Every call reports failure through [`StoreResult`]; whether a failure ends
/// the session is up to the caller.
#[allow(async_fn_in_trait)]
pub trait PlayerStore {
    /// Create the player and history collections if they are missing.
    async fn ensure_schema(&self) -> StoreResult<()>;
    /// Exact match on all three identity fields; lowest id wins.
    async fn find_player(&self, identity: &Identity) -> StoreResult<Option<PlayerId>>;
    /// Insert a new player. Identical identities are not rejected.
    async fn create_player(&self, identity: &Identity) -> StoreResult<PlayerId>;
    async fn set_balance(&self, id: PlayerId, amount: f64) -> StoreResult<()>;
    async fn append_spin_record(&self, record: &SpinRecord) -> StoreResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    EnsureSchema,
    FindPlayer,
    CreatePlayer,
    SetBalance,
    AppendSpinRecord,
}

impl StoreOp {
    pub fn name(self) -> &'static str {
        match self {
            StoreOp::EnsureSchema => "ensure_schema",
            StoreOp::FindPlayer => "find_player",
            StoreOp::CreatePlayer => "create_player",
            StoreOp::SetBalance => "set_balance",
            StoreOp::AppendSpinRecord => "append_spin_record",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("injected failure")]
pub struct InjectedFailure;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredPlayer {
    pub id: PlayerId,
    pub identity: Identity,
    pub balance: f64,
}

#[derive(Debug, Default)]
struct Tables {
    schema_ready: bool,
    players: Vec<StoredPlayer>,
    spins: Vec<SpinRecord>,
    last_id: i64,
}

/// In-process store used in tests and as a stand-in for SQLite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: HashSet<StoreOp>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `op` fail with a query error.
    pub fn failing_on(mut self, op: StoreOp) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn schema_ready(&self) -> bool {
        self.lock(StoreOp::EnsureSchema)
            .map(|t| t.schema_ready)
            .unwrap_or(false)
    }

    pub fn players(&self) -> Vec<StoredPlayer> {
        self.lock(StoreOp::FindPlayer)
            .map(|t| t.players.clone())
            .unwrap_or_default()
    }

    pub fn spin_records(&self) -> Vec<SpinRecord> {
        self.lock(StoreOp::AppendSpinRecord)
            .map(|t| t.spins.clone())
            .unwrap_or_default()
    }

    pub fn balance_of(&self, id: PlayerId) -> Option<f64> {
        self.players()
            .into_iter()
            .find(|p| p.id == id)
            .map(|p| p.balance)
    }

    fn check(&self, op: StoreOp) -> StoreResult<()> {
        if self.failing.contains(&op) {
            return Err(StoreError::query(op.name(), InjectedFailure));
        }
        Ok(())
    }

    fn lock(&self, op: StoreOp) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Poisoned { op: op.name() })
    }
}

impl PlayerStore for MemoryStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        self.check(StoreOp::EnsureSchema)?;
        self.lock(StoreOp::EnsureSchema)?.schema_ready = true;
        Ok(())
    }

    async fn find_player(&self, identity: &Identity) -> StoreResult<Option<PlayerId>> {
        self.check(StoreOp::FindPlayer)?;
        let tables = self.lock(StoreOp::FindPlayer)?;
        Ok(tables
            .players
            .iter()
            .find(|p| &p.identity == identity)
            .map(|p| p.id))
    }

    async fn create_player(&self, identity: &Identity) -> StoreResult<PlayerId> {
        self.check(StoreOp::CreatePlayer)?;
        let mut tables = self.lock(StoreOp::CreatePlayer)?;
        tables.last_id += 1;
        let id = PlayerId(tables.last_id);
        tables.players.push(StoredPlayer {
            id,
            identity: identity.clone(),
            balance: 0.0,
        });
        Ok(id)
    }

    async fn set_balance(&self, id: PlayerId, amount: f64) -> StoreResult<()> {
        self.check(StoreOp::SetBalance)?;
        let mut tables = self.lock(StoreOp::SetBalance)?;
        // Unknown ids update nothing, like an UPDATE matching zero rows.
        if let Some(player) = tables.players.iter_mut().find(|p| p.id == id) {
            player.balance = amount;
        }
        Ok(())
    }

    async fn append_spin_record(&self, record: &SpinRecord) -> StoreResult<()> {
        self.check(StoreOp::AppendSpinRecord)?;
        self.lock(StoreOp::AppendSpinRecord)?.spins.push(*record);
        Ok(())
    }
}
