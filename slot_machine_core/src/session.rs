//! Interactive game session: identify the player, fund them, then spin until
//! they quit.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use slot_machine_shared::{Identity, PlayerId, SpinRecord, StoreError, StoreResult};
use tracing::{debug, error, info, warn};

use crate::{
    engine::{settle, spin_once, ReelGenerator, ReelGrid, STARTING_BALANCE},
    input::Prompter,
    payout::{PayoutRule, ZeroPayout},
    rng::SpinRng,
    store::PlayerStore,
};

/// What the session does when a store operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log the failure and keep playing.
    #[default]
    Continue,
    /// End the session with the failure.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Identify,
    Fund,
    Spin,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("store operation failed")]
    Store(#[from] StoreError),
    #[error("terminal i/o failed")]
    Io(#[from] io::Error),
}

/// How an identity was resolved to a player record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Existing(PlayerId),
    Created(PlayerId),
    /// Creation failed and the policy said to continue; nothing will be saved.
    Unresolved,
}

impl Resolution {
    pub fn player_id(self) -> Option<PlayerId> {
        match self {
            Resolution::Existing(id) | Resolution::Created(id) => Some(id),
            Resolution::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettledSpin {
    pub grid: ReelGrid,
    pub bet: f64,
    pub winnings: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub player_id: Option<PlayerId>,
    pub balance: f64,
    pub spins: u32,
}

/// A bet as typed at the prompt. Any finite number is accepted, including
/// zero and negative amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetAmount(pub f64);

#[derive(Debug, thiserror::Error)]
#[error("bet must be a finite number")]
pub struct InvalidBet;

impl FromStr for BetAmount {
    type Err = InvalidBet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(BetAmount(v)),
            _ => Err(InvalidBet),
        }
    }
}

pub struct GameSession<S> {
    store: S,
    generator: ReelGenerator,
    payout: Box<dyn PayoutRule>,
    policy: ErrorPolicy,
    phase: Phase,
    player: Option<PlayerId>,
    balance: f64,
    spins: u32,
}

impl<S: PlayerStore> GameSession<S> {
    pub fn new(store: S, rng: SpinRng) -> Self {
        Self {
            store,
            generator: ReelGenerator::new(rng),
            payout: Box::new(ZeroPayout),
            policy: ErrorPolicy::default(),
            phase: Phase::Identify,
            player: None,
            balance: 0.0,
            spins: 0,
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_payout_rule(mut self, rule: Box<dyn PayoutRule>) -> Self {
        self.payout = rule;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            player_id: self.player,
            balance: self.balance,
            spins: self.spins,
        }
    }

    pub async fn prepare(&mut self) -> Result<(), SessionError> {
        let result = self.store.ensure_schema().await;
        self.tolerate("ensure_schema", result)?;
        Ok(())
    }

    /// Look the identity up, creating a player record on a miss.
    pub async fn resolve_player(&mut self, identity: &Identity) -> Result<Resolution, SessionError> {
        let found = self.store.find_player(identity).await;
        let resolution = match self.tolerate("find_player", found)?.flatten() {
            Some(id) => Resolution::Existing(id),
            None => {
                let created = self.store.create_player(identity).await;
                match self.tolerate("create_player", created)? {
                    Some(id) => {
                        info!(player_id = %id, card = %identity.card_fingerprint(), "registered new player");
                        Resolution::Created(id)
                    }
                    None => {
                        warn!("continuing without a player record; balance and spins will not be saved");
                        Resolution::Unresolved
                    }
                }
            }
        };
        self.player = resolution.player_id();
        self.phase = Phase::Fund;
        Ok(resolution)
    }

    /// Reset the balance to the starting amount, discarding any saved balance.
    pub async fn fund(&mut self) -> Result<(), SessionError> {
        self.balance = STARTING_BALANCE;
        self.persist_balance().await?;
        self.phase = Phase::Spin;
        Ok(())
    }

    pub async fn play_spin(&mut self, bet: f64) -> Result<SettledSpin, SessionError> {
        let outcome = spin_once(&mut self.generator, self.payout.as_ref(), bet);
        self.balance = settle(self.balance, bet, outcome.winnings);
        self.spins += 1;
        debug!(bet, winnings = outcome.winnings, balance = self.balance, "spin settled");

        self.persist_balance().await?;
        if let Some(player_id) = self.player {
            let record = SpinRecord {
                player_id,
                bet,
                winnings: outcome.winnings,
                balance: self.balance,
            };
            let appended = self.store.append_spin_record(&record).await;
            self.tolerate("append_spin_record", appended)?;
        } else {
            warn!("no player record; spin not logged");
        }

        Ok(SettledSpin {
            grid: outcome.grid,
            bet,
            winnings: outcome.winnings,
            balance: self.balance,
        })
    }

    pub fn quit(&mut self) {
        self.phase = Phase::Quit;
    }

    /// Drive the whole session over the given terminal until the player quits
    /// or input runs out.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<SessionSummary, SessionError> {
        self.prepare().await?;
        loop {
            match self.phase {
                Phase::Identify => {
                    let Some(identity) = read_identity(prompter)? else {
                        self.quit();
                        continue;
                    };
                    if let Resolution::Created(_) | Resolution::Unresolved =
                        self.resolve_player(&identity).await?
                    {
                        prompter.say("New player detected. Adding to database.")?;
                    }
                }
                Phase::Fund => self.fund().await?,
                Phase::Spin => {
                    match prompter.ask_command("Press 'p' to play, 'q' to quit: ")? {
                        None | Some('q') => {
                            self.quit();
                            continue;
                        }
                        Some(_) => {}
                    }
                    let Some(BetAmount(bet)) =
                        prompter.ask_parsed("Enter your bet amount: ", "bet amount")?
                    else {
                        self.quit();
                        continue;
                    };
                    let settled = self.play_spin(bet).await?;
                    prompter.show(settled.grid)?;
                    prompter.say(format_args!("New Balance: {}", settled.balance))?;
                }
                Phase::Quit => break,
            }
        }
        info!(spins = self.spins, balance = self.balance, "session ended");
        Ok(self.summary())
    }

    async fn persist_balance(&mut self) -> Result<(), SessionError> {
        let Some(player_id) = self.player else {
            warn!("no player record; balance not saved");
            return Ok(());
        };
        let result = self.store.set_balance(player_id, self.balance).await;
        self.tolerate("set_balance", result)?;
        Ok(())
    }

    fn tolerate<T>(&self, op: &'static str, result: StoreResult<T>) -> Result<Option<T>, SessionError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => match self.policy {
                ErrorPolicy::Abort => Err(err.into()),
                ErrorPolicy::Continue => {
                    error!(op, error = %err, "store operation failed; continuing");
                    Ok(None)
                }
            },
        }
    }
}

fn read_identity<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> io::Result<Option<Identity>> {
    let Some(name) = prompter.ask("Enter your name: ")? else {
        return Ok(None);
    };
    let Some(age) = prompter.ask_parsed::<i64>("Enter your age: ", "age")? else {
        return Ok(None);
    };
    let Some(card) = prompter.ask("Enter your card: ")? else {
        return Ok(None);
    };
    Ok(Some(Identity::new(name, age, card)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreOp};

    #[test]
    fn bet_accepts_any_finite_number() {
        assert_eq!("10".parse::<BetAmount>().unwrap(), BetAmount(10.0));
        assert_eq!("-2.5".parse::<BetAmount>().unwrap(), BetAmount(-2.5));
        assert_eq!("0".parse::<BetAmount>().unwrap(), BetAmount(0.0));
        assert!("NaN".parse::<BetAmount>().is_err());
        assert!("inf".parse::<BetAmount>().is_err());
        assert!("ten".parse::<BetAmount>().is_err());
    }

    #[tokio::test]
    async fn phases_advance_in_order() {
        let mut session = GameSession::new(MemoryStore::new(), SpinRng::seeded(1));
        assert_eq!(session.phase(), Phase::Identify);
        session
            .resolve_player(&Identity::new("Alice", 30, "1111"))
            .await
            .unwrap();
        assert_eq!(session.phase(), Phase::Fund);
        session.fund().await.unwrap();
        assert_eq!(session.phase(), Phase::Spin);
        assert_eq!(session.balance(), STARTING_BALANCE);
        session.quit();
        assert_eq!(session.phase(), Phase::Quit);
    }

    #[tokio::test]
    async fn find_failure_falls_through_to_create() {
        let store = MemoryStore::new().failing_on(StoreOp::FindPlayer);
        let mut session = GameSession::new(store, SpinRng::seeded(1));
        let resolution = session
            .resolve_player(&Identity::new("Dee", 50, "4444"))
            .await
            .unwrap();
        assert!(matches!(resolution, Resolution::Created(_)));
    }

    #[tokio::test]
    async fn abort_policy_surfaces_store_error() {
        let store = MemoryStore::new().failing_on(StoreOp::SetBalance);
        let mut session =
            GameSession::new(store, SpinRng::seeded(1)).with_policy(ErrorPolicy::Abort);
        session
            .resolve_player(&Identity::new("Eve", 28, "5555"))
            .await
            .unwrap();
        let err = session.fund().await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::Query { op: "set_balance", .. })));
    }
}
