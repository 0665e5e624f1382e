pub mod engine;
pub mod input;
pub mod payout;
pub mod rng;
pub mod session;
pub mod store;
pub mod symbols;

pub use crate::engine::{settle, spin_once, ReelGenerator, ReelGrid, SpinOutcome, STARTING_BALANCE};
pub use crate::input::Prompter;
pub use crate::payout::{PayoutRule, ZeroPayout};
pub use crate::rng::SpinRng;
pub use crate::session::{ErrorPolicy, GameSession, Phase, Resolution, SessionError, SessionSummary, SettledSpin};
pub use crate::store::{MemoryStore, PlayerStore, StoreOp};
pub use crate::symbols::{symbol_table, Symbol};
