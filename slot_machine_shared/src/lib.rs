use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Store-assigned player identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (name, age, card) triple a player is looked up by.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Identity {
    pub name: String,
    pub age: i64,
    pub card: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, age: i64, card: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            card: card.into(),
        }
    }

    /// Short SHA-256 prefix of the card, safe to put in logs.
    pub fn card_fingerprint(&self) -> String {
        let digest = Sha256::digest(self.card.as_bytes());
        hex::encode(&digest[..6])
    }
}

// Card numbers never show up in debug output.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("name", &self.name)
            .field("age", &self.age)
            .field("card", &self.card_fingerprint())
            .finish()
    }
}

/// One settled spin, as appended to the history log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpinRecord {
    pub player_id: PlayerId,
    pub bet: f64,
    pub winnings: f64,
    pub balance: f64,
}

/// A history row read back from the store by the admin commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpinLogEntry {
    pub id: i64,
    pub player_id: Option<i64>,
    pub bet: f64,
    pub winnings: f64,
    pub balance: f64,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("{op} failed: {source}")]
    Query {
        op: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("store lock poisoned during {op}")]
    Poisoned { op: &'static str },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        StoreError::Unavailable {
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn query(op: &'static str, source: impl Error + Send + Sync + 'static) -> Self {
        StoreError::Query {
            op,
            source: Box::new(source),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_card() {
        let identity = Identity::new("Alice", 30, "4111111111111111");
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("4111111111111111"));
        assert!(rendered.contains(&identity.card_fingerprint()));
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = Identity::new("Alice", 30, "1111");
        let b = Identity::new("Bob", 41, "1111");
        assert_eq!(a.card_fingerprint(), b.card_fingerprint());
        assert_eq!(a.card_fingerprint().len(), 12);
        assert_ne!(a.card_fingerprint(), Identity::new("Alice", 30, "2222").card_fingerprint());
    }

    #[test]
    fn query_error_names_operation() {
        let err = StoreError::query("set_balance", std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "set_balance failed: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}
