use crate::engine::ReelGrid;

/// Decides what a grid pays for a given bet.
///
/// The shipped game uses [`ZeroPayout`]. A rule driven by the symbol weights
/// can be plugged into the session without touching the game loop.
pub trait PayoutRule: Send + Sync {
    fn winnings(&self, grid: &ReelGrid, bet: f64) -> f64;
}

/// Pays nothing, whatever the grid shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroPayout;

impl PayoutRule for ZeroPayout {
    fn winnings(&self, _grid: &ReelGrid, _bet: f64) -> f64 {
        0.0
    }
}
