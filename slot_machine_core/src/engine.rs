use std::fmt;

use crate::{payout::PayoutRule, rng::SpinRng, symbols::Symbol};

pub const GRID_ROWS: usize = 3;
pub const GRID_COLS: usize = 3;

/// Balance every identity is funded with on login.
pub const STARTING_BALANCE: f64 = 100.0;

/// Row-major 3x3 window of symbols produced by one spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReelGrid(pub [[Symbol; GRID_COLS]; GRID_ROWS]);

impl ReelGrid {
    pub fn rows(&self) -> &[[Symbol; GRID_COLS]; GRID_ROWS] {
        &self.0
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }
}

// One row per line, glyphs separated by a single space.
impl fmt::Display for ReelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            let line: Vec<String> = row.iter().map(|s| s.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinOutcome {
    pub grid: ReelGrid,
    pub winnings: f64,
}

#[derive(Debug)]
pub struct ReelGenerator {
    rng: SpinRng,
}

impl ReelGenerator {
    pub fn new(rng: SpinRng) -> Self {
        Self { rng }
    }

    /// Draw every cell independently and uniformly from the four symbols.
    pub fn spin(&mut self) -> ReelGrid {
        let mut window = [[Symbol::A; GRID_COLS]; GRID_ROWS];
        for row in window.iter_mut() {
            for cell in row.iter_mut() {
                *cell = Symbol::ALL[self.rng.next_index(Symbol::ALL.len())];
            }
        }
        ReelGrid(window)
    }
}

pub fn spin_once(generator: &mut ReelGenerator, payout: &dyn PayoutRule, bet: f64) -> SpinOutcome {
    let grid = generator.spin();
    let winnings = payout.winnings(&grid, bet);
    SpinOutcome { grid, winnings }
}

/// New balance after a spin. Bets are not checked against the balance.
pub fn settle(balance: f64, bet: f64, winnings: f64) -> f64 {
    balance + winnings - bet
}
