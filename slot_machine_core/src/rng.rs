use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// One generator per session, seeded once and reused for every spin.
// A fixed seed makes the whole session's reels reproducible.

#[derive(Debug)]
pub struct SpinRng {
    inner: StdRng,
}

impl SpinRng {
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = SpinRng::seeded(1);
        let mut rng2 = SpinRng::seeded(1);
        let a: Vec<usize> = (0..32).map(|_| rng1.next_index(4)).collect();
        let b: Vec<usize> = (0..32).map(|_| rng2.next_index(4)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn indices_stay_in_range() {
        let mut rng = SpinRng::from_entropy();
        assert!((0..1000).all(|_| rng.next_index(4) < 4));
    }
}
