use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Owns the single random source a simulation draws from.
///
/// Phases receive a [`SystemRng`] borrowing this source, so the draw sequence
/// depends only on the seed and on the order phases run in.
pub struct RngManager {
    source: Box<dyn RngCore>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self::from_source(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Uses `source` instead of a seeded ChaCha stream.
    pub fn from_source(source: impl RngCore + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn stream(&mut self) -> SystemRng<'_> {
        SystemRng {
            inner: self.source.as_mut(),
        }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut dyn RngCore,
}

impl<'a> SystemRng<'a> {
    pub fn new(inner: &'a mut dyn RngCore) -> Self {
        Self { inner }
    }
}

impl<'a> RngCore for SystemRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

pub trait RngExt {
    /// Draws exactly one uniform number and returns `true` with
    /// `probability`. Values above 1 always succeed, values at or below 0
    /// never do.
    fn coin_flip(&mut self, probability: f64) -> bool;
}

impl<R: Rng + ?Sized> RngExt for R {
    fn coin_flip(&mut self, probability: f64) -> bool {
        self.gen::<f64>() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngManager::new(42);
        let mut b = RngManager::new(42);
        let xs: Vec<u64> = (0..8).map(|_| a.stream().next_u64()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.stream().next_u64()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn streams_continue_the_shared_sequence() {
        let mut manager = RngManager::new(7);
        let first = manager.stream().next_u64();
        let second = manager.stream().next_u64();

        let mut reference = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(first, reference.next_u64());
        assert_eq!(second, reference.next_u64());
    }

    #[test]
    fn coin_flip_saturates() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((0..500).all(|_| rng.coin_flip(1.0)));
        assert!((0..500).all(|_| rng.coin_flip(3.5)));
        assert!((0..500).all(|_| !rng.coin_flip(0.0)));
        assert!((0..500).all(|_| !rng.coin_flip(-1.0)));
    }
}
