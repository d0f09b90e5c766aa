use rand::Rng;

/// Prices never fall below one cent; shocks and walks clamp silently rather
/// than erroring, since this is a stability policy and not input validation.
pub const MIN_PRICE: f64 = 0.01;

/// Round to two decimal places, the engine-wide price precision.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Multiplicative random walk over daily closing prices.
#[derive(Debug, Clone, Copy)]
pub struct PriceWalk {
    /// Maximum daily move as a fraction: the factor is drawn uniformly from
    /// `[-move_range, +move_range]`.
    pub move_range: f64,
}

impl Default for PriceWalk {
    fn default() -> Self {
        Self { move_range: 0.05 }
    }
}

impl PriceWalk {
    pub fn new(move_range: f64) -> Self {
        assert!(move_range > 0.0, "move_range must be > 0");
        Self { move_range }
    }

    /// Next daily close from the current one, rounded to 2 dp and clamped
    /// to [`MIN_PRICE`].
    pub fn next_price<R: Rng>(&self, rng: &mut R, current: f64) -> f64 {
        let factor = rng.gen_range(-self.move_range..=self.move_range);
        round2(current * (1.0 + factor)).max(MIN_PRICE)
    }

    /// Seed a pre-game price trail: entry 0 is the rounded start price, each
    /// later entry a fresh walk step from its predecessor.
    pub fn seed_history<R: Rng>(&self, rng: &mut R, start_price: f64, days: usize) -> Vec<f64> {
        let mut history = Vec::with_capacity(days.max(1));
        history.push(round2(start_price).max(MIN_PRICE));
        for _ in 1..days {
            let last = *history.last().expect("history is never empty");
            history.push(self.next_price(rng, last));
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn round2_behaves() {
        assert!((round2(150.254) - 150.25).abs() < 1e-9);
        assert!((round2(150.2561) - 150.26).abs() < 1e-9);
        assert!((round2(2.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn next_price_stays_within_band_and_precision() {
        let walk = PriceWalk::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut price = 100.0;
        for _ in 0..500 {
            let next = walk.next_price(&mut rng, price);
            assert!(next >= price * 0.95 - 0.01 && next <= price * 1.05 + 0.01);
            assert!((next * 100.0 - (next * 100.0).round()).abs() < 1e-6);
            price = next;
        }
    }

    #[test]
    fn next_price_never_reaches_zero() {
        let walk = PriceWalk::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut price = MIN_PRICE;
        for _ in 0..200 {
            price = walk.next_price(&mut rng, price);
            assert!(price >= MIN_PRICE);
        }
    }

    #[test]
    fn seed_history_starts_at_rounded_start_price() {
        let walk = PriceWalk::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let history = walk.seed_history(&mut rng, 150.254, 6);
        assert_eq!(history.len(), 6);
        assert!((history[0] - 150.25).abs() < 1e-9);
    }

    #[test]
    fn seeded_rng_reproduces_the_walk() {
        let walk = PriceWalk::default();
        let a = walk.seed_history(&mut ChaCha8Rng::seed_from_u64(9), 299.10, 20);
        let b = walk.seed_history(&mut ChaCha8Rng::seed_from_u64(9), 299.10, 20);
        assert_eq!(a, b);
    }
}
