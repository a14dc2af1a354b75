//! Synthetic market price model.
//!
//! A random walk with a slowly drifting trend component and a
//! regime-switching volatility component. Trend stays inside
//! [-1.0, 1.0], volatility inside [0.05, 0.3].

use rand::Rng;
use rand::RngExt;

const TREND_SHIFT_PROB: f64 = 0.1;
const TREND_STEP: f64 = 0.2;
const TREND_LIMIT: f64 = 1.0;
const VOL_SHIFT_PROB: f64 = 0.05;
const VOL_MIN: f64 = 0.05;
const VOL_MAX: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct MarketState {
    pub current_price: f64,
    pub trend: f64,
    pub volatility: f64,
}

impl MarketState {
    pub fn new(base_price: f64) -> Self {
        Self {
            current_price: base_price,
            trend: 0.0,
            volatility: 0.1,
        }
    }

    /// Apply one trend/volatility update and return the new price.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> f64 {
        if rng.random::<f64>() < TREND_SHIFT_PROB {
            self.trend = (self.trend + rng.random_range(-TREND_STEP..TREND_STEP))
                .clamp(-TREND_LIMIT, TREND_LIMIT);
        }

        if rng.random::<f64>() < VOL_SHIFT_PROB {
            self.volatility = rng.random_range(VOL_MIN..VOL_MAX);
        }

        let change = self.trend + rng.random_range(-1.0..1.0) * self.volatility;
        self.current_price += change;

        self.current_price
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::MarketState;

    #[test]
    fn trend_and_volatility_stay_bounded_over_many_cycles() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut market = MarketState::new(68480.0);

        for _ in 0..100_000 {
            market.advance(&mut rng);
            assert!((-1.0..=1.0).contains(&market.trend), "trend {} out of range", market.trend);
            assert!(
                (0.05..=0.3).contains(&market.volatility),
                "volatility {} out of range",
                market.volatility
            );
        }
    }

    #[test]
    fn single_cycle_moves_price_within_the_volatility_bound() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut market = MarketState::new(68480.0);
        let price = market.advance(&mut rng);

        // One cycle can shift the price by at most |trend| + volatility.
        assert!((price - 68480.0).abs() <= 1.1, "price {price} drifted too far");
        assert_ne!(price, 68480.0);
        assert_eq!(price, market.current_price);
    }

    #[test]
    fn seeded_walks_are_reproducible() {
        let mut market_a = MarketState::new(100.0);
        let mut market_b = MarketState::new(100.0);
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        let walk_a: Vec<f64> = (0..50).map(|_| market_a.advance(&mut rng_a)).collect();
        let walk_b: Vec<f64> = (0..50).map(|_| market_b.advance(&mut rng_b)).collect();

        assert_eq!(walk_a, walk_b);
    }
}
