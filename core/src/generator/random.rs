use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Uniform digits with a cluster from [`sample_cluster`], falling back to
/// [`fit_cluster`] whenever the sampled box does not fit the grid.
#[derive(Clone, Debug)]
pub struct RandomRoundGenerator {
    rng: SmallRng,
}

impl RandomRoundGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RoundGenerator for RandomRoundGenerator {
    fn generate(&mut self, config: RoundConfig) -> Round {
        let RoundConfig {
            rows,
            cols,
            max_digit,
        } = config;

        let rng = &mut self.rng;
        let digits = Array2::from_shape_fn((usize::from(rows), usize::from(cols)), |_| {
            rng.random_range(0..=max_digit)
        });

        let mut cluster = sample_cluster(&mut self.rng, rows, cols);
        if cluster.is_empty() {
            log::warn!("empty cluster for {}x{} grid, shrinking the box", cols, rows);
            cluster = fit_cluster(&mut self.rng, rows, cols);
        }

        Round::new(digits, cluster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_round_matches_config() {
        let config = RoundConfig::new(25, 35, 9);
        let round = RandomRoundGenerator::new(3).generate(config);

        assert_eq!(round.size(), (25, 35));
        assert_eq!(round.total_cells(), 875);
        assert!(round.cells().all(|cell| cell.digit <= 9));
        assert!((MIN_CLUSTER..=MAX_CLUSTER).contains(&round.cluster().len()));
        assert!(round.selection().is_empty());
    }

    #[test]
    fn same_seed_same_round() {
        let config = RoundConfig::default();
        let a = RandomRoundGenerator::new(42).generate(config);
        let b = RandomRoundGenerator::new(42).generate(config);
        assert_eq!(a, b);
    }

    #[test]
    fn wide_digit_range_is_respected() {
        let config = RoundConfig::new(10, 10, 9999);
        let round = RandomRoundGenerator::new(11).generate(config);
        assert!(round.cells().all(|cell| cell.digit <= 9999));
        assert!(round.cells().any(|cell| cell.digit > 9));
    }

    #[test]
    fn tiny_grid_still_gets_a_target() {
        for seed in 0..50 {
            let round = RandomRoundGenerator::new(seed).generate(RoundConfig::new(2, 2, 9));
            assert_eq!(round.cluster().len(), 4);
        }
    }
}
