//! Weighted random load balancing strategy.

use std::sync::Arc;

use crate::load_balancer::{target::Target, LoadBalancer};
use crate::sources::RandomSource;

/// Picks each candidate with probability proportional to its weight.
#[derive(Debug)]
pub struct WeightedRandom {
    random: Arc<dyn RandomSource>,
}

impl WeightedRandom {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }
}

impl LoadBalancer for WeightedRandom {
    fn next_target(&self, candidates: &[Arc<Target>], total_weight: u64) -> Option<Arc<Target>> {
        if candidates.is_empty() || total_weight == 0 {
            return None;
        }

        let r = self.random.next_below(total_weight);
        let mut cumulative = 0u64;
        for target in candidates {
            cumulative += u64::from(target.weight);
            if r < cumulative {
                return Some(target.clone());
            }
        }

        // Only reachable when total_weight exceeds the candidates' sum.
        candidates.last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SeededRandom;

    #[derive(Debug)]
    struct Fixed(u64);

    impl RandomSource for Fixed {
        fn next_f64(&self) -> f64 {
            0.0
        }

        fn next_below(&self, bound: u64) -> u64 {
            self.0.min(bound - 1)
        }
    }

    fn targets() -> Vec<Arc<Target>> {
        vec![
            Arc::new(Target::new("p1", 70)),
            Arc::new(Target::new("p2", 20)),
            Arc::new(Target::new("p3", 10)),
        ]
    }

    #[test]
    fn test_cumulative_boundaries() {
        let targets = targets();
        let pick = |r| {
            WeightedRandom::new(Arc::new(Fixed(r)))
                .next_target(&targets, 100)
                .unwrap()
                .id
                .clone()
        };
        assert_eq!(pick(0), "p1");
        assert_eq!(pick(69), "p1");
        assert_eq!(pick(70), "p2");
        assert_eq!(pick(89), "p2");
        assert_eq!(pick(90), "p3");
        assert_eq!(pick(99), "p3");
    }

    #[test]
    fn test_distribution_matches_weights() {
        let targets = targets();
        let lb = WeightedRandom::new(Arc::new(SeededRandom::new(42)));
        let n = 100_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            let picked = lb.next_target(&targets, 100).unwrap();
            let index = targets.iter().position(|t| t.id == picked.id).unwrap();
            counts[index] += 1;
        }

        for (count, share) in counts.iter().zip([0.7, 0.2, 0.1]) {
            let observed = *count as f64 / n as f64;
            assert!(
                (observed - share).abs() < share * 0.05,
                "observed {observed}, expected {share}"
            );
        }
    }

    #[test]
    fn test_empty_or_weightless() {
        let lb = WeightedRandom::new(Arc::new(Fixed(0)));
        assert!(lb.next_target(&[], 10).is_none());
        assert!(lb.next_target(&targets(), 0).is_none());
    }

    #[test]
    fn test_oversized_total_falls_back_to_last() {
        let lb = WeightedRandom::new(Arc::new(Fixed(150)));
        let picked = lb.next_target(&targets(), 200).unwrap();
        assert_eq!(picked.id, "p3");
    }
}
