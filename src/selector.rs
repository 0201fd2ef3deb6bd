use crate::model::UserEngagementRecord;
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of full re-shuffles performed before drawing.
pub const DEFAULT_SHUFFLE_ITERATIONS: u32 = 10_000;

/// At least one qualified entry. The selector can only be handed one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct Qualified(Vec<UserEngagementRecord>);

impl Qualified {
    pub fn new(entries: Vec<UserEngagementRecord>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self(entries))
        }
    }

    pub fn entries(&self) -> &[UserEngagementRecord] {
        &self.0
    }
}

pub struct Selector {
    shuffle_iterations: u32,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(DEFAULT_SHUFFLE_ITERATIONS)
    }
}

impl Selector {
    pub fn new(shuffle_iterations: u32) -> Self {
        Self { shuffle_iterations }
    }

    /// Draw a winner using the thread-local generator, which is seeded from system entropy.
    pub fn select(&self, qualified: Qualified) -> UserEngagementRecord {
        self.select_with(qualified, &mut rand::rng())
    }

    pub fn select_with<R: Rng>(&self, qualified: Qualified, rng: &mut R) -> UserEngagementRecord {
        let mut entries = qualified.0;

        self.mitigate_bias_perception(&mut entries, rng);

        let index = rng.random_range(0..entries.len());
        entries.swap_remove(index)
    }

    /// Bias-perception mitigation: repeated Fisher-Yates shuffles.
    ///
    /// Statistically one shuffle is enough. The repetition exists so entrants can
    /// see the draw was not a single roll of a weak generator.
    fn mitigate_bias_perception<R: Rng>(
        &self,
        entries: &mut [UserEngagementRecord],
        rng: &mut R,
    ) {
        let report_every = (self.shuffle_iterations / 10).max(1);
        tracing::info!(
            entries = entries.len(),
            iterations = self.shuffle_iterations,
            "Shuffling entries..."
        );

        for i in 0..self.shuffle_iterations {
            entries.shuffle(rng);
            if (i + 1) % report_every == 0 {
                tracing::debug!(done = i + 1, total = self.shuffle_iterations, "shuffling");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn record(id: &str) -> UserEngagementRecord {
        UserEngagementRecord::new(AccountId::new(id))
    }

    #[test]
    fn test_empty_is_not_selectable() {
        assert!(Qualified::new(Vec::new()).is_none());
    }

    #[test]
    fn test_single_entry_always_wins() {
        let selector = Selector::new(50);
        for seed in 0..20 {
            let qualified = Qualified::new(vec![record("1")]).unwrap();
            let winner = selector.select_with(qualified, &mut StdRng::seed_from_u64(seed));
            assert_eq!(winner.account_id, AccountId::new("1"));
        }
    }

    #[test]
    fn test_winner_comes_from_entries() {
        let entries: Vec<_> = ["1", "2", "3"].iter().map(|id| record(id)).collect();
        let winner = Selector::default().select(Qualified::new(entries.clone()).unwrap());
        assert!(entries.contains(&winner));
    }

    #[test]
    fn test_same_seed_same_winner() {
        let entries: Vec<_> = (0..25).map(|i| record(&i.to_string())).collect();
        let selector = Selector::new(100);

        let a = selector.select_with(
            Qualified::new(entries.clone()).unwrap(),
            &mut StdRng::seed_from_u64(7),
        );
        let b = selector.select_with(Qualified::new(entries).unwrap(), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_entry_can_win() {
        let entries: Vec<_> = (0..4).map(|i| record(&i.to_string())).collect();
        let selector = Selector::new(1);
        let mut rng = StdRng::seed_from_u64(42);
        let mut wins: HashMap<AccountId, u32> = HashMap::new();

        for _ in 0..4000 {
            let winner = selector.select_with(Qualified::new(entries.clone()).unwrap(), &mut rng);
            *wins.entry(winner.account_id).or_default() += 1;
        }

        assert_eq!(wins.len(), 4);
        // Expected 1000 each; allow a wide margin.
        assert!(wins.values().all(|&n| (800..1200).contains(&n)));
    }

    #[test]
    fn test_zero_iterations_still_draws() {
        let qualified = Qualified::new(vec![record("1"), record("2")]).unwrap();
        let winner = Selector::new(0).select_with(qualified, &mut StdRng::seed_from_u64(1));
        assert!(winner.account_id == AccountId::new("1") || winner.account_id == AccountId::new("2"));
    }
}
