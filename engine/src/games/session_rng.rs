use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG for one game session; the seed is kept so a session can be replayed.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_random(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed for a derived session, so a whole run replays from one seed.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.rng.random_range(0..items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SessionRng::new(7);
        let mut b = SessionRng::new(7);
        let items: Vec<u32> = (0..1000).collect();
        let left: Vec<u32> = (0..16).map(|_| *a.pick(&items).unwrap()).collect();
        let right: Vec<u32> = (0..16).map(|_| *b.pick(&items).unwrap()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_derived_seeds_follow_parent_seed() {
        let mut a = SessionRng::new(5);
        let mut b = SessionRng::new(5);
        let first = a.next_seed();
        assert_eq!(first, b.next_seed());
        assert_ne!(first, a.next_seed());
    }

    #[test]
    fn test_pick_empty_slice() {
        let mut rng = SessionRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
    }

    #[test]
    fn test_pick_stays_in_slice() {
        let mut rng = SessionRng::new(3);
        let items = [1, 2, 3];
        for _ in 0..100 {
            assert!(items.contains(rng.pick(&items).unwrap()));
        }
    }

    #[test]
    fn test_optional_seed_is_recorded() {
        assert_eq!(SessionRng::from_optional_seed(Some(99)).seed(), 99);
    }
}
