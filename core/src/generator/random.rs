use super::*;

/// Draws one of the two valid arrangements uniformly from a seeded generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomArrangementGenerator {
    seed: u64,
}

impl RandomArrangementGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ArrangementGenerator for RandomArrangementGenerator {
    fn generate(self) -> Arrangement {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        if rng.random_bool(0.5) {
            Arrangement::rotated_left()
        } else {
            Arrangement::rotated_right()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_arrangement() {
        for seed in 0..32 {
            let first = RandomArrangementGenerator::new(seed).generate();
            let second = RandomArrangementGenerator::new(seed).generate();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn generated_arrangement_is_always_valid() {
        for seed in 0..256 {
            let arrangement = RandomArrangementGenerator::new(seed).generate();
            let contents = core::array::from_fn(|index| arrangement.content_of(index));
            assert_eq!(Arrangement::from_contents(contents), Ok(arrangement));
        }
    }

    #[test]
    fn both_arrangements_show_up_across_seeds() {
        let mut seen_left = false;
        let mut seen_right = false;
        for seed in 0..64 {
            match RandomArrangementGenerator::new(seed).generate() {
                a if a == Arrangement::rotated_left() => seen_left = true,
                _ => seen_right = true,
            }
        }
        assert!(seen_left && seen_right);
    }
}
