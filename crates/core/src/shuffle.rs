//! Uniform permutation helper used for attempt preparation.

use rand::Rng;
use rand::seq::SliceRandom;

/// Return a uniformly shuffled copy of `items` (Fisher-Yates). The input is left as is.
///
/// Every call is an independent draw from `rng`.
#[must_use]
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut cloned = items.to_vec();
    cloned.as_mut_slice().shuffle(rng);
    cloned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<u32> = (0..50).collect();
        let out = shuffle(&input, &mut rng);
        assert_eq!(out.len(), input.len());
        assert_eq!(sorted(out), input);
    }

    #[test]
    fn shuffle_handles_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffle::<u32, _>(&[], &mut rng).is_empty());
        assert_eq!(shuffle(&[9_u32], &mut rng), vec![9]);
    }

    #[test]
    fn shuffle_keeps_duplicates() {
        let mut rng = StdRng::seed_from_u64(3);
        let input = vec![1_u32, 1, 2, 2, 2];
        assert_eq!(sorted(shuffle(&input, &mut rng)), input);
    }

    #[test]
    fn shuffle_does_not_mutate_input() {
        let mut rng = StdRng::seed_from_u64(11);
        let input: Vec<u32> = (0..10).collect();
        let _ = shuffle(&input, &mut rng);
        assert_eq!(input, (0..10).collect::<Vec<_>>());
    }
}
