//! Small helpers shared across the library.

use rand::Rng;

/// Shuffle a slice in place with the Fisher-Yates algorithm.
///
/// Every one of the `n!` orderings is equally likely. Runs in O(n); slices of
/// length 0 or 1 are left untouched. A seeded rng makes the result
/// reproducible.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use mazeball::util::shuffle;
///
/// let mut items = [1, 2, 3, 4, 5];
/// shuffle(&mut items, &mut StdRng::seed_from_u64(7));
///
/// let mut sorted = items;
/// sorted.sort();
/// assert_eq!(sorted, [1, 2, 3, 4, 5]);
/// ```
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    let mut counter = items.len();
    while counter > 1 {
        let i = rng.gen_range(0..counter);
        counter -= 1;
        items.swap(counter, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 0..20 {
            let original: Vec<u32> = (0..n).collect();
            let mut shuffled = original.clone();
            shuffle(&mut shuffled, &mut rng);

            let mut sorted = shuffled.clone();
            sorted.sort();
            assert_eq!(sorted, original);
        }
    }

    #[test]
    fn shuffle_leaves_trivial_slices_unchanged() {
        let mut rng = StdRng::seed_from_u64(42);

        let mut empty: [u32; 0] = [];
        shuffle(&mut empty, &mut rng);

        let mut single = [9];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, [9]);
    }

    #[test]
    fn shuffle_is_deterministic_for_a_fixed_seed() {
        let mut a = (0..50).collect::<Vec<u32>>();
        let mut b = a.clone();
        shuffle(&mut a, &mut StdRng::seed_from_u64(123));
        shuffle(&mut b, &mut StdRng::seed_from_u64(123));
        assert_eq!(a, b);
    }
}
