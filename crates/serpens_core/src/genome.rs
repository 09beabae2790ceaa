//! Genetic operators over byte-encoded genomes.
//!
//! Every crossover walks the genome in elementary units (bytes or bits),
//! alternating the source parent at sorted random cut points, starting with
//! parent A. A sentinel cut at the full length keeps the walk in bounds and
//! covers the tail.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serpens_data::Dna;

/// Genetic interface for [`Dna`].
pub trait DnaLogic: Sized {
    /// A strand of `len` independent uniform random bytes.
    fn random_with_rng<R: Rng>(len: usize, rng: &mut R) -> Self;

    /// Byte-granular crossover; Gaussian noise with σ = `mutation_prob × 256`
    /// is added to every child byte.
    fn crossover_noise<R: Rng>(&self, other: &Self, mutation_prob: f64, rng: &mut R) -> Self;

    /// Bit-granular crossover; every child bit flips with `mutation_prob`.
    fn crossover_bitwise<R: Rng>(&self, other: &Self, mutation_prob: f64, rng: &mut R) -> Self;

    /// Cut points at byte boundaries only, bit flips with `mutation_prob`.
    fn crossover_bytewise<R: Rng>(&self, other: &Self, mutation_prob: f64, rng: &mut R)
        -> Self;

    /// Adds Gaussian noise scaled by `magnitude × 256` to each byte with
    /// probability `prob`.
    fn mutate_noise<R: Rng>(&mut self, prob: f64, magnitude: f64, rng: &mut R);

    /// Hue decoded from the trailing trait byte, in `[0, 1)`.
    fn hue(&self) -> f32;

    /// Coefficient bytes (everything but the trait byte).
    fn coeffs(&self) -> &[i8];
}

/// `count` sorted cut points in `[0, units)` rounded down to multiples of
/// `granularity`, plus a final cut at `units`.
fn cut_points<R: Rng>(count: usize, units: usize, granularity: usize, rng: &mut R) -> Vec<usize> {
    let mut cuts = Vec::with_capacity(count + 1);
    let slots = units / granularity;
    for _ in 0..count {
        cuts.push(rng.gen_range(0..slots) * granularity);
    }
    cuts.push(units);
    cuts.sort_unstable();
    cuts
}

/// Yields, for each unit, whether it is copied from parent A.
///
/// Every cut reached at `unit` toggles the parent, so coincident cuts cancel
/// out and a switch only ever happens exactly on a cut.
struct ParentSelector {
    cuts: Vec<usize>,
    next: usize,
    from_a: bool,
}

impl ParentSelector {
    fn new(cuts: Vec<usize>) -> Self {
        Self {
            cuts,
            next: 0,
            from_a: true,
        }
    }

    fn select(&mut self, unit: usize) -> bool {
        while self.next < self.cuts.len() && unit >= self.cuts[self.next] {
            self.from_a = !self.from_a;
            self.next += 1;
        }
        self.from_a
    }
}

/// Gaussian sample scaled to a byte delta, wrapping like a narrowing cast.
fn byte_noise<R: Rng>(scale: f64, rng: &mut R) -> i8 {
    let sample: f64 = StandardNormal.sample(rng);
    (sample * scale) as i32 as i8
}

fn crossover_bits<R: Rng>(
    a: &Dna,
    b: &Dna,
    mutation_prob: f64,
    granularity: usize,
    rng: &mut R,
) -> Dna {
    let bits = a.bit_len();
    let mut child = Dna::zeroed(a.len());
    if bits == 0 {
        return child;
    }
    let cuts = cut_points(a.len() / 8, bits, granularity, rng);
    let mut selector = ParentSelector::new(cuts);
    for i in 0..bits {
        let mut bit = if selector.select(i) { a.bit(i) } else { b.bit(i) };
        if rng.gen::<f64>() < mutation_prob {
            bit = 1 - bit;
        }
        if bit == 1 {
            child.set_bit(i);
        }
    }
    child
}

impl DnaLogic for Dna {
    fn random_with_rng<R: Rng>(len: usize, rng: &mut R) -> Self {
        Dna::from_bytes((0..len).map(|_| rng.gen::<i8>()).collect())
    }

    fn crossover_noise<R: Rng>(&self, other: &Self, mutation_prob: f64, rng: &mut R) -> Self {
        let len = self.len();
        let mut child = Dna::zeroed(len);
        if len == 0 {
            return child;
        }
        let cuts = cut_points(len / 10, len, 1, rng);
        let mut selector = ParentSelector::new(cuts);
        let scale = mutation_prob * 256.0;
        for i in 0..len {
            let d = if selector.select(i) {
                self.data[i]
            } else {
                other.data[i]
            };
            child.data[i] = d.wrapping_add(byte_noise(scale, rng));
        }
        child
    }

    fn crossover_bitwise<R: Rng>(&self, other: &Self, mutation_prob: f64, rng: &mut R) -> Self {
        crossover_bits(self, other, mutation_prob, 1, rng)
    }

    fn crossover_bytewise<R: Rng>(
        &self,
        other: &Self,
        mutation_prob: f64,
        rng: &mut R,
    ) -> Self {
        crossover_bits(self, other, mutation_prob, 8, rng)
    }

    fn mutate_noise<R: Rng>(&mut self, prob: f64, magnitude: f64, rng: &mut R) {
        let scale = magnitude * 256.0;
        for byte in &mut self.data {
            if rng.gen::<f64>() < prob {
                *byte = byte.wrapping_add(byte_noise(scale, rng));
            }
        }
    }

    fn hue(&self) -> f32 {
        self.data
            .last()
            .map_or(0.0, |&b| (f32::from(b) / 256.0).rem_euclid(1.0))
    }

    fn coeffs(&self) -> &[i8] {
        match self.data.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn parents(len: usize) -> (Dna, Dna) {
        (
            Dna::from_bytes(vec![0; len]),
            Dna::from_bytes(vec![-1; len]),
        )
    }

    #[test]
    fn test_random_is_seed_deterministic() {
        let a = Dna::random_with_rng(39, &mut ChaCha8Rng::seed_from_u64(1));
        let b = Dna::random_with_rng(39, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(a, b);
        assert_eq!(a.len(), 39);
    }

    #[test]
    fn test_cut_points_sorted_with_sentinel() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let cuts = cut_points(20, 800, 8, &mut rng);
        assert_eq!(cuts.len(), 21);
        assert_eq!(*cuts.last().unwrap(), 800);
        assert!(cuts.windows(2).all(|w| w[0] <= w[1]));
        assert!(cuts.iter().all(|c| c % 8 == 0));
    }

    #[test]
    fn test_selector_starts_with_parent_a() {
        let mut selector = ParentSelector::new(vec![3, 5, 8]);
        let picks: Vec<bool> = (0..8).map(|i| selector.select(i)).collect();
        assert_eq!(
            picks,
            vec![true, true, true, false, false, true, true, true]
        );
    }

    #[test]
    fn test_selector_coincident_cuts_cancel() {
        let mut selector = ParentSelector::new(vec![2, 2, 4, 6]);
        let picks: Vec<bool> = (0..6).map(|i| selector.select(i)).collect();
        assert_eq!(picks, vec![true, true, true, true, false, false]);
    }

    #[test]
    fn test_bytewise_never_splits_a_byte() {
        let (a, b) = parents(200);
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let child = a.crossover_bytewise(&b, 0.0, &mut rng);
            let mixed = child.data.iter().position(|&d| d != 0 && d != -1);
            assert_eq!(mixed, None, "seed {seed} mixed parents inside a byte");
        }
    }

    #[test]
    fn test_zero_mutation_copies_only_parent_bytes() {
        let (a, b) = parents(200);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for child in [
            a.crossover_noise(&b, 0.0, &mut rng),
            a.crossover_bytewise(&b, 0.0, &mut rng),
        ] {
            assert_eq!(child.len(), 200);
            assert!(child.data.iter().all(|&d| d == 0 || d == -1));
        }
    }

    #[test]
    fn test_bitwise_zero_mutation_takes_bits_from_parents() {
        let a = Dna::from_bytes(vec![0b0101_0101; 64]);
        let b = Dna::from_bytes(vec![0b0101_0101; 64]);
        let child = a.crossover_bitwise(&b, 0.0, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(child, a);
    }

    #[test]
    fn test_full_mutation_flips_every_bit() {
        let a = Dna::from_bytes(vec![0; 16]);
        let child = a.crossover_bytewise(&a, 1.0, &mut ChaCha8Rng::seed_from_u64(9));
        assert!(child.data.iter().all(|&d| d == -1));
    }

    #[test]
    fn test_mutation_rate_above_one_does_not_panic() {
        let a = Dna::from_bytes(vec![0; 16]);
        let child = a.crossover_bitwise(&a, 10.0, &mut ChaCha8Rng::seed_from_u64(9));
        assert!(child.data.iter().all(|&d| d == -1));
    }

    #[test]
    fn test_short_genomes_keep_length() {
        let (a, b) = parents(3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(a.crossover_noise(&b, 0.1, &mut rng).len(), 3);
        assert_eq!(a.crossover_bitwise(&b, 0.1, &mut rng).len(), 3);
        assert_eq!(a.crossover_bytewise(&b, 0.1, &mut rng).len(), 3);
        let empty = Dna::zeroed(0);
        assert!(empty.crossover_bytewise(&empty, 0.1, &mut rng).is_empty());
    }

    #[test]
    fn test_mutate_noise_zero_prob_is_identity() {
        let mut dna = Dna::random_with_rng(50, &mut ChaCha8Rng::seed_from_u64(4));
        let before = dna.clone();
        dna.mutate_noise(0.0, 1.0, &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(dna, before);
    }

    #[test]
    fn test_mutate_noise_changes_bytes() {
        let mut dna = Dna::zeroed(100);
        dna.mutate_noise(1.0, 0.5, &mut ChaCha8Rng::seed_from_u64(4));
        assert!(dna.data.iter().any(|&d| d != 0));
    }

    #[test]
    fn test_hue_wraps_into_unit_range() {
        assert_eq!(Dna::from_bytes(vec![0, 64]).hue(), 0.25);
        assert_eq!(Dna::from_bytes(vec![0, -64]).hue(), 0.75);
        assert_eq!(Dna::zeroed(0).hue(), 0.0);
    }

    #[test]
    fn test_coeffs_exclude_trait_byte() {
        let dna = Dna::from_bytes(vec![1, 2, 3]);
        assert_eq!(dna.coeffs(), &[1, 2]);
    }
}
