//! Uniform random permutation and choice, used wherever pairing or slot choice is randomized.

use rand::seq::SliceRandom;
use rand::Rng;

/// A uniformly shuffled copy of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// One candidate drawn uniformly, or None when there are no candidates.
pub fn pick<T: Copy, R: Rng + ?Sized>(candidates: &[T], rng: &mut R) -> Option<T> {
    candidates.choose(rng).copied()
}
