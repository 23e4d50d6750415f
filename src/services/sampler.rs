use rand::seq::index;
use rand::Rng;

/// Draws `n` items uniformly at random, without replacement, from the
/// ranked candidate set.
///
/// Scores only decide candidacy; every matching recipe is equally likely
/// to be drawn, and every subset of size `n` is equally likely. `n <= 0`
/// is treated as a request for one item; an empty pool yields an empty
/// result rather than an error.
pub fn sample<T: Clone>(ranked: &[T], n: i64) -> Vec<T> {
    sample_with_rng(&mut rand::thread_rng(), ranked, n)
}

pub fn sample_with_rng<T: Clone, R: Rng + ?Sized>(rng: &mut R, ranked: &[T], n: i64) -> Vec<T> {
    let wanted = if n <= 0 { 1 } else { n as usize };
    let amount = wanted.min(ranked.len());
    if amount == 0 {
        return Vec::new();
    }
    index::sample(rng, ranked.len(), amount)
        .into_iter()
        .map(|i| ranked[i].clone())
        .collect()
}
