//! Username candidate generation from seed letters

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::invalid_input;

/// Generator for fixed-length permutations of a seed's characters
///
/// The seed is treated as a multiset: a letter that appears twice can be used
/// twice, and orderings that produce the same string are only emitted once.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    seed: Vec<char>,
    counts: BTreeMap<char, usize>,
}

impl CandidateGenerator {
    /// Create a generator for the given seed letters
    pub fn new(seed: &str) -> Result<Self> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(invalid_input!("Seed letters cannot be empty"));
        }

        let chars: Vec<char> = seed.chars().collect();
        let mut counts = BTreeMap::new();
        for &c in &chars {
            *counts.entry(c).or_insert(0) += 1;
        }

        Ok(Self { seed: chars, counts })
    }

    /// Number of characters in the seed
    pub fn seed_len(&self) -> usize {
        self.seed.len()
    }

    /// Upper bound on the number of orderings before deduplication
    pub fn max_candidates(&self, length: usize) -> u64 {
        permutation_count(self.seed.len(), length)
    }

    /// All distinct strings of `length` characters drawn from the seed
    pub fn generate(&self, length: usize) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        if length == 0 || length > self.seed.len() {
            return out;
        }

        let mut counts: Vec<(char, usize)> = self.counts.iter().map(|(&c, &n)| (c, n)).collect();
        let mut current = String::with_capacity(length * 4);
        Self::extend(&mut counts, length, &mut current, &mut out);

        tracing::debug!(
            seed_len = self.seed.len(),
            length,
            generated = out.len(),
            "Generated candidates"
        );
        out
    }

    fn extend(
        counts: &mut [(char, usize)],
        remaining: usize,
        current: &mut String,
        out: &mut BTreeSet<String>,
    ) {
        if remaining == 0 {
            out.insert(current.clone());
            return;
        }

        for i in 0..counts.len() {
            let (c, n) = counts[i];
            if n == 0 {
                continue;
            }
            counts[i].1 -= 1;
            current.push(c);
            Self::extend(counts, remaining - 1, current, out);
            current.pop();
            counts[i].1 += 1;
        }
    }
}

/// Generate the unique permutations of `length` characters from `seed`
pub fn generate(seed: &str, length: usize) -> Result<BTreeSet<String>> {
    Ok(CandidateGenerator::new(seed)?.generate(length))
}

/// n! / (n-k)!, saturating at `u64::MAX`
pub fn permutation_count(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    ((n - k + 1)..=n).fold(1u64, |acc, x| acc.saturating_mul(x as u64))
}
