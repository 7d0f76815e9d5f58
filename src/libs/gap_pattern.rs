use crate::libs::align::GlobalAlignment;
use crate::libs::error::PpiError;
use crate::libs::gap::GAP;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};

/// Which sequences feed the model: one in `every`, starting at a random phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleParams {
    pub every: usize,
    pub seed: u64,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self { every: 30, seed: 42 }
    }
}

/// Residue expected between two flanking residues.
///
/// Each `(left, right)` key maps to a distribution over middle residues,
/// in thousandths, summing to exactly 1.
#[derive(Debug, Clone, Default)]
pub struct GapPatternModel {
    table: HashMap<(u8, u8), BTreeMap<u8, f64>>,
}

impl GapPatternModel {
    /// Tallies every window of three residues in `sequences`.
    pub fn from_sequences<'a, I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut tally: HashMap<(u8, u8), BTreeMap<u8, u64>> = HashMap::new();
        for seq in sequences {
            for w in seq.windows(3) {
                let (left, middle, right) = (
                    w[0].to_ascii_uppercase(),
                    w[1].to_ascii_uppercase(),
                    w[2].to_ascii_uppercase(),
                );
                *tally.entry((left, right)).or_default().entry(middle).or_default() += 1;
                if left != right {
                    *tally.entry((right, left)).or_default().entry(middle).or_default() += 1;
                }
            }
        }

        let table = tally
            .into_iter()
            .map(|(key, counts)| (key, normalize(&counts)))
            .collect();
        Self { table }
    }

    /// Builds the model from a sample of `sequences`.
    pub fn build(sequences: &[&[u8]], params: &SampleParams) -> Result<Self, PpiError> {
        if sequences.is_empty() {
            return Err(PpiError::Config(
                "no sequences to build the gap pattern model from".to_string(),
            ));
        }

        let sampled = sample(sequences, params);
        tracing::info!(
            "Gap pattern model from {} of {} sequences",
            sampled.len(),
            sequences.len()
        );

        Ok(Self::from_sequences(sampled))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn distribution(&self, left: u8, right: u8) -> Option<&BTreeMap<u8, f64>> {
        self.table
            .get(&(left.to_ascii_uppercase(), right.to_ascii_uppercase()))
    }

    /// Probability of `middle` between `left` and `right`; 0 for unseen keys.
    pub fn probability(&self, left: u8, right: u8, middle: u8) -> f64 {
        self.distribution(left, right)
            .and_then(|d| d.get(&middle.to_ascii_uppercase()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sums, over `indices` where A's track has a gap, the probability of B's
    /// residue given A's nearest residues on both sides.
    pub fn score(&self, indices: &[usize], alignment: &GlobalAlignment) -> f64 {
        let track_a = alignment.track_a.as_bytes();
        let track_b = alignment.track_b.as_bytes();
        let len = track_a.len().min(track_b.len());

        let mut score = 0.0;
        for &i in indices {
            if i == 0 || i + 1 >= len || track_a[i] != GAP {
                continue;
            }
            let left = track_a[..i].iter().rev().find(|&&c| c != GAP);
            let right = track_a[i + 1..].iter().find(|&&c| c != GAP);
            let middle = track_b[i];
            if let (Some(&left), Some(&right)) = (left, right) {
                if middle != GAP {
                    score += self.probability(left, right, middle);
                }
            }
        }
        score
    }
}

/// One in `every` sequences, starting at a seeded random phase. Inputs
/// shorter than `every` still give one sequence.
fn sample<'a>(sequences: &[&'a [u8]], params: &SampleParams) -> Vec<&'a [u8]> {
    if sequences.is_empty() {
        return vec![];
    }
    let stride = params.every.clamp(1, sequences.len());
    let mut rng = StdRng::seed_from_u64(params.seed);
    let phase = rng.gen_range(0..stride);

    sequences
        .iter()
        .skip(phase)
        .step_by(stride)
        .copied()
        .collect()
}

/// Largest-remainder rounding into thousandths.
fn normalize(counts: &BTreeMap<u8, u64>) -> BTreeMap<u8, f64> {
    let total: u64 = counts.values().sum();
    let mut parts: Vec<(u8, u64, u64)> = counts
        .iter()
        .map(|(&k, &c)| (k, c * 1000 / total, c * 1000 % total))
        .collect();

    let assigned: u64 = parts.iter().map(|p| p.1).sum();
    let mut order: Vec<usize> = (0..parts.len()).collect();
    order.sort_by(|&x, &y| parts[y].2.cmp(&parts[x].2).then(x.cmp(&y)));
    for &k in order.iter().take((1000 - assigned) as usize) {
        parts[k].1 += 1;
    }

    parts
        .into_iter()
        .map(|(k, thousandths, _)| (k, thousandths as f64 / 1000.0))
        .collect()
}
