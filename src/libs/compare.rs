//! Residue comparison categories and their aggregation over aligned regions.

use crate::libs::align::GlobalAlignment;
use crate::libs::gap;
use crate::libs::tables::{round3, Symbol, Tables, PROPERTY_NAMES, STRUCTURE_CLASSES};

/// A way of comparing two aligned symbols, producing a fixed-length vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `[matching, non-matching, gap-involved]`, exactly one is 1
    Counts,
    /// Substitution score bucketed into `[matching, similar, non-similar]`
    SubstitutionScore,
    /// Squared differences of the property scales and molecular weight
    Physicochemical,
    /// Squared differences of helix/turn/sheet membership
    SecondaryStructure,
}

/// Counts and substitution scores; used for global, domain and site regions
pub const BASIC_CATEGORIES: &[Category] = &[Category::Counts, Category::SubstitutionScore];

/// Every category; used for interface residues
pub const INTERFACE_CATEGORIES: &[Category] = &[
    Category::Counts,
    Category::SubstitutionScore,
    Category::Physicochemical,
    Category::SecondaryStructure,
];

impl Category {
    pub fn names(&self) -> Vec<String> {
        match self {
            Category::Counts => ["Matching", "Non-Matching", "Non-Matching-Gap"]
                .iter()
                .map(|n| format!("{}_Count", n))
                .collect(),
            Category::SubstitutionScore => ["Matching", "Similar", "Non-Similar"]
                .iter()
                .map(|n| format!("Sum_Blosum_{}_Scores", n))
                .collect(),
            Category::Physicochemical => PROPERTY_NAMES
                .iter()
                .map(|n| format!("Difference_{}_Scores", n))
                .collect(),
            Category::SecondaryStructure => STRUCTURE_CLASSES
                .iter()
                .map(|c| format!("Difference_{}_Count", c.name))
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Category::Counts | Category::SubstitutionScore => 3,
            Category::Physicochemical => PROPERTY_NAMES.len(),
            Category::SecondaryStructure => STRUCTURE_CLASSES.len(),
        }
    }

    pub fn score(&self, a: Symbol, b: Symbol, tables: &Tables) -> Vec<f64> {
        let mut out = vec![0.0; self.width()];
        self.accumulate(a, b, tables, &mut out);
        out
    }

    /// Adds this pair's vector onto `out`.
    pub fn accumulate(&self, a: Symbol, b: Symbol, tables: &Tables, out: &mut [f64]) {
        match self {
            Category::Counts => {
                let slot = match (a, b) {
                    (Symbol::Gap, _) | (_, Symbol::Gap) => 2,
                    (x, y) if x == y => 0,
                    _ => 1,
                };
                out[slot] += 1.0;
            }
            Category::SubstitutionScore => {
                let score = match (a, b) {
                    (Symbol::Residue(x), Symbol::Residue(y)) => tables.matrix.score(x, y) as f64,
                    (Symbol::Gap, Symbol::Residue(r)) | (Symbol::Residue(r), Symbol::Gap) => {
                        tables.matrix.mean(r)
                    }
                    (Symbol::Gap, Symbol::Gap) => return,
                };
                let slot = if score > 0.0 {
                    if a == b {
                        0
                    } else {
                        1
                    }
                } else {
                    2
                };
                out[slot] += score;
            }
            Category::Physicochemical => {
                if a == Symbol::Gap && b == Symbol::Gap {
                    return;
                }
                for (o, table) in out.iter_mut().zip(&tables.properties) {
                    let diff = table.value_of(a) - table.value_of(b);
                    *o += round3(diff * diff);
                }
            }
            Category::SecondaryStructure => {
                for (o, class) in out.iter_mut().zip(&tables.structures) {
                    let diff = class.indicator(a) - class.indicator(b);
                    *o += round3(diff * diff);
                }
            }
        }
    }
}

/// Summed vector of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScores {
    pub category: Category,
    pub values: Vec<f64>,
}

/// Aggregated comparison of an aligned region, one vector per category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    pub scores: Vec<CategoryScores>,
}

impl Comparison {
    pub fn zeros(categories: &[Category]) -> Self {
        Self {
            scores: categories
                .iter()
                .map(|&category| CategoryScores {
                    category,
                    values: vec![0.0; category.width()],
                })
                .collect(),
        }
    }

    pub fn get(&self, category: Category) -> Option<&[f64]> {
        self.scores
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.values.as_slice())
    }

    /// Column names, e.g. `Global_Matching_Count`.
    pub fn headers(categories: &[Category], prefix: &str) -> Vec<String> {
        categories
            .iter()
            .flat_map(|c| c.names())
            .map(|name| format!("{}_{}", prefix, name))
            .collect()
    }

    /// All values in header order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().flat_map(|s| s.values.iter().copied())
    }

    fn add_pair(&mut self, a: Symbol, b: Symbol, tables: &Tables) {
        for s in self.scores.iter_mut() {
            s.category.accumulate(a, b, tables, &mut s.values);
        }
    }
}

/// Sums every category over all aligned columns of two tracks.
pub fn compare_sequence(
    track_a: &[u8],
    track_b: &[u8],
    categories: &[Category],
    tables: &Tables,
) -> Comparison {
    let mut comparison = Comparison::zeros(categories);
    for (&x, &y) in track_a.iter().zip(track_b) {
        comparison.add_pair(Symbol::from_byte(x), Symbol::from_byte(y), tables);
    }
    comparison
}

/// Sums every category over the columns holding `indices` of protein A.
///
/// `indices` are 0-based on the ungapped sequence of A; they are shifted
/// through A's track first, and out-of-range ones are dropped with a warning.
pub fn compare_sites(
    indices: &[usize],
    alignment: &GlobalAlignment,
    categories: &[Category],
    tables: &Tables,
) -> Comparison {
    let track_a = alignment.track_a.as_bytes();
    let track_b = alignment.track_b.as_bytes();

    let shifted = gap::shift_for(&alignment.a, track_a, indices);
    let residues_a = gap::extract(track_a, &shifted);
    let residues_b = gap::extract(track_b, &shifted);

    compare_sequence(&residues_a, &residues_b, categories, tables)
}

/// Number of identical non-gap columns.
///
/// ```
/// use ppit::libs::compare::identical_count;
/// assert_eq!(identical_count(b"AC-DE", b"AC-DF"), 3);
/// ```
pub fn identical_count(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .filter(|(x, y)| x == y && **x != gap::GAP)
        .count()
}
