//! Static residue tables: a substitution matrix, physicochemical property
//! scales and secondary-structure classes.
//!
//! Everything here is built once by [`Tables::new`] and then only read.
//! Each table carries the mean over the 20 standard residues, which stands
//! in for the residue on the other side of a gap.

use crate::libs::error::PpiError;
use crate::libs::gap::GAP;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// The 20 standard amino acids
pub const RESIDUES: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";
/// Ambiguous symbols allowed in protein sequences
pub const AMBIGUOUS: &[u8; 4] = b"BUXZ";

/// One column of an aligned pair: a residue, or the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Residue(u8),
    Gap,
}

impl Symbol {
    pub fn from_byte(c: u8) -> Self {
        if c == GAP {
            Symbol::Gap
        } else {
            Symbol::Residue(c.to_ascii_uppercase())
        }
    }

    pub fn residue(&self) -> Option<u8> {
        match self {
            Symbol::Residue(r) => Some(*r),
            Symbol::Gap => None,
        }
    }
}

pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

//----------------------------
// Property scales
//----------------------------

// Kyte & Doolittle
const HYDROPHOBICITY: [(u8, f64); 20] = [
    (b'A', 1.8), (b'R', -4.5), (b'N', -3.5), (b'D', -3.5), (b'C', 2.5),
    (b'Q', -3.5), (b'E', -3.5), (b'G', -0.4), (b'H', -3.2), (b'I', 4.5),
    (b'L', 3.8), (b'K', -3.9), (b'M', 1.9), (b'F', 2.8), (b'P', -1.6),
    (b'S', -0.8), (b'T', -0.7), (b'W', -0.9), (b'Y', -1.3), (b'V', 4.2),
];

// Vihinen et al. normalized flexibility
const FLEXIBILITY: [(u8, f64); 20] = [
    (b'A', 0.984), (b'C', 0.906), (b'E', 1.094), (b'D', 1.068), (b'G', 1.031),
    (b'F', 0.915), (b'I', 0.927), (b'H', 0.950), (b'K', 1.102), (b'M', 0.952),
    (b'L', 0.935), (b'N', 1.048), (b'Q', 1.037), (b'P', 1.049), (b'S', 1.046),
    (b'R', 1.008), (b'T', 0.997), (b'W', 0.904), (b'V', 0.931), (b'Y', 0.929),
];

// Emini surface fractional probability
const SURFACE_PROBABILITY: [(u8, f64); 20] = [
    (b'A', 0.815), (b'R', 1.475), (b'N', 1.296), (b'D', 1.283), (b'C', 0.394),
    (b'Q', 1.348), (b'E', 1.445), (b'G', 0.714), (b'H', 1.180), (b'I', 0.603),
    (b'L', 0.603), (b'K', 1.545), (b'M', 0.714), (b'F', 0.695), (b'P', 1.236),
    (b'S', 1.115), (b'T', 1.184), (b'W', 0.808), (b'Y', 1.089), (b'V', 0.606),
];

// Janin interior to surface transfer energy
const TRANSFER_ENERGY: [(u8, f64); 20] = [
    (b'A', 0.28), (b'R', -1.14), (b'N', -0.55), (b'D', -0.52), (b'C', 0.97),
    (b'Q', -0.69), (b'E', -1.01), (b'G', 0.43), (b'H', -0.31), (b'I', 0.60),
    (b'L', 0.60), (b'K', -1.62), (b'M', 0.43), (b'F', 0.46), (b'P', -0.42),
    (b'S', -0.19), (b'T', -0.32), (b'W', 0.29), (b'Y', -0.15), (b'V', 0.60),
];

const TOTAL_ACCESSIBLE_SURFACE_AREA: [(u8, f64); 20] = [
    (b'A', 67.0), (b'R', 196.0), (b'N', 113.0), (b'D', 106.0), (b'C', 104.0),
    (b'Q', 144.0), (b'E', 138.0), (b'G', 86.0), (b'H', 151.0), (b'I', 140.0),
    (b'L', 137.0), (b'K', 167.0), (b'M', 160.0), (b'F', 175.0), (b'P', 105.0),
    (b'S', 80.0), (b'T', 102.0), (b'W', 217.0), (b'Y', 187.0), (b'V', 117.0),
];

const VOLUME_BURIED_RESIDUE: [(u8, f64); 20] = [
    (b'A', 92.0), (b'R', 225.0), (b'N', 135.0), (b'D', 125.0), (b'C', 106.0),
    (b'Q', 161.0), (b'E', 155.0), (b'G', 66.0), (b'H', 167.0), (b'I', 169.0),
    (b'L', 168.0), (b'K', 171.0), (b'M', 171.0), (b'F', 203.0), (b'P', 129.0),
    (b'S', 99.0), (b'T', 122.0), (b'W', 240.0), (b'Y', 203.0), (b'V', 142.0),
];

const VOLUME_SIDE_CHAINS: [(u8, f64); 20] = [
    (b'A', 27.5), (b'C', 44.6), (b'D', 40.0), (b'E', 62.0), (b'F', 115.5),
    (b'G', 0.0), (b'H', 79.0), (b'I', 93.5), (b'K', 100.0), (b'L', 93.5),
    (b'M', 94.1), (b'N', 58.7), (b'P', 41.9), (b'Q', 80.7), (b'R', 105.0),
    (b'S', 29.3), (b'T', 51.3), (b'V', 71.5), (b'W', 145.5), (b'Y', 117.3),
];

const POLARITY: [(u8, f64); 20] = [
    (b'A', 8.1), (b'C', 5.5), (b'D', 13.0), (b'E', 12.3), (b'F', 5.2),
    (b'G', 9.0), (b'H', 10.4), (b'I', 5.2), (b'K', 11.3), (b'L', 4.9),
    (b'M', 5.7), (b'N', 11.6), (b'P', 8.0), (b'Q', 10.5), (b'R', 10.5),
    (b'S', 9.2), (b'T', 8.6), (b'V', 5.9), (b'W', 5.4), (b'Y', 6.2),
];

const POLARIZABILITY: [(u8, f64); 20] = [
    (b'A', 0.046), (b'C', 0.128), (b'D', 0.105), (b'E', 0.151), (b'F', 0.29),
    (b'G', 0.0), (b'H', 0.23), (b'I', 0.186), (b'K', 0.219), (b'L', 0.186),
    (b'M', 0.221), (b'N', 0.134), (b'P', 0.131), (b'Q', 0.18), (b'R', 0.291),
    (b'S', 0.062), (b'T', 0.108), (b'V', 0.14), (b'W', 0.409), (b'Y', 0.298),
];

const SOLVENT_ACCESSIBLE_SURFACE_AREA: [(u8, f64); 20] = [
    (b'A', 1.181), (b'C', 1.461), (b'D', 1.587), (b'E', 1.862), (b'F', 2.228),
    (b'G', 0.881), (b'H', 2.025), (b'I', 1.81), (b'K', 2.258), (b'L', 1.931),
    (b'M', 2.034), (b'N', 1.655), (b'P', 1.468), (b'Q', 1.932), (b'R', 2.56),
    (b'S', 1.298), (b'T', 1.525), (b'V', 1.645), (b'W', 2.663), (b'Y', 2.368),
];

const NET_CHARGE_INDEX_SIDE_CHAINS: [(u8, f64); 20] = [
    (b'A', 0.007187), (b'C', -0.03661), (b'D', -0.02382), (b'E', 0.006802),
    (b'F', 0.037552), (b'G', 0.179052), (b'H', -0.01069), (b'I', 0.021631),
    (b'K', 0.017708), (b'L', 0.051672), (b'M', 0.002683), (b'N', 0.005392),
    (b'P', 0.239531), (b'Q', 0.049211), (b'R', 0.043587), (b'S', 0.004627),
    (b'T', 0.003352), (b'V', 0.057004), (b'W', 0.037977), (b'Y', 0.023599),
];

// Average mass of the free amino acid
const MOLECULAR_WEIGHT: [(u8, f64); 20] = [
    (b'A', 89.0932), (b'C', 121.1582), (b'D', 133.1027), (b'E', 147.1293),
    (b'F', 165.1891), (b'G', 75.0666), (b'H', 155.1546), (b'I', 131.1729),
    (b'K', 146.1876), (b'L', 131.1729), (b'M', 149.2113), (b'N', 132.1179),
    (b'P', 115.1305), (b'Q', 146.1445), (b'R', 174.201), (b'S', 105.0926),
    (b'T', 119.1192), (b'V', 117.1463), (b'W', 204.2252), (b'Y', 181.1885),
];

/// Property scales in output order; molecular weight is always last.
pub const PROPERTY_NAMES: [&str; 12] = [
    "Hydrophobicity",
    "Flexibility",
    "Emini_Surface_Fractional_Probability",
    "Janin_Interior_To_Surface_Transfer_Energy",
    "Total_Accessible_Surface_Area",
    "Volume_Buried_Residue",
    "Volume_Side_Chains",
    "Polarity",
    "Polarizability",
    "Solvent_Accessible_Surface_Area",
    "Net_Charge_Index_Side_Chains",
    "Molecular_Weight",
];

fn property_data() -> [&'static [(u8, f64)]; 12] {
    [
        &HYDROPHOBICITY,
        &FLEXIBILITY,
        &SURFACE_PROBABILITY,
        &TRANSFER_ENERGY,
        &TOTAL_ACCESSIBLE_SURFACE_AREA,
        &VOLUME_BURIED_RESIDUE,
        &VOLUME_SIDE_CHAINS,
        &POLARITY,
        &POLARIZABILITY,
        &SOLVENT_ACCESSIBLE_SURFACE_AREA,
        &NET_CHARGE_INDEX_SIDE_CHAINS,
        &MOLECULAR_WEIGHT,
    ]
}

/// A residue -> scalar scale with its mean.
#[derive(Debug, Clone)]
pub struct PropertyTable {
    name: &'static str,
    values: Vec<Option<f64>>,
    mean: f64,
}

impl PropertyTable {
    pub fn new(name: &'static str, pairs: &[(u8, f64)]) -> Result<Self, PpiError> {
        if pairs.is_empty() {
            return Err(PpiError::Config(format!(
                "property table {} has no values to average",
                name
            )));
        }

        let mut values = vec![None; 256];
        for &(residue, value) in pairs {
            values[residue.to_ascii_uppercase() as usize] = Some(value);
        }
        let mean = pairs.iter().map(|(_, v)| v).sum::<f64>() / pairs.len() as f64;

        Ok(Self { name, values, mean })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Value of a residue; residues without an entry take the mean.
    pub fn value(&self, residue: u8) -> f64 {
        self.values[residue.to_ascii_uppercase() as usize].unwrap_or(self.mean)
    }

    /// Gaps take the mean.
    pub fn value_of(&self, symbol: Symbol) -> f64 {
        match symbol {
            Symbol::Residue(r) => self.value(r),
            Symbol::Gap => self.mean,
        }
    }
}

//----------------------------
// Secondary structure
//----------------------------

/// Residues favouring one secondary-structure class.
#[derive(Debug, Clone)]
pub struct StructureClass {
    pub name: &'static str,
    pub members: &'static [u8],
}

impl StructureClass {
    /// Share of the standard residues that belong to this class.
    pub fn frequency(&self) -> f64 {
        self.members.len() as f64 / RESIDUES.len() as f64
    }

    /// Membership indicator; gaps take the class frequency.
    pub fn indicator(&self, symbol: Symbol) -> f64 {
        match symbol {
            Symbol::Residue(r) => {
                if self.members.contains(&r) {
                    1.0
                } else {
                    0.0
                }
            }
            Symbol::Gap => self.frequency(),
        }
    }
}

pub const STRUCTURE_CLASSES: [StructureClass; 3] = [
    StructureClass {
        name: "Helix",
        members: b"VIYFWL",
    },
    StructureClass {
        name: "Turn",
        members: b"NPGS",
    },
    StructureClass {
        name: "Sheet",
        members: b"EMAL",
    },
];

//----------------------------
// Substitution matrix
//----------------------------

const MATRIX_ALPHABET: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZX*";

/// A symmetric protein substitution matrix.
///
/// Scores are stored for all pairs of bytes (256x256); lookups are case
/// insensitive, and the rare residues `U`, `O` and `J` are scored as `X`.
#[derive(Debug, Clone)]
pub struct SubstitutionMatrix {
    name: String,
    matrix: Vec<i32>,
    means: Vec<f64>,
}

impl SubstitutionMatrix {
    fn key(c: u8) -> usize {
        match c.to_ascii_uppercase() {
            b'U' | b'O' | b'J' => b'X' as usize,
            c => c as usize,
        }
    }

    fn means_of(matrix: &[i32]) -> Vec<f64> {
        (0..256usize)
            .map(|a| {
                let sum: i32 = RESIDUES.iter().map(|&b| matrix[a * 256 + b as usize]).sum();
                sum as f64 / RESIDUES.len() as f64
            })
            .collect()
    }

    /// BLOSUM62, as shipped by rust-bio.
    pub fn blosum62() -> Self {
        let mut matrix = vec![0; 256 * 256];
        for &a in MATRIX_ALPHABET {
            for &b in MATRIX_ALPHABET {
                let score = bio::scores::blosum62(a, b);
                for ra in [a, a.to_ascii_lowercase()] {
                    for rb in [b, b.to_ascii_lowercase()] {
                        matrix[(ra as usize) * 256 + rb as usize] = score;
                    }
                }
            }
        }
        Self {
            name: "blosum62".to_string(),
            means: Self::means_of(&matrix),
            matrix,
        }
    }

    /// Load from name (preset) or file.
    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        match name.to_lowercase().as_str() {
            "blosum62" => Ok(Self::blosum62()),
            _ => Self::from_file(name),
        }
    }

    /// Load a matrix in NCBI text format.
    ///
    /// The first non-comment line lists the column residues; every following
    /// line starts with its row residue. Lines starting with '#' are comments.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut matrix = vec![0; 256 * 256];
        let mut columns: Vec<u8> = vec![];

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if columns.is_empty() {
                if parts.iter().all(|s| s.len() == 1) {
                    columns = parts.iter().map(|s| s.as_bytes()[0]).collect();
                }
                continue;
            }

            if parts.len() != columns.len() + 1 || parts[0].len() != 1 {
                return Err(PpiError::Format(format!("bad matrix row in {}: {}", path, line)).into());
            }
            let row = parts[0].as_bytes()[0];
            for (j, field) in parts[1..].iter().enumerate() {
                let score = field.parse::<i32>()?;
                for ra in [row.to_ascii_uppercase(), row.to_ascii_lowercase()] {
                    for rb in [columns[j].to_ascii_uppercase(), columns[j].to_ascii_lowercase()] {
                        matrix[(ra as usize) * 256 + rb as usize] = score;
                    }
                }
            }
        }

        let covered = RESIDUES
            .iter()
            .any(|&a| RESIDUES.iter().any(|&b| matrix[(a as usize) * 256 + b as usize] != 0));
        if !covered {
            return Err(PpiError::Config(format!(
                "substitution matrix {} has no scores for standard residues",
                path
            ))
            .into());
        }

        Ok(Self {
            name: path.to_string(),
            means: Self::means_of(&matrix),
            matrix,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.matrix[Self::key(a) * 256 + Self::key(b)]
    }

    /// Mean score of a residue against the 20 standard residues.
    pub fn mean(&self, a: u8) -> f64 {
        self.means[Self::key(a)]
    }
}

/// All static tables, built once per run.
#[derive(Debug, Clone)]
pub struct Tables {
    pub matrix: SubstitutionMatrix,
    pub properties: Vec<PropertyTable>,
    pub structures: Vec<StructureClass>,
}

impl Tables {
    pub fn new() -> Result<Self, PpiError> {
        Self::with_matrix(SubstitutionMatrix::blosum62())
    }

    pub fn with_matrix(matrix: SubstitutionMatrix) -> Result<Self, PpiError> {
        let properties = PROPERTY_NAMES
            .iter()
            .zip(property_data())
            .map(|(&name, data)| PropertyTable::new(name, data))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            matrix,
            properties,
            structures: STRUCTURE_CLASSES.to_vec(),
        })
    }
}
