//! Lookups over the input tables: sequences, interactomes and residue
//! annotations. A protein missing from a table means "no information";
//! lookups then return empty sets, never errors.

use crate::libs::error::PpiError;
use crate::libs::indices;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Sequences by name, in file order.
pub type SequenceMap = IndexMap<String, Vec<u8>>;

/// Reads a (possibly gzipped) FASTA file.
pub fn load_fasta(infile: &str) -> anyhow::Result<SequenceMap> {
    let reader = crate::reader(infile)?;
    let mut fa_in = noodles_fasta::io::Reader::new(reader);

    let mut map = SequenceMap::new();
    for result in fa_in.records() {
        let record = result?;
        let name = String::from_utf8(record.name().into())?;
        let seq: &[u8] = record.sequence().as_ref();
        if map.contains_key(&name) {
            tracing::warn!("Duplicated sequence {} in {}, first kept", name, infile);
            continue;
        }
        map.insert(name, seq.to_vec());
    }
    tracing::debug!("{} sequences from {}", map.len(), infile);

    Ok(map)
}

//----------------------------
// Interactome
//----------------------------
#[derive(Debug, Deserialize)]
struct InteractionRecord {
    #[serde(rename = "Uniprot_A")]
    a: String,
    #[serde(rename = "Uniprot_B")]
    b: String,
}

/// Known physical interactions of one organism, symmetric.
///
/// Partners are keyed by protein, so lookups borrow the query names.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    partners: HashMap<String, HashSet<String>>,
}

impl InteractionGraph {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads a tab-separated interactome with `Uniprot_A` and `Uniprot_B` columns.
    pub fn load(infile: &str) -> anyhow::Result<Self> {
        let mut reader = crate::table_reader(infile, b'\t')?;
        let mut graph = Self::new();
        for result in reader.deserialize() {
            let record: InteractionRecord = result?;
            graph.insert(&record.a, &record.b);
        }
        Ok(graph)
    }

    pub fn insert(&mut self, a: &str, b: &str) {
        self.partners
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.partners
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    pub fn interacts(&self, a: &str, b: &str) -> bool {
        self.partners.get(a).is_some_and(|set| set.contains(b))
    }

    /// Number of stored ordered pairs; a self-interaction counts once.
    pub fn len(&self) -> usize {
        self.partners.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

//----------------------------
// Interfaces
//----------------------------
#[derive(Debug, Deserialize)]
struct InterfaceRecord {
    #[serde(rename = "P1")]
    p1: String,
    #[serde(rename = "P2")]
    p2: String,
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "P1_IRES")]
    p1_ires: String,
    #[serde(rename = "P2_IRES")]
    p2_ires: String,
}

/// Interface residues of one interacting pair, oriented to the lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// 1-based residues of the first protein, compressed
    pub indices1: String,
    /// 1-based residues of the second protein, compressed
    pub indices2: String,
    /// Database the interface was predicted from
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct InterfaceTable {
    pairs: HashMap<(String, String), Interface>,
    zipped: HashMap<String, String>,
}

impl InterfaceTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads a tab-separated table with `P1, P2, Source, P1_IRES, P2_IRES`.
    pub fn load(infile: &str) -> anyhow::Result<Self> {
        let mut reader = crate::table_reader(infile, b'\t')?;
        let mut table = Self::new();
        for result in reader.deserialize() {
            let r: InterfaceRecord = result?;
            table.insert(&r.p1, &r.p2, &r.source, &r.p1_ires, &r.p2_ires);
        }
        Ok(table)
    }

    /// Stores the pair under both orders; a later row for the same pair wins.
    pub fn insert(&mut self, p1: &str, p2: &str, source: &str, ires1: &str, ires2: &str) {
        self.pairs.insert(
            (p1.to_string(), p2.to_string()),
            Interface {
                indices1: ires1.to_string(),
                indices2: ires2.to_string(),
                source: source.to_string(),
            },
        );
        self.pairs.insert(
            (p2.to_string(), p1.to_string()),
            Interface {
                indices1: ires2.to_string(),
                indices2: ires1.to_string(),
                source: source.to_string(),
            },
        );

        for (protein, ires) in [(p1, ires1), (p2, ires2)] {
            let entry = self.zipped.entry(protein.to_string()).or_default();
            *entry = indices::combine(&*entry, ires);
        }
    }

    pub fn get(&self, p1: &str, p2: &str) -> Option<&Interface> {
        self.pairs.get(&(p1.to_string(), p2.to_string()))
    }

    pub fn contains(&self, p1: &str, p2: &str) -> bool {
        self.get(p1, p2).is_some()
    }

    /// All interface residues of `protein` across its partners, 0-based.
    pub fn residues(&self, protein: &str) -> Vec<usize> {
        self.zipped
            .get(protein)
            .map(|z| indices::parse_zipped(z))
            .unwrap_or_default()
    }
}

//----------------------------
// Domains
//----------------------------
#[derive(Debug, Deserialize)]
struct DomainRecord {
    #[serde(rename = "seq id")]
    protein: String,
    #[serde(rename = "envelope start")]
    start: usize,
    #[serde(rename = "envelope end")]
    end: usize,
}

/// One domain envelope per protein, 1-based inclusive.
#[derive(Debug, Clone, Default)]
pub struct Domains {
    envelopes: HashMap<String, (usize, usize)>,
}

impl Domains {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads a tab-separated Pfam table. The first envelope of a protein is kept.
    pub fn load(infile: &str) -> anyhow::Result<Self> {
        let mut reader = crate::table_reader(infile, b'\t')?;
        let mut domains = Self::new();
        for result in reader.deserialize() {
            let r: DomainRecord = result?;
            if r.end < r.start {
                return Err(PpiError::Format(format!(
                    "domain of {} ends before it starts: {}-{}",
                    r.protein, r.start, r.end
                ))
                .into());
            }
            domains.insert(&r.protein, r.start, r.end);
        }
        Ok(domains)
    }

    pub fn insert(&mut self, protein: &str, start: usize, end: usize) {
        self.envelopes
            .entry(protein.to_string())
            .or_insert((start, end));
    }

    /// 0-based positions covered by the domain of `protein`.
    pub fn indices(&self, protein: &str) -> Vec<usize> {
        self.envelopes
            .get(protein)
            .map(|&(start, end)| indices::decrement(&indices::span(start, end)))
            .unwrap_or_default()
    }
}

//----------------------------
// Special sites
//----------------------------

/// Functional sites per protein, every site column combined.
#[derive(Debug, Clone, Default)]
pub struct SpecialSites {
    zipped: HashMap<String, String>,
}

impl SpecialSites {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads a comma-separated table with an `Entry` column; every other
    /// non-empty cell holds compressed 1-based residues.
    pub fn load(infile: &str) -> anyhow::Result<Self> {
        let mut reader = crate::table_reader(infile, b',')?;
        let headers = reader.headers()?.clone();
        let entry_col = headers
            .iter()
            .position(|h| h == "Entry")
            .ok_or_else(|| PpiError::Format(format!("no Entry column in {}", infile)))?;

        let mut sites = Self::new();
        for result in reader.records() {
            let record = result?;
            let protein = record.get(entry_col).unwrap_or_default();
            for (i, cell) in record.iter().enumerate() {
                if i != entry_col {
                    sites.insert(protein, cell);
                }
            }
        }
        Ok(sites)
    }

    pub fn insert(&mut self, protein: &str, fragment: &str) {
        let entry = self.zipped.entry(protein.to_string()).or_default();
        *entry = indices::combine(&*entry, fragment.trim());
    }

    /// 0-based site positions of `protein`.
    pub fn indices(&self, protein: &str) -> Vec<usize> {
        self.zipped
            .get(protein)
            .map(|z| indices::parse_zipped(z))
            .unwrap_or_default()
    }
}
