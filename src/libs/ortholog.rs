use crate::libs::error::PpiError;
use crate::libs::store::SequenceMap;
use crate::libs::tables::{round3, AMBIGUOUS};
use serde::Deserialize;
use std::collections::HashSet;

/// A similarity-search hit between protein A and protein B, with the
/// coverages once they are known.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrthologPair {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "E-Value")]
    pub evalue: f64,
    #[serde(rename = "Alignment_Length")]
    pub alignment_length: usize,
    #[serde(rename = "Start_A")]
    pub start_a: usize,
    #[serde(rename = "End_A")]
    pub end_a: usize,
    #[serde(rename = "Start_B")]
    pub start_b: usize,
    #[serde(rename = "End_B")]
    pub end_b: usize,
    #[serde(rename = "Bitscore")]
    pub bitscore: f64,
    #[serde(rename = "Identical_Count")]
    pub identical: usize,
    #[serde(rename = "Positive_Count")]
    pub positive: usize,
    #[serde(rename = "Mismatch_Count")]
    pub mismatch: usize,
    #[serde(rename = "Gap")]
    pub gap: usize,
    #[serde(rename = "Coverage_A", default)]
    pub coverage_a: Option<f64>,
    #[serde(rename = "Coverage_B", default)]
    pub coverage_b: Option<f64>,
}

/// Statistic columns, everything but the two protein names.
pub const STAT_HEADERS: [&str; 13] = [
    "E-Value",
    "Alignment_Length",
    "Start_A",
    "End_A",
    "Start_B",
    "End_B",
    "Bitscore",
    "Identical_Count",
    "Positive_Count",
    "Mismatch_Count",
    "Gap",
    "Coverage_A",
    "Coverage_B",
];

impl OrthologPair {
    /// Values in [`STAT_HEADERS`] order.
    pub fn stat_values(&self) -> Vec<String> {
        let opt = |v: Option<f64>| v.map(|c| c.to_string()).unwrap_or_default();
        vec![
            format_evalue(self.evalue),
            self.alignment_length.to_string(),
            self.start_a.to_string(),
            self.end_a.to_string(),
            self.start_b.to_string(),
            self.end_b.to_string(),
            self.bitscore.to_string(),
            self.identical.to_string(),
            self.positive.to_string(),
            self.mismatch.to_string(),
            self.gap.to_string(),
            opt(self.coverage_a),
            opt(self.coverage_b),
        ]
    }
}

/// Tiny e-values keep the exponent notation of the search output.
fn format_evalue(v: f64) -> String {
    if v != 0.0 && v.abs() < 1e-4 {
        format!("{:e}", v)
    } else {
        v.to_string()
    }
}

/// Fraction of a sequence spanned by `start..end`, rounded to 3 decimals.
///
/// ```
/// use ppit::libs::ortholog::coverage;
/// assert_eq!(coverage(1, 41, 100).unwrap(), 0.4);
/// assert!(coverage(1, 41, 0).is_err());
/// ```
pub fn coverage(start: usize, end: usize, length: usize) -> Result<f64, PpiError> {
    if length == 0 {
        return Err(PpiError::Config(
            "coverage of a zero-length sequence".to_string(),
        ));
    }
    Ok(round3((end as f64 - start as f64) / length as f64))
}

fn has_ambiguous(seq: &[u8]) -> bool {
    seq.iter()
        .any(|c| AMBIGUOUS.contains(&c.to_ascii_uppercase()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthologFilter {
    /// Minimal coverage on both sides
    pub threshold: f64,
    /// Keep proteins containing `B U X Z`
    pub keep_ambiguous: bool,
}

impl Default for OrthologFilter {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            keep_ambiguous: false,
        }
    }
}

/// Keeps hits whose coverage reaches the threshold on both proteins.
///
/// Repeated (A, B) hits keep the first. Hits naming a protein absent from
/// its FASTA are skipped with a warning.
pub fn filter_orthologs(
    hits: Vec<OrthologPair>,
    seqs_a: &SequenceMap,
    seqs_b: &SequenceMap,
    filter: &OrthologFilter,
) -> Result<Vec<OrthologPair>, PpiError> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut orthologs = vec![];

    for mut hit in hits {
        if !seen.insert((hit.a.clone(), hit.b.clone())) {
            continue;
        }

        let (seq_a, seq_b) = match (seqs_a.get(&hit.a), seqs_b.get(&hit.b)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                tracing::warn!("Sequence of {} or {} not found, skipped", hit.a, hit.b);
                continue;
            }
        };
        if !filter.keep_ambiguous && (has_ambiguous(seq_a) || has_ambiguous(seq_b)) {
            tracing::debug!("Ambiguous residues in {} or {}, skipped", hit.a, hit.b);
            continue;
        }

        let cov_a = coverage(hit.start_a, hit.end_a, seq_a.len())?;
        let cov_b = coverage(hit.start_b, hit.end_b, seq_b.len())?;
        if cov_a >= filter.threshold && cov_b >= filter.threshold {
            hit.coverage_a = Some(cov_a);
            hit.coverage_b = Some(cov_b);
            orthologs.push(hit);
        }
    }

    Ok(orthologs)
}

pub fn read_orthologs(infile: &str) -> anyhow::Result<Vec<OrthologPair>> {
    let mut reader = crate::table_reader(infile, b',')?;
    let mut pairs = vec![];
    for result in reader.deserialize() {
        let record: OrthologPair = result?;
        pairs.push(record);
    }
    Ok(pairs)
}

pub fn write_orthologs(orthologs: &[OrthologPair], outfile: &str) -> anyhow::Result<()> {
    let mut writer = crate::table_writer(outfile)?;
    writer.write_record(["A", "B"].iter().chain(STAT_HEADERS.iter()))?;
    for o in orthologs {
        writer.write_record([o.a.clone(), o.b.clone()].into_iter().chain(o.stat_values()))?;
    }
    writer.flush()?;
    Ok(())
}

/// A row of any table keyed by `A` and `B`: hits, orthologs or ortholog
/// features. Every other cell is kept as written.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthologRow {
    pub a: String,
    pub b: String,
    pub values: Vec<String>,
}

/// Ortholog rows with the names of their non-key columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrthologTable {
    pub columns: Vec<String>,
    pub rows: Vec<OrthologRow>,
}

impl OrthologTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads an ortholog table keeping every column, so feature tables pass
/// through unchanged.
pub fn read_ortholog_table(infile: &str) -> anyhow::Result<OrthologTable> {
    let mut reader = crate::table_reader(infile, b',')?;
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PpiError::Format(format!("no {} column in {}", name, infile)))
    };
    let (i_a, i_b) = (position("A")?, position("B")?);
    let keep = |i: usize| i != i_a && i != i_b;

    let mut table = OrthologTable {
        columns: headers
            .iter()
            .enumerate()
            .filter(|(i, _)| keep(*i))
            .map(|(_, h)| h.to_string())
            .collect(),
        rows: vec![],
    };
    for result in reader.records() {
        let record = result?;
        let mut values: Vec<String> = record
            .iter()
            .enumerate()
            .filter(|(i, _)| keep(*i))
            .map(|(_, v)| v.to_string())
            .collect();
        // short rows of a flexible table
        values.resize(table.columns.len(), String::new());
        table.rows.push(OrthologRow {
            a: record.get(i_a).unwrap_or_default().to_string(),
            b: record.get(i_b).unwrap_or_default().to_string(),
            values,
        });
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(a: &str, b: &str, start: usize, end: usize) -> OrthologPair {
        OrthologPair {
            a: a.to_string(),
            b: b.to_string(),
            evalue: 1e-20,
            alignment_length: end - start,
            start_a: start,
            end_a: end,
            start_b: start,
            end_b: end,
            bitscore: 100.0,
            identical: 10,
            positive: 12,
            mismatch: 2,
            gap: 0,
            coverage_a: None,
            coverage_b: None,
        }
    }

    fn seqs(entries: &[(&str, usize)]) -> SequenceMap {
        entries
            .iter()
            .map(|(name, len)| (name.to_string(), vec![b'A'; *len]))
            .collect()
    }

    #[test]
    fn coverage_threshold() {
        let seqs_a = seqs(&[("P1", 100), ("P2", 100)]);
        let seqs_b = seqs(&[("Q1", 100), ("Q2", 100)]);

        let hits = vec![hit("P1", "Q1", 0, 40), hit("P2", "Q2", 0, 60)];
        let kept = filter_orthologs(hits, &seqs_a, &seqs_b, &OrthologFilter::default()).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].a, "P2");
        assert_eq!(kept[0].coverage_a, Some(0.6));
    }

    #[test]
    fn duplicates_and_missing() {
        let seqs_a = seqs(&[("P1", 10)]);
        let seqs_b = seqs(&[("Q1", 10)]);

        let mut second = hit("P1", "Q1", 0, 5);
        second.bitscore = 1.0;
        let hits = vec![hit("P1", "Q1", 0, 9), second, hit("P9", "Q1", 0, 9)];
        let kept = filter_orthologs(hits, &seqs_a, &seqs_b, &OrthologFilter::default()).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bitscore, 100.0);
    }

    #[test]
    fn ambiguous_residues() {
        let mut seqs_a = seqs(&[("P1", 10)]);
        seqs_a.insert("P1".to_string(), b"MKVXLAAGKV".to_vec());
        let seqs_b = seqs(&[("Q1", 10)]);

        let hits = vec![hit("P1", "Q1", 0, 9)];
        let kept = filter_orthologs(hits.clone(), &seqs_a, &seqs_b, &OrthologFilter::default()).unwrap();
        assert!(kept.is_empty());

        let filter = OrthologFilter {
            keep_ambiguous: true,
            ..Default::default()
        };
        let kept = filter_orthologs(hits, &seqs_a, &seqs_b, &filter).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn zero_length_is_fatal() {
        let seqs_a = seqs(&[("P1", 0)]);
        let seqs_b = seqs(&[("Q1", 10)]);
        let hits = vec![hit("P1", "Q1", 0, 9)];
        let err = filter_orthologs(hits, &seqs_a, &seqs_b, &OrthologFilter::default());
        assert!(matches!(err, Err(PpiError::Config(_))));
    }

    #[test]
    fn stat_values_match_headers() {
        let mut o = hit("P1", "Q1", 0, 9);
        o.coverage_a = Some(0.9);
        let values = o.stat_values();
        assert_eq!(values.len(), STAT_HEADERS.len());
        assert_eq!(values[0], "1e-20");
        assert_eq!(values[1], "9");
        assert_eq!(values[11], "0.9");
        assert_eq!(values[12], "");
    }

    #[test]
    fn table_keeps_every_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"A,B,E-Value,Global_Matching_Count\nP1,Q1,1e-20,10\nP2,Q2,0.5\n",
        )
        .unwrap();

        let table = read_ortholog_table(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.columns, vec!["E-Value", "Global_Matching_Count"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].a, "P1");
        assert_eq!(table.rows[0].values, vec!["1e-20", "10"]);
        // padded to the header width
        assert_eq!(table.rows[1].values, vec!["0.5", ""]);
    }
}
