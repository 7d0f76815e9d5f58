//! Interolog enumeration.
//!
//! Every unordered pair of ortholog rows `(i, j)`, `i > j`, is a candidate:
//! n orthologs give exactly n·(n−1)/2 candidates, so the work is O(n²) by
//! contract. A candidate is kept only when its two A proteins interact in
//! organism A, and it is labelled 1 when its two B proteins interact in
//! organism B.

use crate::libs::ortholog::{OrthologRow, OrthologTable};
use crate::libs::store::{InteractionGraph, InterfaceTable};
use rayon::prelude::*;
use std::fmt;

/// Two ortholog rows by index, `first > second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interolog {
    pub first: usize,
    pub second: usize,
    pub label: u8,
}

/// Number of candidates for `n` orthologs.
///
/// ```
/// assert_eq!(ppit::libs::interolog::pair_count(5), 10);
/// assert_eq!(ppit::libs::interolog::pair_count(0), 0);
/// ```
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// All `(i, j)` with `i > j`, row by row.
pub fn candidate_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(|i| (0..i).map(move |j| (i, j)))
}

/// Filters and labels one candidate.
pub fn label_pair(
    orthologs: &[OrthologRow],
    i: usize,
    j: usize,
    graph_a: &InteractionGraph,
    graph_b: &InteractionGraph,
) -> Option<Interolog> {
    let (oi, oj) = (&orthologs[i], &orthologs[j]);
    if !graph_a.interacts(&oi.a, &oj.a) {
        return None;
    }
    let label = if graph_b.interacts(&oi.b, &oj.b) { 1 } else { 0 };
    Some(Interolog {
        first: i,
        second: j,
        label,
    })
}

fn row<'a>(
    orthologs: &'a [OrthologRow],
    i: usize,
    graph_a: &'a InteractionGraph,
    graph_b: &'a InteractionGraph,
) -> impl Iterator<Item = Interolog> + 'a {
    (0..i).filter_map(move |j| label_pair(orthologs, i, j, graph_a, graph_b))
}

/// All interologs, in candidate order. Rows run in parallel on the current
/// rayon pool.
pub fn build(
    orthologs: &[OrthologRow],
    graph_a: &InteractionGraph,
    graph_b: &InteractionGraph,
) -> Vec<Interolog> {
    (0..orthologs.len())
        .into_par_iter()
        .flat_map_iter(|i| row(orthologs, i, graph_a, graph_b).collect::<Vec<_>>())
        .collect()
}

/// Like [`build`], but hands interologs to `sink` batch by batch, so the
/// full table is never held in memory.
///
/// Batches of `rows` ortholog rows are computed in parallel and passed
/// through a bounded channel to the calling thread. Order is the same as
/// [`build`]. An error from `sink` stops the enumeration.
pub fn stream<F>(
    orthologs: &[OrthologRow],
    graph_a: &InteractionGraph,
    graph_b: &InteractionGraph,
    rows: usize,
    mut sink: F,
) -> anyhow::Result<LabelSummary>
where
    F: FnMut(&Interolog) -> anyhow::Result<()>,
{
    let n = orthologs.len();
    let rows = rows.max(1);

    crossbeam::scope(|s| {
        let (snd, rcv) = crossbeam::channel::bounded::<Vec<Interolog>>(4);

        //----------------------------
        // Producer
        //----------------------------
        s.spawn(move |_| {
            for start in (0..n).step_by(rows) {
                let end = (start + rows).min(n);
                let batch: Vec<Interolog> = (start..end)
                    .into_par_iter()
                    .flat_map_iter(|i| row(orthologs, i, graph_a, graph_b).collect::<Vec<_>>())
                    .collect();
                // receiver gone
                if snd.send(batch).is_err() {
                    break;
                }
            }
        });

        //----------------------------
        // Consumer
        //----------------------------
        let mut summary = LabelSummary::default();
        for batch in rcv.iter() {
            for interolog in &batch {
                summary.add(interolog.label);
                sink(interolog)?;
            }
        }
        Ok::<_, anyhow::Error>(summary)
    })
    .map_err(|_| anyhow::anyhow!("interolog enumeration panicked"))?
}

/// Keeps interologs whose (A1, A2) pair has interface annotations.
pub fn filter_by_interfaces(
    interologs: Vec<Interolog>,
    orthologs: &[OrthologRow],
    interfaces: &InterfaceTable,
) -> Vec<Interolog> {
    interologs
        .into_iter()
        .filter(|it| interfaces.contains(&orthologs[it.first].a, &orthologs[it.second].a))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelSummary {
    pub total: usize,
    pub positive: usize,
    pub unlabelled: usize,
}

impl LabelSummary {
    pub fn add(&mut self, label: u8) {
        self.total += 1;
        if label == 1 {
            self.positive += 1;
        } else {
            self.unlabelled += 1;
        }
    }

    pub fn from_interologs(interologs: &[Interolog]) -> Self {
        let mut summary = Self::default();
        for it in interologs {
            summary.add(it.label);
        }
        summary
    }
}

impl fmt::Display for LabelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}, Positive: {}, Unlabelled: {}",
            self.total, self.positive, self.unlabelled
        )
    }
}

/// Header of the interolog table: every non-key column of the ortholog
/// table, once per side.
pub fn headers(table: &OrthologTable) -> Vec<String> {
    let mut headers: Vec<String> = ["A1", "B1", "A2", "B2"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for suffix in ["Pair_1", "Pair_2"] {
        headers.extend(table.columns.iter().map(|h| format!("{}_{}", h, suffix)));
    }
    headers.push("Label".to_string());
    headers
}

/// One row of the interolog table, in [`headers`] order.
pub fn values(orthologs: &[OrthologRow], interolog: &Interolog) -> Vec<String> {
    let (o1, o2) = (&orthologs[interolog.first], &orthologs[interolog.second]);
    let mut values = vec![o1.a.clone(), o1.b.clone(), o2.a.clone(), o2.b.clone()];
    values.extend(o1.values.iter().cloned());
    values.extend(o2.values.iter().cloned());
    values.push(interolog.label.to_string());
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ortholog(a: &str, b: &str) -> OrthologRow {
        OrthologRow {
            a: a.to_string(),
            b: b.to_string(),
            values: vec!["0".to_string(), format!("{}-{}", a, b)],
        }
    }

    fn fixture() -> (Vec<OrthologRow>, InteractionGraph, InteractionGraph) {
        let orthologs = vec![
            ortholog("P1", "Q1"),
            ortholog("P2", "Q2"),
            ortholog("P3", "Q3"),
            ortholog("P4", "Q4"),
        ];
        let mut graph_a = InteractionGraph::new();
        graph_a.insert("P1", "P2");
        graph_a.insert("P3", "P1");
        graph_a.insert("P4", "P4");
        let mut graph_b = InteractionGraph::new();
        graph_b.insert("Q2", "Q1");
        (orthologs, graph_a, graph_b)
    }

    #[test]
    fn candidates_are_unordered_pairs() {
        for n in 0..7 {
            let pairs: Vec<_> = candidate_pairs(n).collect();
            assert_eq!(pairs.len(), pair_count(n));
            assert!(pairs.iter().all(|(i, j)| i > j));
            let mut dedup = pairs.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), pairs.len());
        }
    }

    #[test]
    fn filter_and_label() {
        let (orthologs, graph_a, graph_b) = fixture();
        let interologs = build(&orthologs, &graph_a, &graph_b);
        assert_eq!(
            interologs,
            vec![
                Interolog { first: 1, second: 0, label: 1 },
                Interolog { first: 2, second: 0, label: 0 },
            ]
        );
        assert!(interologs.len() <= pair_count(orthologs.len()));

        let summary = LabelSummary::from_interologs(&interologs);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.positive, 1);
        assert_eq!(summary.unlabelled, 1);
    }

    #[test]
    fn stream_matches_build() {
        let (orthologs, graph_a, graph_b) = fixture();
        let expected = build(&orthologs, &graph_a, &graph_b);

        for rows in [1, 2, 10] {
            let mut got = vec![];
            let summary = stream(&orthologs, &graph_a, &graph_b, rows, |it| {
                got.push(*it);
                Ok(())
            })
            .unwrap();
            assert_eq!(got, expected);
            assert_eq!(summary.total, expected.len());
        }
    }

    #[test]
    fn stream_stops_on_sink_error() {
        let (orthologs, graph_a, graph_b) = fixture();
        let result = stream(&orthologs, &graph_a, &graph_b, 1, |_| {
            anyhow::bail!("disk full")
        });
        assert!(result.is_err());
    }

    #[test]
    fn interface_filter() {
        let (orthologs, graph_a, graph_b) = fixture();
        let interologs = build(&orthologs, &graph_a, &graph_b);

        let mut table = InterfaceTable::new();
        table.insert("P1", "P3", "PDB", "[1]", "[2]");
        let kept = filter_by_interfaces(interologs, &orthologs, &table);
        assert_eq!(kept.len(), 1);
        assert_eq!(orthologs[kept[0].first].a, "P3");
    }

    #[test]
    fn table_row() {
        let (orthologs, _, _) = fixture();
        let table = OrthologTable {
            columns: vec!["E-Value".to_string(), "Global_Matching_Count".to_string()],
            rows: orthologs,
        };
        let it = Interolog { first: 1, second: 0, label: 1 };
        let headers = headers(&table);
        let values = values(&table.rows, &it);
        assert_eq!(headers.len(), values.len());
        assert_eq!(headers.len(), 4 + 2 * 2 + 1);
        assert_eq!(headers[4], "E-Value_Pair_1");
        assert_eq!(headers[5], "Global_Matching_Count_Pair_1");
        assert_eq!(headers[7], "Global_Matching_Count_Pair_2");
        assert_eq!(&values[..4], &["P2", "Q2", "P1", "Q1"]);
        assert_eq!(values[5], "P2-Q2");
        assert_eq!(values[7], "P1-Q1");
        assert_eq!(values.last().unwrap(), "1");
    }
}
