//! Global alignment of ortholog pairs.
//!
//! [`align_all`] is a three-state affine-gap Needleman-Wunsch (Gotoh) that
//! returns every score-optimal alignment, not just one traceback:
//!
//! - **M**: best score ending with `a[i-1]` aligned to `b[j-1]`
//! - **X**: best score ending with `a[i-1]` against a gap
//! - **Y**: best score ending with a gap against `b[j-1]`
//!
//! [`select_best`] then picks one candidate by identity counts.

use crate::libs::compare::identical_count;
use crate::libs::error::PpiError;
use crate::libs::gap::{self, GAP};
use crate::libs::tables::SubstitutionMatrix;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Fixed-point factor for scores; penalties with one decimal compare exactly
const SCALE: f64 = 10.0;
const NEG: i32 = i32::MIN / 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignParams {
    pub gap_open: f64,
    pub gap_extend: f64,
    /// Upper bound on enumerated co-optimal alignments
    pub max_alignments: usize,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            gap_open: -10.0,
            gap_extend: -0.5,
            max_alignments: 1000,
        }
    }
}

/// One score-optimal alignment as produced by the primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub track_a: Vec<u8>,
    pub track_b: Vec<u8>,
    pub score: f64,
}

impl Candidate {
    /// Columns left after trimming the leading and trailing gap runs of
    /// both tracks. Inner gaps count.
    ///
    /// ```
    /// use ppit::libs::align::Candidate;
    /// let c = Candidate { track_a: b"--MKV-".to_vec(), track_b: b"AAMK-L".to_vec(), score: 0.0 };
    /// assert_eq!(c.length(), 3);
    /// ```
    pub fn length(&self) -> usize {
        let residue = |x: &u8| *x != GAP;
        let first = |t: &[u8]| t.iter().position(residue);
        let last = |t: &[u8]| t.iter().rposition(residue);

        let start = first(&self.track_a).zip(first(&self.track_b));
        let end = last(&self.track_a).zip(last(&self.track_b));
        match (start, end) {
            (Some((sa, sb)), Some((ea, eb))) if ea.min(eb) >= sa.max(sb) => {
                ea.min(eb) + 1 - sa.max(sb)
            }
            _ => 0,
        }
    }
}

/// The alignment kept for an ortholog pair. Field names follow the
/// `A,B,Alignment1,Alignment2,Score,Length` table layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobalAlignment {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "Alignment1")]
    pub track_a: String,
    #[serde(rename = "Alignment2")]
    pub track_b: String,
    #[serde(rename = "Score")]
    pub score: f64,
    #[serde(rename = "Length")]
    pub length: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    M,
    X,
    Y,
}

struct Matrices {
    cols: usize,
    m: Vec<i32>,
    x: Vec<i32>,
    y: Vec<i32>,
}

impl Matrices {
    fn get(&self, state: State, i: usize, j: usize) -> i32 {
        let k = i * self.cols + j;
        match state {
            State::M => self.m[k],
            State::X => self.x[k],
            State::Y => self.y[k],
        }
    }
}

fn scaled(v: f64) -> i32 {
    (v * SCALE).round() as i32
}

fn max3(a: i32, b: i32, c: i32) -> i32 {
    a.max(b).max(c)
}

fn fill(a: &[u8], b: &[u8], matrix: &SubstitutionMatrix, open: i32, ext: i32) -> Matrices {
    let rows = a.len() + 1;
    let cols = b.len() + 1;
    let idx = |i: usize, j: usize| i * cols + j;

    let mut m = vec![NEG; rows * cols];
    let mut x = vec![NEG; rows * cols];
    let mut y = vec![NEG; rows * cols];
    m[0] = 0;

    for i in 0..rows {
        for j in 0..cols {
            if i > 0 && j > 0 {
                let sub = matrix.score(a[i - 1], b[j - 1]) * SCALE as i32;
                let k = idx(i - 1, j - 1);
                m[idx(i, j)] = max3(m[k], x[k], y[k]) + sub;
            }
            if i > 0 {
                let k = idx(i - 1, j);
                x[idx(i, j)] = max3(m[k] + open, x[k] + ext, y[k] + open);
            }
            if j > 0 {
                let k = idx(i, j - 1);
                y[idx(i, j)] = max3(m[k] + open, y[k] + ext, x[k] + open);
            }
        }
    }

    Matrices { cols, m, x, y }
}

/// All score-optimal global alignments of `a` and `b`, at most
/// `params.max_alignments` of them. End gaps cost the same as internal ones.
///
/// An empty sequence on either side yields no candidates.
pub fn align_all(
    a: &[u8],
    b: &[u8],
    matrix: &SubstitutionMatrix,
    params: &AlignParams,
) -> Vec<Candidate> {
    if a.is_empty() || b.is_empty() || params.max_alignments == 0 {
        return vec![];
    }

    let open = scaled(params.gap_open);
    let ext = scaled(params.gap_extend);
    let mats = fill(a, b, matrix, open, ext);

    let (n, m) = (a.len(), b.len());
    let best = max3(
        mats.get(State::M, n, m),
        mats.get(State::X, n, m),
        mats.get(State::Y, n, m),
    );
    let score = best as f64 / SCALE;

    // Depth-first over co-optimal predecessors; every frame carries the
    // length of the shared column path it continues from.
    let mut stack: Vec<(State, usize, usize, usize)> = [State::Y, State::X, State::M]
        .into_iter()
        .filter(|&s| mats.get(s, n, m) == best)
        .map(|s| (s, n, m, 0))
        .collect();
    let mut path: Vec<(u8, u8)> = Vec::with_capacity(n + m);
    let mut candidates = vec![];

    while let Some((state, i, j, depth)) = stack.pop() {
        path.truncate(depth);

        if i == 0 && j == 0 {
            let (track_a, track_b): (Vec<u8>, Vec<u8>) = path.iter().rev().cloned().unzip();
            candidates.push(Candidate {
                track_a,
                track_b,
                score,
            });
            if candidates.len() >= params.max_alignments {
                break;
            }
            continue;
        }

        let value = mats.get(state, i, j);
        let (column, pi, pj, steps) = match state {
            State::M => {
                let sub = matrix.score(a[i - 1], b[j - 1]) * SCALE as i32;
                ((a[i - 1], b[j - 1]), i - 1, j - 1, [sub, sub, sub])
            }
            State::X => ((a[i - 1], GAP), i - 1, j, [open, ext, open]),
            State::Y => ((GAP, b[j - 1]), i, j - 1, [open, open, ext]),
        };
        path.push(column);
        let depth = path.len();

        // pushed in reverse so that M is explored first
        for (prev, step) in [State::M, State::X, State::Y].into_iter().zip(steps).rev() {
            let p = mats.get(prev, pi, pj);
            if p > NEG / 2 && p + step == value {
                stack.push((prev, pi, pj, depth));
            }
        }
    }

    candidates
}

/// Picks one candidate: most identical columns overall, then most identical
/// columns at `priority` (0-based positions of A, shifted through each
/// candidate's own A track), then the lexicographically smallest tracks.
pub fn select_best(candidates: Vec<Candidate>, priority: &[usize]) -> Option<Candidate> {
    let keyed = candidates.into_iter().map(|c| {
        let global = identical_count(&c.track_a, &c.track_b);
        let local = if priority.is_empty() {
            0
        } else {
            let shifted = gap::shift(&c.track_a, priority);
            identical_count(
                &gap::extract(&c.track_a, &shifted.indices),
                &gap::extract(&c.track_b, &shifted.indices),
            )
        };
        (global, local, c)
    });

    keyed
        .max_by(|x, y| {
            x.0.cmp(&y.0)
                .then(x.1.cmp(&y.1))
                .then_with(|| tracks_order(&y.2, &x.2))
        })
        .map(|(_, _, c)| c)
}

fn tracks_order(x: &Candidate, y: &Candidate) -> Ordering {
    x.track_a
        .cmp(&y.track_a)
        .then_with(|| x.track_b.cmp(&y.track_b))
}

/// Aligns an ortholog pair and keeps the best candidate.
pub fn global_alignment(
    a: &str,
    b: &str,
    seq_a: &[u8],
    seq_b: &[u8],
    matrix: &SubstitutionMatrix,
    params: &AlignParams,
    priority: &[usize],
) -> Result<GlobalAlignment, PpiError> {
    let candidates = align_all(seq_a, seq_b, matrix, params);
    let best = select_best(candidates, priority).ok_or_else(|| PpiError::NoAlignment {
        a: a.to_string(),
        b: b.to_string(),
    })?;

    Ok(GlobalAlignment {
        a: a.to_string(),
        b: b.to_string(),
        length: best.length(),
        score: best.score,
        track_a: String::from_utf8_lossy(&best.track_a).into_owned(),
        track_b: String::from_utf8_lossy(&best.track_b).into_owned(),
    })
}

pub fn write_alignments(alignments: &[GlobalAlignment], outfile: &str) -> anyhow::Result<()> {
    let mut writer = crate::table_writer(outfile)?;
    writer.write_record(["A", "B", "Alignment1", "Alignment2", "Score", "Length"])?;
    for aln in alignments {
        writer.write_record([
            aln.a.as_str(),
            aln.b.as_str(),
            aln.track_a.as_str(),
            aln.track_b.as_str(),
            crate::format_value(aln.score).as_str(),
            aln.length.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Global alignments keyed by the ordered protein pair.
pub type AlignmentMap = HashMap<(String, String), GlobalAlignment>;

pub fn read_alignments(infile: &str) -> anyhow::Result<AlignmentMap> {
    let mut reader = crate::table_reader(infile, b',')?;
    let mut map = AlignmentMap::new();
    for result in reader.deserialize() {
        let record: GlobalAlignment = result?;
        if record.track_a.len() != record.track_b.len() {
            return Err(PpiError::Format(format!(
                "tracks of {} and {} differ in length",
                record.a, record.b
            ))
            .into());
        }
        map.insert((record.a.clone(), record.b.clone()), record);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(a: &str, b: &str) -> Candidate {
        Candidate {
            track_a: a.as_bytes().to_vec(),
            track_b: b.as_bytes().to_vec(),
            score: 0.0,
        }
    }

    #[test]
    fn identical_sequences() {
        let matrix = SubstitutionMatrix::blosum62();
        let all = align_all(b"MKVLA", b"MKVLA", &matrix, &AlignParams::default());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].track_a, b"MKVLA".to_vec());
        // M5 K5 V4 L4 A4
        assert_eq!(all[0].score, 22.0);
        assert_eq!(all[0].length(), 5);
    }

    #[test]
    fn affine_gap_cost() {
        let matrix = SubstitutionMatrix::blosum62();
        let all = align_all(b"WWWAAWWW", b"WWWWWW", &matrix, &AlignParams::default());
        assert!(!all.is_empty());
        // six W/W pairs and one gap of length two
        for c in &all {
            assert_eq!(c.score, 66.0 - 10.5);
            assert_eq!(c.track_b, b"WWW--WWW".to_vec());
        }
    }

    #[test]
    fn co_optimal_enumeration() {
        let matrix = SubstitutionMatrix::blosum62();
        // the single A can pair with either A of the longer sequence
        let all = align_all(b"WAAW", b"WAW", &matrix, &AlignParams::default());
        let tracks: Vec<_> = all.iter().map(|c| c.track_b.clone()).collect();
        assert!(tracks.contains(&b"WA-W".to_vec()));
        assert!(tracks.contains(&b"W-AW".to_vec()));
        assert!(all.iter().all(|c| c.score == all[0].score));

        let capped = align_all(
            b"WAAW",
            b"WAW",
            &matrix,
            &AlignParams {
                max_alignments: 1,
                ..Default::default()
            },
        );
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn empty_sequence_has_no_alignment() {
        let matrix = SubstitutionMatrix::blosum62();
        assert!(align_all(b"", b"MK", &matrix, &AlignParams::default()).is_empty());

        let err = global_alignment("P1", "Q1", b"MK", b"", &matrix, &AlignParams::default(), &[]);
        assert_eq!(
            err.unwrap_err(),
            PpiError::NoAlignment {
                a: "P1".to_string(),
                b: "Q1".to_string()
            }
        );
    }

    #[test]
    fn tie_break_on_global_identity() {
        let fewer = candidate("MKVL", "MRVI");
        let more = candidate("MKVL", "MKVI");
        let best = select_best(vec![fewer.clone(), more.clone()], &[3]).unwrap();
        assert_eq!(best, more);
    }

    #[test]
    fn tie_break_on_priority_identity() {
        // both have 2 identical columns; only the second keeps position 3 identical
        let first = candidate("MKVL", "MAVI");
        let second = candidate("MKVL", "MRAL");
        let best = select_best(vec![first.clone(), second.clone()], &[3]).unwrap();
        assert_eq!(best, second);

        // without a priority set the lexicographic order decides
        let best = select_best(vec![first.clone(), second.clone()], &[]).unwrap();
        assert_eq!(best, first);
    }

    #[test]
    fn tie_break_shifts_priority_through_each_track() {
        // A is MKVLA in both; position 3 is the L, which sits in column 4
        // of either track. Unshifted, column 3 would favour `other`.
        let kept = candidate("MK-VLA", "MKAILA");
        let other = candidate("M-KVLA", "MRKVIA");
        assert_eq!(identical_count(&kept.track_a, &kept.track_b), 4);
        assert_eq!(identical_count(&other.track_a, &other.track_b), 4);

        let best = select_best(vec![other.clone(), kept.clone()], &[3]).unwrap();
        assert_eq!(best, kept);
        let best = select_best(vec![kept.clone(), other.clone()], &[3]).unwrap();
        assert_eq!(best, kept);

        // lexicographic order alone would pick the other one
        let best = select_best(vec![kept.clone(), other.clone()], &[]).unwrap();
        assert_eq!(best, other);
    }

    #[test]
    fn length_trims_terminal_gaps() {
        // leading gaps of A and trailing gap of B are padding
        assert_eq!(candidate("--MKVL", "AAMK-L").length(), 4);
        assert_eq!(candidate("MKVLA", "-KVL-").length(), 3);
        // inner gaps are part of the span
        assert_eq!(candidate("MK--VL", "MKAAVL").length(), 6);
        assert_eq!(candidate("MK--", "--VL").length(), 0);
        assert_eq!(candidate("----", "MKVL").length(), 0);
    }

    #[test]
    fn tie_break_is_deterministic() {
        let x = candidate("WA-W", "WAAW");
        let y = candidate("W-AW", "WAAW");
        let a = select_best(vec![x.clone(), y.clone()], &[]).unwrap();
        let b = select_best(vec![y.clone(), x.clone()], &[]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, y);
    }

    #[test]
    fn global_alignment_record() {
        let matrix = SubstitutionMatrix::blosum62();
        let aln = global_alignment(
            "P1",
            "Q1",
            b"WAAW",
            b"WAW",
            &matrix,
            &AlignParams::default(),
            &[],
        )
        .unwrap();
        assert_eq!(aln.track_a, "WAAW");
        assert_eq!(aln.track_b.len(), 4);
        assert_eq!(aln.length, 4);
    }
}
