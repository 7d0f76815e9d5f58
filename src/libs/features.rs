//! Feature records of orthologs and interologs.
//!
//! Column names are derived from the records themselves: category output
//! names prefixed by region, and `_Pair_1`/`_Pair_2` on interolog sides.

use crate::format_value;
use crate::libs::align::GlobalAlignment;
use crate::libs::compare::{
    compare_sequence, compare_sites, Category, Comparison, BASIC_CATEGORIES, INTERFACE_CATEGORIES,
};
use crate::libs::gap_pattern::GapPatternModel;
use crate::libs::indices::ResidueIndexSet;
use crate::libs::ortholog::{OrthologPair, STAT_HEADERS};
use crate::libs::store::{Domains, SpecialSites};
use crate::libs::tables::Tables;

/// Divergence of one ortholog pair over its whole alignment, its domain and
/// its special sites.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthologFeatures {
    pub ortholog: OrthologPair,
    pub score: f64,
    pub length: usize,
    pub global: Comparison,
    pub domain: Comparison,
    pub domain_length: usize,
    pub special_sites: Comparison,
    pub special_sites_length: usize,
}

impl OrthologFeatures {
    pub fn compute(
        ortholog: &OrthologPair,
        alignment: &GlobalAlignment,
        domains: &Domains,
        sites: &SpecialSites,
        tables: &Tables,
    ) -> Self {
        let global = compare_sequence(
            alignment.track_a.as_bytes(),
            alignment.track_b.as_bytes(),
            BASIC_CATEGORIES,
            tables,
        );

        let domain_indices = domains.indices(&ortholog.a);
        let domain = compare_sites(&domain_indices, alignment, BASIC_CATEGORIES, tables);

        let site_indices = sites.indices(&ortholog.a);
        let special_sites = compare_sites(&site_indices, alignment, BASIC_CATEGORIES, tables);

        Self {
            ortholog: ortholog.clone(),
            score: alignment.score,
            length: alignment.length,
            global,
            domain,
            domain_length: domain_indices.len(),
            special_sites,
            special_sites_length: site_indices.len(),
        }
    }

    pub fn headers() -> Vec<String> {
        let mut headers = vec!["A".to_string(), "B".to_string()];
        headers.extend(STAT_HEADERS.iter().map(|s| s.to_string()));
        headers.push("Global_Score".to_string());
        headers.push("Global_Length".to_string());
        headers.extend(Comparison::headers(BASIC_CATEGORIES, "Global"));
        headers.extend(Comparison::headers(BASIC_CATEGORIES, "Domain"));
        headers.push("Domain_Length".to_string());
        headers.extend(Comparison::headers(BASIC_CATEGORIES, "Special-Sites"));
        headers.push("Special-Sites_Length".to_string());
        headers
    }

    pub fn values(&self) -> Vec<String> {
        let mut values = vec![self.ortholog.a.clone(), self.ortholog.b.clone()];
        values.extend(self.ortholog.stat_values());
        values.push(format_value(self.score));
        values.push(self.length.to_string());
        values.extend(self.global.values().map(format_value));
        values.extend(self.domain.values().map(format_value));
        values.push(self.domain_length.to_string());
        values.extend(self.special_sites.values().map(format_value));
        values.push(self.special_sites_length.to_string());
        values
    }
}

/// Interface residues of one interolog side.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceFeatures {
    pub comparison: Comparison,
    pub length: usize,
    pub overlap_special_sites: usize,
    pub overlap_domain: usize,
    pub gap_score: f64,
}

impl InterfaceFeatures {
    /// `indices` are 0-based interface residues of the side's A protein.
    /// Overlaps are counted against the annotations of `overlap_protein`.
    pub fn compute(
        indices: &[usize],
        alignment: &GlobalAlignment,
        overlap_protein: &str,
        domains: &Domains,
        sites: &SpecialSites,
        model: &GapPatternModel,
        tables: &Tables,
    ) -> Self {
        let comparison = compare_sites(indices, alignment, INTERFACE_CATEGORIES, tables);

        let site_set = ResidueIndexSet::from_indices(sites.indices(overlap_protein));
        let domain_set = ResidueIndexSet::from_indices(domains.indices(overlap_protein));

        Self {
            comparison,
            length: indices.len(),
            overlap_special_sites: site_set.overlap(indices),
            overlap_domain: domain_set.overlap(indices),
            gap_score: model.score(indices, alignment),
        }
    }

    pub fn headers(suffix: &str) -> Vec<String> {
        let mut headers: Vec<String> = Comparison::headers(INTERFACE_CATEGORIES, "Interface")
            .into_iter()
            .map(|h| format!("{}_{}", h, suffix))
            .collect();
        for name in [
            "Interface_Residues_Length",
            "Interface_Overlapping_Special-Sites_Count",
            "Interface_Overlapping_Domain_Count",
            "Interface_Gap_Score",
        ] {
            headers.push(format!("{}_{}", name, suffix));
        }
        headers
    }

    pub fn values(&self) -> Vec<String> {
        let mut values: Vec<String> = self.comparison.values().map(format_value).collect();
        values.push(self.length.to_string());
        values.push(self.overlap_special_sites.to_string());
        values.push(self.overlap_domain.to_string());
        values.push(format_value(self.gap_score));
        values
    }

    pub fn get(&self, category: Category) -> Option<&[f64]> {
        self.comparison.get(category)
    }
}

/// Both interface sides of an interolog.
#[derive(Debug, Clone, PartialEq)]
pub struct InterologFeatures {
    pub side1: InterfaceFeatures,
    pub side2: InterfaceFeatures,
    /// Database the interface was predicted from
    pub source: String,
    pub label: u8,
}

impl InterologFeatures {
    /// Feature columns; the interolog's own columns and label are written
    /// around them by the caller.
    pub fn headers() -> Vec<String> {
        let mut headers = InterfaceFeatures::headers("Pair_1");
        headers.extend(InterfaceFeatures::headers("Pair_2"));
        headers.push("Interface_Database".to_string());
        headers
    }

    pub fn values(&self) -> Vec<String> {
        let mut values = self.side1.values();
        values.extend(self.side2.values());
        values.push(self.source.clone());
        values
    }
}
