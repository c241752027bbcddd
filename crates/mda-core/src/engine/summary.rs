use crate::core::models::domain::{Domain, SequenceError};
use crate::core::models::protein::Protein;
use std::collections::BTreeMap;
use std::fmt;

/// Group key and project prefix used when no reference architecture was requested.
pub const ALL_DOMAINS_KEY: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

impl LengthStats {
    /// Returns `None` for an empty set of lengths.
    pub fn from_lengths(lengths: impl IntoIterator<Item = usize>) -> Option<Self> {
        let mut count = 0usize;
        let mut total = 0usize;
        let mut min = usize::MAX;
        let mut max = 0usize;
        for len in lengths {
            count += 1;
            total += len;
            min = min.min(len);
            max = max.max(len);
        }
        (count > 0).then(|| Self {
            min,
            max,
            mean: total as f64 / count as f64,
        })
    }
}

impl fmt::Display for LengthStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{:.2}", self.min, self.max, self.mean)
    }
}

/// Domains of one architecture group that match the reference architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdaSummary {
    pub architecture_key: String,
    pub reference_architecture_key: Option<String>,
    pub protein_count: usize,
    pub matched_domains: Vec<Domain>, // Carry their chopped residue sequence
}

impl MdaSummary {
    pub fn new(architecture_key: impl Into<String>, reference: Option<&str>) -> Self {
        Self {
            architecture_key: architecture_key.into(),
            reference_architecture_key: reference.map(str::to_string),
            protein_count: 0,
            matched_domains: Vec::new(),
        }
    }

    /// Counts the protein and collects its reference domains with their sequences chopped.
    ///
    /// Every admitted protein is counted, including those contributing no domains.
    pub fn add_protein(&mut self, protein: &Protein) -> Result<(), SequenceError> {
        for domain in protein.sorted_domains() {
            if !self.is_reference_domain(domain) {
                continue;
            }
            let mut matched = domain.clone();
            matched.sequence = Some(protein.chop_domain(domain)?);
            self.matched_domains.push(matched);
        }
        self.protein_count += 1;
        Ok(())
    }

    pub fn domain_count(&self) -> usize {
        self.matched_domains.len()
    }

    pub fn domain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.matched_domains
            .iter()
            .map(|d| d.sequence.as_ref().map_or(0, String::len))
    }

    pub fn length_stats(&self) -> Option<LengthStats> {
        LengthStats::from_lengths(self.domain_lengths())
    }

    fn is_reference_domain(&self, domain: &Domain) -> bool {
        match &self.reference_architecture_key {
            Some(reference) => domain.architecture_key().as_deref() == Some(reference.as_str()),
            None => true,
        }
    }
}

/// Groups proteins into summaries.
///
/// Partitioned summaries are keyed by each protein's architecture string; otherwise every
/// protein lands in a single summary keyed by the reference architecture (or
/// [`ALL_DOMAINS_KEY`] without one).
pub fn build_summaries<'a>(
    proteins: impl IntoIterator<Item = &'a Protein>,
    reference_architecture_key: Option<&str>,
    partition_by_architecture: bool,
) -> Result<BTreeMap<String, MdaSummary>, SequenceError> {
    let mut summaries: BTreeMap<String, MdaSummary> = BTreeMap::new();
    for protein in proteins {
        let key = if partition_by_architecture {
            protein.to_architecture_string()
        } else {
            reference_architecture_key
                .unwrap_or(ALL_DOMAINS_KEY)
                .to_string()
        };
        summaries
            .entry(key)
            .or_insert_with_key(|key| MdaSummary::new(key.clone(), reference_architecture_key))
            .add_protein(protein)?;
    }
    Ok(summaries)
}
