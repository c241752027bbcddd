use super::domain::{Domain, SequenceError, UNKNOWN_ARCHITECTURE};
use super::segment::DEFAULT_MAX_GAP;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error(
        "Protein '{protein_id}' looks like it has already been merged: domain '{domain_id}' carries more than one superfamily id ({architecture})"
    )]
    AlreadyMerged {
        protein_id: String,
        domain_id: String,
        architecture: String,
    },

    #[error(
        "Merging domains of protein '{protein_id}' would produce '{domain_id}', which already names a domain outside the merged group"
    )]
    DomainIdCollision {
        protein_id: String,
        domain_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protein {
    pub protein_id: String,       // Stable external accession (e.g. UniProtKB)
    pub sequence: Option<String>, // Full amino acid sequence, if the row source supplied one
    domains: BTreeMap<String, Domain>,
}

impl Protein {
    pub fn new(protein_id: impl Into<String>, sequence: Option<String>) -> Self {
        Self {
            protein_id: protein_id.into(),
            sequence,
            domains: BTreeMap::new(),
        }
    }

    /// Inserts `domain`, replacing any domain already stored under the same id.
    pub fn add_domain(&mut self, domain: Domain) {
        self.domains.insert(domain.domain_id.clone(), domain);
    }

    pub fn remove_domain(&mut self, domain_id: &str) -> Option<Domain> {
        self.domains.remove(domain_id)
    }

    pub fn has_domain(&self, domain_id: &str) -> bool {
        self.domains.contains_key(domain_id)
    }

    pub fn domain(&self, domain_id: &str) -> Option<&Domain> {
        self.domains.get(domain_id)
    }

    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.domains.values()
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    pub fn into_domains(self) -> impl Iterator<Item = Domain> {
        self.domains.into_values()
    }

    /// Domains ordered by their first residue; ties keep domain id order.
    pub fn sorted_domains(&self) -> Vec<&Domain> {
        let mut domains: Vec<&Domain> = self.domains.values().collect();
        domains.sort_by_key(|d| d.start_pos());
        domains
    }

    /// The protein's architecture: each domain's single (or first) superfamily id, in sequence order.
    pub fn to_architecture_string(&self) -> String {
        self.sorted_domains()
            .iter()
            .map(|d| d.primary_superfamily().unwrap_or(UNKNOWN_ARCHITECTURE))
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn chop_domain(&self, domain: &Domain) -> Result<String, SequenceError> {
        let sequence = self
            .sequence
            .as_deref()
            .ok_or_else(|| SequenceError::MissingSequence {
                protein_id: self.protein_id.clone(),
                domain_id: domain.domain_id.clone(),
            })?;
        domain.chop(sequence)
    }

    pub fn merge_into_target_architecture(
        &mut self,
        target_superfamily_ids: &[String],
    ) -> Result<usize, MergeError> {
        self.merge_into_target_architecture_with_gap(target_superfamily_ids, DEFAULT_MAX_GAP)
    }

    /// Collapses each run of consecutive domains matching `target_superfamily_ids` into one
    /// domain tagged with the whole target. Returns the number of fused groups.
    pub fn merge_into_target_architecture_with_gap(
        &mut self,
        target_superfamily_ids: &[String],
        max_gap: usize,
    ) -> Result<usize, MergeError> {
        if target_superfamily_ids.is_empty() {
            return Ok(0);
        }

        if let Some(merged) = self.domains.values().find(|d| d.is_merged()) {
            return Err(MergeError::AlreadyMerged {
                protein_id: self.protein_id.clone(),
                domain_id: merged.domain_id.clone(),
                architecture: merged.architecture_key().unwrap_or_default(),
            });
        }

        let ordered: Vec<Domain> = self.sorted_domains().into_iter().cloned().collect();

        let mut groups: Vec<Vec<&Domain>> = Vec::new();
        let mut current: Vec<&Domain> = Vec::new();
        for domain in &ordered {
            if domain.primary_superfamily() != Some(target_superfamily_ids[current.len()].as_str())
            {
                current.clear();
                if domain.primary_superfamily() != Some(target_superfamily_ids[0].as_str()) {
                    continue;
                }
            }
            current.push(domain);
            if current.len() == target_superfamily_ids.len() {
                groups.push(std::mem::take(&mut current));
            }
        }

        let mut fused = Vec::with_capacity(groups.len());
        for group in &groups {
            let merged = Domain::merge(
                &self.protein_id,
                group.iter().copied(),
                target_superfamily_ids.to_vec(),
                max_gap,
            );
            let clashes = self.domains.contains_key(&merged.domain_id)
                && !group.iter().any(|d| d.domain_id == merged.domain_id);
            if clashes {
                return Err(MergeError::DomainIdCollision {
                    protein_id: self.protein_id.clone(),
                    domain_id: merged.domain_id,
                });
            }
            fused.push((group, merged));
        }

        for (group, merged) in fused {
            debug!(
                "Found {} consecutive MDA domains in {}, merging.",
                group.len(),
                self.protein_id
            );
            for domain in group {
                self.domains.remove(&domain.domain_id);
            }
            self.add_domain(merged);
        }

        Ok(groups.len())
    }
}

impl fmt::Display for Protein {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sequence {
            Some(seq) => writeln!(f, "Protein: {} (seq len:{})", self.protein_id, seq.len())?,
            None => writeln!(f, "Protein: {} (seq len:None)", self.protein_id)?,
        }
        for domain in self.sorted_domains() {
            writeln!(f, "  {}", domain)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::segment::Segment;

    fn sfams(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn domain(protein_id: &str, sfam: &str, start: usize, stop: usize) -> Domain {
        Domain::new(
            format!("{}/{}-{}", protein_id, start, stop),
            sfams(&[sfam]),
            vec![Segment::new(start, stop)],
        )
    }

    fn three_domain_protein() -> Protein {
        let mut protein = Protein::new("P1", Some("A".repeat(300)));
        protein.add_domain(domain("P1", "3.3.3.3", 200, 250));
        protein.add_domain(domain("P1", "1.1.1.1", 1, 50));
        protein.add_domain(domain("P1", "2.2.2.2", 51, 100));
        protein
    }

    #[test]
    fn add_domain_overwrites_by_id() {
        let mut protein = Protein::new("P1", None);
        protein.add_domain(domain("P1", "1.1.1.1", 1, 50));
        let mut replacement = domain("P1", "1.1.1.1", 1, 50);
        replacement.sequence = Some("X".to_string());
        protein.add_domain(replacement.clone());

        assert_eq!(protein.domain_count(), 1);
        assert_eq!(protein.domain("P1/1-50"), Some(&replacement));
    }

    #[test]
    fn remove_domain_returns_removed_domain() {
        let mut protein = three_domain_protein();
        let removed = protein.remove_domain("P1/1-50").unwrap();
        assert_eq!(removed.superfamily_ids, sfams(&["1.1.1.1"]));
        assert!(!protein.has_domain("P1/1-50"));
        assert!(protein.remove_domain("P1/1-50").is_none());
    }

    #[test]
    fn architecture_string_is_in_sequence_order() {
        let protein = three_domain_protein();
        assert_eq!(protein.to_architecture_string(), "1.1.1.1-2.2.2.2-3.3.3.3");
    }

    #[test]
    fn architecture_string_marks_unclassified_domains() {
        let mut protein = Protein::new("P1", None);
        protein.add_domain(domain("P1", "1.1.1.1", 100, 150));
        protein.add_domain(Domain::new("P1/1-50", vec![], vec![Segment::new(1, 50)]));
        assert_eq!(protein.to_architecture_string(), "unknown-1.1.1.1");
    }

    #[test]
    fn merge_collapses_matching_pair_and_leaves_the_rest() {
        let mut protein = three_domain_protein();
        let merged = protein
            .merge_into_target_architecture(&sfams(&["1.1.1.1", "2.2.2.2"]))
            .unwrap();
        assert_eq!(merged, 1);
        assert_eq!(protein.domain_count(), 2);

        let fused = protein.domain("P1/1-100").unwrap();
        assert_eq!(fused.segments, vec![Segment::new(1, 100)]);
        assert_eq!(fused.superfamily_ids, sfams(&["1.1.1.1", "2.2.2.2"]));

        let untouched = protein.domain("P1/200-250").unwrap();
        assert_eq!(untouched.superfamily_ids, sfams(&["3.3.3.3"]));
        assert_eq!(untouched.segments, vec![Segment::new(200, 250)]);
    }

    #[test]
    fn merge_handles_repeated_architecture_runs() {
        let mut protein = Protein::new("P1", None);
        protein.add_domain(domain("P1", "A", 1, 50));
        protein.add_domain(domain("P1", "B", 51, 100));
        protein.add_domain(domain("P1", "A", 300, 350));
        protein.add_domain(domain("P1", "B", 351, 400));

        let merged = protein
            .merge_into_target_architecture(&sfams(&["A", "B"]))
            .unwrap();
        assert_eq!(merged, 2);
        assert!(protein.has_domain("P1/1-100"));
        assert!(protein.has_domain("P1/300-400"));
    }

    #[test]
    fn merge_requires_consecutive_domains() {
        let mut protein = Protein::new("P1", None);
        protein.add_domain(domain("P1", "A", 1, 50));
        protein.add_domain(domain("P1", "C", 51, 100));
        protein.add_domain(domain("P1", "B", 101, 150));

        let merged = protein
            .merge_into_target_architecture(&sfams(&["A", "B"]))
            .unwrap();
        assert_eq!(merged, 0);
        assert_eq!(protein.domain_count(), 3);
    }

    #[test]
    fn merge_restarts_match_on_the_mismatching_domain() {
        let mut protein = Protein::new("P1", None);
        protein.add_domain(domain("P1", "A", 1, 50));
        protein.add_domain(domain("P1", "A", 60, 100));
        protein.add_domain(domain("P1", "B", 101, 150));

        let merged = protein
            .merge_into_target_architecture(&sfams(&["A", "B"]))
            .unwrap();
        assert_eq!(merged, 1);
        assert!(protein.has_domain("P1/1-50"));
        assert!(protein.has_domain("P1/60-150"));
    }

    #[test]
    fn merge_twice_fails_with_already_merged() {
        let mut protein = three_domain_protein();
        let target = sfams(&["1.1.1.1", "2.2.2.2"]);
        protein.merge_into_target_architecture(&target).unwrap();

        let before = protein.clone();
        let result = protein.merge_into_target_architecture(&target);
        assert!(matches!(
            result,
            Err(MergeError::AlreadyMerged { ref domain_id, .. }) if domain_id == "P1/1-100"
        ));
        assert_eq!(protein, before);
    }

    #[test]
    fn merge_refuses_to_replace_an_unrelated_domain() {
        let mut protein = Protein::new("P", None);
        protein.add_domain(domain("P", "A", 1, 50));
        protein.add_domain(domain("P", "B", 55, 100));
        protein.add_domain(domain("P", "C", 1, 100));

        let before = protein.clone();
        let result = protein.merge_into_target_architecture(&sfams(&["A", "B"]));
        assert_eq!(
            result,
            Err(MergeError::DomainIdCollision {
                protein_id: "P".to_string(),
                domain_id: "P/1-100".to_string(),
            })
        );
        assert_eq!(protein, before);
    }

    #[test]
    fn single_domain_target_keeps_its_own_id() {
        let mut protein = Protein::new("P", None);
        protein.add_domain(domain("P", "A", 1, 50));
        assert_eq!(
            protein.merge_into_target_architecture(&sfams(&["A"])),
            Ok(1)
        );
        assert_eq!(protein.domain_count(), 1);
        assert!(protein.has_domain("P/1-50"));
    }

    #[test]
    fn merge_with_empty_target_is_a_no_op() {
        let mut protein = three_domain_protein();
        let before = protein.clone();
        assert_eq!(protein.merge_into_target_architecture(&[]).unwrap(), 0);
        assert_eq!(protein, before);
    }

    #[test]
    fn chop_domain_requires_sequence() {
        let protein = Protein::new("P1", None);
        let d = domain("P1", "A", 1, 5);
        assert!(matches!(
            protein.chop_domain(&d),
            Err(SequenceError::MissingSequence { .. })
        ));

        let protein = Protein::new("P1", Some("ABCDEFGHIJ".to_string()));
        assert_eq!(protein.chop_domain(&d).unwrap(), "ABCDE");
    }
}
