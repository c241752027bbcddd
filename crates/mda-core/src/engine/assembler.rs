use super::error::EngineError;
use super::merger::ProteinMerger;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::segment::DEFAULT_MAX_GAP;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub proteins_scanned: usize,
    pub proteins_merged: usize,
    pub domains_fused: usize,
}

/// Collapses consecutive domains matching a target architecture into single domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdaAssembler {
    target: Vec<String>,
    max_gap: usize,
}

impl MdaAssembler {
    pub fn new(target: Vec<String>) -> Self {
        Self {
            target,
            max_gap: DEFAULT_MAX_GAP,
        }
    }

    pub fn with_max_gap(mut self, max_gap: usize) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Runs the target-architecture merge over every protein in the registry.
    ///
    /// The first protein that has already been merged aborts the pass.
    #[instrument(skip_all, name = "mda_assembly")]
    pub fn assemble(
        &self,
        registry: &mut ProteinMerger,
        reporter: &ProgressReporter,
    ) -> Result<AssemblyStats, EngineError> {
        let mut stats = AssemblyStats::default();
        if self.target.is_empty() {
            debug!("No target architecture, skipping domain merge.");
            return Ok(stats);
        }

        info!("Merging MDA domains for {} ...", self.target.join("-"));
        reporter.report(Progress::PhaseStart {
            name: "Merging MDA domains",
        });

        for protein in registry.proteins_mut() {
            stats.proteins_scanned += 1;
            let groups =
                protein.merge_into_target_architecture_with_gap(&self.target, self.max_gap)?;
            if groups > 0 {
                stats.proteins_merged += 1;
                stats.domains_fused += groups;
            }
        }

        reporter.report(Progress::PhaseFinish);
        info!(
            "Merged {} MDA domain groups across {} of {} proteins.",
            stats.domains_fused, stats.proteins_merged, stats.proteins_scanned
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::domain::Domain;
    use crate::core::models::protein::Protein;
    use crate::core::models::segment::Segment;
    use std::collections::BTreeMap;

    fn domain(pid: &str, sfam: &str, start: usize, stop: usize) -> Domain {
        Domain::new(
            format!("{}/{}-{}", pid, start, stop),
            vec![sfam.to_string()],
            vec![Segment::new(start, stop)],
        )
    }

    fn registry() -> ProteinMerger {
        let mut p1 = Protein::new("P1", None);
        p1.add_domain(domain("P1", "A", 1, 50));
        p1.add_domain(domain("P1", "B", 55, 100));
        let mut p2 = Protein::new("P2", None);
        p2.add_domain(domain("P2", "B", 1, 50));
        p2.add_domain(domain("P2", "A", 60, 100));

        let mut merger = ProteinMerger::new();
        merger.merge(BTreeMap::from([
            ("P1".to_string(), p1),
            ("P2".to_string(), p2),
        ]));
        merger
    }

    #[test]
    fn assemble_merges_only_matching_proteins() {
        let mut merger = registry();
        let assembler = MdaAssembler::new(vec!["A".to_string(), "B".to_string()]);
        let stats = assembler
            .assemble(&mut merger, &ProgressReporter::new())
            .unwrap();

        assert_eq!(
            stats,
            AssemblyStats {
                proteins_scanned: 2,
                proteins_merged: 1,
                domains_fused: 1,
            }
        );
        let fused = merger.get("P1").unwrap().domain("P1/1-100").unwrap();
        assert_eq!(fused.architecture_key().as_deref(), Some("A-B"));
        assert_eq!(merger.get("P2").unwrap().domain_count(), 2);
    }

    #[test]
    fn assemble_honours_custom_gap() {
        let mut merger = registry();
        let assembler = MdaAssembler::new(vec!["A".to_string(), "B".to_string()]).with_max_gap(1);
        assembler
            .assemble(&mut merger, &ProgressReporter::new())
            .unwrap();
        assert!(merger.get("P1").unwrap().has_domain("P1/1-50_55-100"));
    }

    #[test]
    fn assemble_twice_is_rejected() {
        let mut merger = registry();
        let assembler = MdaAssembler::new(vec!["A".to_string(), "B".to_string()]);
        assembler
            .assemble(&mut merger, &ProgressReporter::new())
            .unwrap();
        let result = assembler.assemble(&mut merger, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::AlreadyMerged(_))));
    }

    #[test]
    fn empty_target_leaves_registry_untouched() {
        let mut merger = registry();
        let before = merger.clone();
        let stats = MdaAssembler::new(vec![])
            .assemble(&mut merger, &ProgressReporter::new())
            .unwrap();
        assert_eq!(stats, AssemblyStats::default());
        assert_eq!(merger, before);
    }
}
