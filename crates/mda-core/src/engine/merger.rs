use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::io::traits::DomainRow;
use crate::core::models::protein::Protein;
use std::collections::BTreeMap;
use tracing::{debug, info};

const PROGRESS_INTERVAL: usize = 1000;

/// Proteins from a single lookup, keyed by accession.
pub type ProteinBatch = BTreeMap<String, Protein>;

/// Caps the number of rows consumed across every lookup of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowBudget {
    limit: Option<usize>,
    used: usize,
}

impl RowBudget {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit, used: 0 }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.used >= limit)
    }

    fn consume(&mut self) {
        self.used += 1;
    }
}

/// Groups rows into proteins. Within one batch a repeated domain id replaces the earlier one.
pub fn collect_batch<E>(
    rows: impl Iterator<Item = Result<DomainRow, E>>,
    budget: &mut RowBudget,
    reporter: &ProgressReporter,
) -> Result<ProteinBatch, EngineError>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut batch = ProteinBatch::new();
    for row in rows {
        if budget.is_exhausted() {
            break;
        }
        let row = row.map_err(EngineError::source_error)?;
        let domain = row.to_domain()?;

        let protein = batch
            .entry(row.accession.clone())
            .or_insert_with(|| Protein::new(row.accession.clone(), None));
        if protein.sequence.is_none() {
            protein.sequence = row.sequence;
        }
        protein.add_domain(domain);

        budget.consume();
        if budget.used() % PROGRESS_INTERVAL == 0 {
            info!("   ... processed {} domain records", budget.used());
            reporter.report(Progress::RecordsScanned {
                count: budget.used() as u64,
            });
        }
        if budget.is_exhausted() {
            info!(
                "   ... reached max_rows={} (quitting search early)",
                budget.used()
            );
            break;
        }
    }
    debug!(" ... got {} unique proteins", batch.len());
    Ok(batch)
}

/// The run-wide protein registry.
///
/// Batches are merged additively: a domain id already attached to a protein is never
/// replaced, so domains carrying materialised sequences survive later lookups.
/// Merging is a single-writer operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProteinMerger {
    proteins: BTreeMap<String, Protein>,
}

impl ProteinMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, batch: ProteinBatch) {
        for (protein_id, incoming) in batch {
            match self.proteins.get_mut(&protein_id) {
                None => {
                    self.proteins.insert(protein_id, incoming);
                }
                Some(canonical) => {
                    if canonical.sequence.is_none() && incoming.sequence.is_some() {
                        canonical.sequence = incoming.sequence.clone();
                    }
                    for domain in incoming.into_domains() {
                        if !canonical.has_domain(&domain.domain_id) {
                            canonical.add_domain(domain);
                        }
                    }
                }
            }
        }
    }

    pub fn get(&self, protein_id: &str) -> Option<&Protein> {
        self.proteins.get(protein_id)
    }

    pub fn proteins(&self) -> impl Iterator<Item = &Protein> {
        self.proteins.values()
    }

    pub fn proteins_mut(&mut self) -> impl Iterator<Item = &mut Protein> {
        self.proteins.values_mut()
    }

    /// Accessions in sorted order.
    pub fn accessions(&self) -> Vec<String> {
        self.proteins.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    pub fn count_domains(&self) -> usize {
        self.proteins.values().map(Protein::domain_count).sum()
    }
}
