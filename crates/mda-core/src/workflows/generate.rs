use crate::core::io::traits::RowSource;
use crate::engine::assembler::{AssemblyStats, MdaAssembler};
use crate::engine::config::{ConfigError, GenerateConfig};
use crate::engine::error::EngineError;
use crate::engine::merger::{ProteinMerger, RowBudget, collect_batch};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub registry: ProteinMerger,
    pub rows_processed: usize,
    pub truncated: bool, // `max_rows` was reached before every lookup ran
    pub assembly: AssemblyStats,
}

#[instrument(skip_all, name = "generate_workflow")]
pub fn run<S: RowSource>(
    source: &mut S,
    config: &GenerateConfig,
    reporter: &ProgressReporter,
) -> Result<GenerateResult, EngineError> {
    let mut registry = ProteinMerger::new();
    let mut budget = RowBudget::new(config.max_rows);

    // === Phase 1: Seed accessions ===
    reporter.report(Progress::PhaseStart {
        name: "Collecting proteins",
    });
    let mut accessions = match &config.accessions {
        Some(accessions) => {
            info!("Using {} accessions from the supplied list", accessions.len());
            accessions.clone()
        }
        None => {
            let filter = config.row_filter();
            if filter.is_empty() {
                return Err(ConfigError::MissingSelection.into());
            }
            match config.reference_architecture() {
                Some(mda) => info!("Getting all domains within MDA: {}", mda),
                None => info!(
                    "Getting all domains within taxon {}",
                    filter.taxon_id.as_deref().unwrap_or_default()
                ),
            }
            let rows = source
                .rows_for_filter(&filter)
                .map_err(EngineError::source_error)?;
            let batch = collect_batch(rows, &mut budget, reporter)?;
            registry.merge(batch);
            registry.accessions()
        }
    };
    accessions.sort();
    accessions.dedup();
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Attach domains from every superfamily ===
    let total_batches = accessions.len().div_ceil(config.batch_size);
    reporter.report(Progress::BatchesStart {
        total_batches: total_batches as u64,
    });
    for (index, chunk) in accessions.chunks(config.batch_size).enumerate() {
        if budget.is_exhausted() {
            info!("Row limit reached, skipping remaining accession batches.");
            reporter.report(Progress::Message(format!(
                "Row limit reached; {} of {} accession batches skipped",
                total_batches - index,
                total_batches
            )));
            break;
        }
        let offset = index * config.batch_size;
        info!(
            "Annotating accessions {} to {} (batch {}/{})",
            offset,
            offset + chunk.len(),
            index + 1,
            total_batches
        );
        let rows = source
            .rows_for_accessions(chunk, config.max_evalue)
            .map_err(EngineError::source_error)?;
        let batch = collect_batch(rows, &mut budget, reporter)?;
        registry.merge(batch);
        reporter.report(Progress::BatchFinished);
    }
    reporter.report(Progress::BatchesFinish);

    // === Phase 3: Fuse target-architecture domains ===
    let assembly = MdaAssembler::new(config.superfamily_ids.clone())
        .with_max_gap(config.max_gap)
        .assemble(&mut registry, reporter)?;

    info!(
        "Collected {} proteins with {} domains from {} rows.",
        registry.len(),
        registry.count_domains(),
        budget.used()
    );
    Ok(GenerateResult {
        registry,
        rows_processed: budget.used(),
        truncated: budget.is_exhausted(),
        assembly,
    })
}
