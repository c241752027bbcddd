use crate::core::io::writers::{RecordWriter, WriteMode, check_targets, fasta_record, tsv_record};
use crate::core::models::domain::Domain;
use crate::engine::config::{GenerateConfig, OutputConfig};
use crate::engine::error::EngineError;
use crate::engine::merger::ProteinMerger;
use crate::engine::partition::{Project, ProjectPartitioner};
use crate::engine::summary::{ALL_DOMAINS_KEY, MdaSummary, build_summaries};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Summaries and the projects derived from them, computed before any file is touched.
#[derive(Debug, Clone)]
pub struct ProjectPlan {
    pub prefix: String,
    pub summaries: BTreeMap<String, MdaSummary>,
    pub projects: Vec<Project>,
}

impl ProjectPlan {
    pub fn build(registry: &ProteinMerger, config: &GenerateConfig) -> Result<Self, EngineError> {
        let reference = config.reference_architecture();
        let partitioned = config.partition.by_architecture;
        if partitioned {
            info!("Creating PARTITIONED summary");
        } else {
            info!("Creating UNPARTITIONED summary");
        }

        let summaries = build_summaries(registry.proteins(), reference.as_deref(), partitioned)?;
        let prefix = reference.unwrap_or_else(|| ALL_DOMAINS_KEY.to_string());
        let projects = ProjectPartitioner::new(config.partition.min_partition_size).partition(
            &summaries,
            &prefix,
            partitioned,
        )?;
        Ok(Self {
            prefix,
            summaries,
            projects,
        })
    }

    /// Reference domains of every architecture in `project`, in member order.
    pub fn project_domains<'a>(&'a self, project: &'a Project) -> impl Iterator<Item = &'a Domain> {
        project
            .member_architectures
            .iter()
            .filter_map(|key| self.summaries.get(key))
            .flat_map(|summary| summary.matched_domains.iter())
    }
}

#[derive(Debug, Clone)]
pub struct ProjectFiles {
    pub projects_file: PathBuf,
    pub mda_file: PathBuf,
    pub domain_table_file: PathBuf,
    pub sequence_files: Vec<PathBuf>,
    pub plan: ProjectPlan,
}

/// Writes one `protein_id, domain_id, architecture, domain sequence` row per reference
/// domain (every domain when there is no reference). Returns the number of rows.
pub fn write_domain_table(
    registry: &ProteinMerger,
    reference: Option<&str>,
    path: &Path,
    mode: WriteMode,
) -> Result<usize, EngineError> {
    let mut writer = RecordWriter::create(path, mode)?;
    let mut rows = 0;
    for protein in registry.proteins() {
        let mda = protein.to_architecture_string();
        for domain in protein.sorted_domains() {
            if reference.is_some() && domain.architecture_key().as_deref() != reference {
                continue;
            }
            let sequence = protein.chop_domain(domain)?;
            writer.write_record(&tsv_record(&[
                protein.protein_id.as_str(),
                domain.domain_id.as_str(),
                mda.as_str(),
                sequence.as_str(),
            ]))?;
            rows += 1;
        }
    }
    writer.finish()?;
    info!("Wrote {} domain rows to {:?}", rows, path);
    Ok(rows)
}

/// Writes the manifest, lookup table, domain table and per-project FASTA files under
/// `base_dir`.
///
/// Summaries, partitioning and every target path are checked before anything is created.
#[instrument(skip_all, name = "project_output")]
pub fn write_project_files(
    registry: &ProteinMerger,
    config: &GenerateConfig,
    output: &OutputConfig,
    base_dir: &Path,
) -> Result<ProjectFiles, EngineError> {
    let plan = ProjectPlan::build(registry, config)?;

    let projects_file = base_dir.join(&output.projects_filename);
    let mda_file = base_dir.join(&output.mda_filename);
    let domain_table_file = base_dir.join(format!("{}-all.seq", plan.prefix));
    let seqs_dir = base_dir.join(&output.sequences_dirname);
    let sequence_files: Vec<PathBuf> = plan
        .projects
        .iter()
        .map(|p| seqs_dir.join(format!("{}.fasta", p.id)))
        .collect();

    let mode = output.write_mode;
    check_targets(
        [&projects_file, &mda_file, &domain_table_file]
            .into_iter()
            .chain(sequence_files.iter())
            .map(PathBuf::as_path),
        mode,
    )?;

    for dir in [base_dir, seqs_dir.as_path()] {
        if !dir.exists() {
            info!("Creating directory: {:?}", dir);
            fs::create_dir_all(dir).map_err(|source| EngineError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
    }

    let action = match mode {
        WriteMode::None => "Writing",
        WriteMode::Overwrite => "Overwriting",
        WriteMode::Append => "Appending",
    };
    info!("{} project files ...", action);

    info!("   {:?}", projects_file);
    let mut writer = RecordWriter::create(&projects_file, mode)?;
    for project in &plan.projects {
        writer.write_record(&format!("{}\n", project.id))?;
    }
    writer.finish()?;

    info!("   {:?}", mda_file);
    let mut writer = RecordWriter::create(&mda_file, mode)?;
    writer.write_record(&format!("{}\n", Project::summary_header()))?;
    for project in &plan.projects {
        writer.write_record(&format!("{}\n", project.summary_line()))?;
    }
    writer.finish()?;

    info!("   {:?}", domain_table_file);
    let reference = config.reference_architecture();
    write_domain_table(registry, reference.as_deref(), &domain_table_file, mode)?;

    for (project, fasta_file) in plan.projects.iter().zip(&sequence_files) {
        info!("   {:?}", fasta_file);
        let mut writer = RecordWriter::create(fasta_file, mode)?;
        for domain in plan.project_domains(project) {
            let sequence = domain.sequence.as_deref().unwrap_or_default();
            writer.write_record(&fasta_record(&domain.domain_id, sequence))?;
        }
        writer.finish()?;
    }

    Ok(ProjectFiles {
        projects_file,
        mda_file,
        domain_table_file,
        sequence_files,
        plan,
    })
}
