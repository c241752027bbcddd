use super::config::ConfigError;
use super::summary::{LengthStats, MdaSummary};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A bucket of architectures handed downstream as one clustering job.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub index: usize, // 1-based
    pub member_architectures: Vec<String>,
    pub protein_count: usize,
    pub domain_count: usize,
    pub length_stats: Option<LengthStats>,
}

impl Project {
    fn from_summaries(id: String, index: usize, summaries: &[&MdaSummary]) -> Self {
        Self {
            id,
            index,
            member_architectures: summaries
                .iter()
                .map(|s| s.architecture_key.clone())
                .collect(),
            protein_count: summaries.iter().map(|s| s.protein_count).sum(),
            domain_count: summaries.iter().map(|s| s.domain_count()).sum(),
            length_stats: LengthStats::from_lengths(
                summaries.iter().flat_map(|s| s.domain_lengths()),
            ),
        }
    }

    /// The fixed-width row written to the project lookup table.
    pub fn summary_line(&self) -> String {
        let stats = match &self.length_stats {
            Some(stats) => stats.to_string(),
            None => "-/-/-".to_string(),
        };
        format!(
            "{:<30} {:<7} {:<7} {:<3} {} {}",
            self.id,
            self.protein_count,
            self.domain_count,
            self.member_architectures.len(),
            stats,
            self.member_architectures.join(",")
        )
    }

    pub fn summary_header() -> String {
        format!(
            "{:<30} {:<7} {:<7} {:<3} {} {}",
            "id", "protein_count", "domain_count", "mda_count", "min/max/mean", "mda_entries"
        )
    }
}

/// Splits summaries into projects by matched-domain count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectPartitioner {
    min_partition_size: Option<usize>,
}

impl ProjectPartitioner {
    pub fn new(min_partition_size: Option<usize>) -> Self {
        Self { min_partition_size }
    }

    /// Orders summaries by matched-domain count, largest first.
    ///
    /// Each summary at or above the threshold becomes its own project; the rest are pooled
    /// into one trailing overflow project. Project ids are `<prefix>-mda-<index>`, or just
    /// `<prefix>` when `partitioned` is false.
    pub fn partition(
        &self,
        summaries: &BTreeMap<String, MdaSummary>,
        prefix: &str,
        partitioned: bool,
    ) -> Result<Vec<Project>, ConfigError> {
        let min_size = match (self.min_partition_size, partitioned) {
            (Some(size), _) => size,
            (None, false) => 0,
            (None, true) => return Err(ConfigError::MissingParameter("min_partition_size")),
        };

        let mut ordered: Vec<&MdaSummary> = summaries.values().collect();
        ordered.sort_by(|a, b| b.domain_count().cmp(&a.domain_count()));

        let (large, small): (Vec<&MdaSummary>, Vec<&MdaSummary>) = ordered
            .into_iter()
            .partition(|s| s.domain_count() >= min_size);

        let project_id = |index: usize| {
            if partitioned {
                format!("{}-mda-{}", prefix, index)
            } else {
                prefix.to_string()
            }
        };

        let mut projects = Vec::with_capacity(large.len() + 1);
        for summary in large {
            let index = projects.len() + 1;
            projects.push(Project::from_summaries(project_id(index), index, &[summary]));
        }
        if !small.is_empty() {
            let index = projects.len() + 1;
            debug!(
                "Pooling {} architectures below {} domains into project {}",
                small.len(),
                min_size,
                index
            );
            projects.push(Project::from_summaries(project_id(index), index, &small));
        }

        info!(
            "Partitioned {} architectures into {} projects",
            summaries.len(),
            projects.len()
        );
        Ok(projects)
    }
}
