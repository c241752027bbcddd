use crate::core::io::traits::RowFilter;
use crate::core::io::writers::WriteMode;
use crate::core::models::segment::DEFAULT_MAX_GAP;
use thiserror::Error;

pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_MAX_EVALUE: f64 = 0.001;
pub const DEFAULT_PROJECTS_FILENAME: &str = "projects.txt";
pub const DEFAULT_MDA_FILENAME: &str = "mda_lookup.txt";
pub const DEFAULT_SEQUENCES_DIRNAME: &str = "sequences";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Must specify at least one of: superfamily ids, taxon id or an accession list")]
    MissingSelection,

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionConfig {
    pub by_architecture: bool,
    pub min_partition_size: Option<usize>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            by_architecture: true,
            min_partition_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    pub superfamily_ids: Vec<String>, // Target architecture, in order
    pub taxon_id: Option<String>,
    pub accessions: Option<Vec<String>>,
    pub max_evalue: Option<f64>, // Rows must score strictly below this
    pub batch_size: usize,
    pub max_rows: Option<usize>,
    pub max_gap: usize,
    pub partition: PartitionConfig,
}

impl GenerateConfig {
    /// The `-`-joined target architecture, if superfamily ids were given.
    pub fn reference_architecture(&self) -> Option<String> {
        if self.superfamily_ids.is_empty() {
            None
        } else {
            Some(self.superfamily_ids.join("-"))
        }
    }

    pub fn row_filter(&self) -> RowFilter {
        RowFilter {
            superfamily_ids: self.superfamily_ids.clone(),
            taxon_id: self.taxon_id.clone(),
            max_evalue: self.max_evalue,
        }
    }
}

#[derive(Default)]
pub struct GenerateConfigBuilder {
    superfamily_ids: Vec<String>,
    taxon_id: Option<String>,
    accessions: Option<Vec<String>>,
    max_evalue: Option<Option<f64>>,
    batch_size: Option<usize>,
    max_rows: Option<usize>,
    max_gap: Option<usize>,
    partition_by_architecture: Option<bool>,
    min_partition_size: Option<usize>,
}

impl GenerateConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn superfamily_ids(mut self, ids: Vec<String>) -> Self {
        self.superfamily_ids = ids;
        self
    }
    pub fn add_superfamily_id(mut self, id: impl Into<String>) -> Self {
        self.superfamily_ids.push(id.into());
        self
    }
    pub fn taxon_id(mut self, taxon_id: Option<String>) -> Self {
        self.taxon_id = taxon_id;
        self
    }
    pub fn accessions(mut self, accessions: Option<Vec<String>>) -> Self {
        self.accessions = accessions;
        self
    }
    /// Sets the e-value cutoff; `None` disables the filter.
    pub fn max_evalue(mut self, max_evalue: Option<f64>) -> Self {
        self.max_evalue = Some(max_evalue);
        self
    }
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }
    pub fn max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }
    pub fn max_gap(mut self, gap: usize) -> Self {
        self.max_gap = Some(gap);
        self
    }
    pub fn partition_by_architecture(mut self, enabled: bool) -> Self {
        self.partition_by_architecture = Some(enabled);
        self
    }
    pub fn min_partition_size(mut self, size: Option<usize>) -> Self {
        self.min_partition_size = size;
        self
    }

    pub fn build(self) -> Result<GenerateConfig, ConfigError> {
        if self.superfamily_ids.is_empty() && self.taxon_id.is_none() && self.accessions.is_none()
        {
            return Err(ConfigError::MissingSelection);
        }

        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "batch_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_rows == Some(0) {
            return Err(ConfigError::InvalidValue {
                name: "max_rows",
                reason: "must be greater than zero when set".to_string(),
            });
        }

        let max_evalue = self.max_evalue.unwrap_or(Some(DEFAULT_MAX_EVALUE));
        if let Some(evalue) = max_evalue.filter(|e| !(e.is_finite() && *e > 0.0)) {
            return Err(ConfigError::InvalidValue {
                name: "max_evalue",
                reason: format!("must be a positive number, got {}", evalue),
            });
        }

        let by_architecture = self.partition_by_architecture.unwrap_or(true);
        if by_architecture && self.min_partition_size.is_none() {
            return Err(ConfigError::MissingParameter("min_partition_size"));
        }

        Ok(GenerateConfig {
            superfamily_ids: self.superfamily_ids,
            taxon_id: self.taxon_id,
            accessions: self.accessions,
            max_evalue,
            batch_size,
            max_rows: self.max_rows,
            max_gap: self.max_gap.unwrap_or(DEFAULT_MAX_GAP),
            partition: PartitionConfig {
                by_architecture,
                min_partition_size: self.min_partition_size,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub write_mode: WriteMode,
    pub projects_filename: String,
    pub mda_filename: String,
    pub sequences_dirname: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_mode: WriteMode::None,
            projects_filename: DEFAULT_PROJECTS_FILENAME.to_string(),
            mda_filename: DEFAULT_MDA_FILENAME.to_string(),
            sequences_dirname: DEFAULT_SEQUENCES_DIRNAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_some_selection() {
        assert_eq!(
            GenerateConfigBuilder::new().build(),
            Err(ConfigError::MissingSelection)
        );
    }

    #[test]
    fn build_applies_defaults() {
        let config = GenerateConfigBuilder::new()
            .add_superfamily_id("1.10.8.10")
            .add_superfamily_id("3.40.50.300")
            .min_partition_size(Some(1000))
            .build()
            .unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.max_gap, DEFAULT_MAX_GAP);
        assert_eq!(config.max_rows, None);
        assert_eq!(config.max_evalue, Some(DEFAULT_MAX_EVALUE));
        assert_eq!(config.row_filter().max_evalue, Some(DEFAULT_MAX_EVALUE));
        assert!(config.partition.by_architecture);
        assert_eq!(config.partition.min_partition_size, Some(1000));
        assert_eq!(
            config.reference_architecture().as_deref(),
            Some("1.10.8.10-3.40.50.300")
        );
    }

    #[test]
    fn taxon_or_accessions_alone_are_valid_selections() {
        let by_taxon = GenerateConfigBuilder::new()
            .taxon_id(Some("9606".to_string()))
            .min_partition_size(Some(10))
            .build()
            .unwrap();
        assert_eq!(by_taxon.reference_architecture(), None);
        assert_eq!(by_taxon.row_filter().taxon_id.as_deref(), Some("9606"));

        let by_accessions = GenerateConfigBuilder::new()
            .accessions(Some(vec!["P12345".to_string()]))
            .partition_by_architecture(false)
            .build();
        assert!(by_accessions.is_ok());
    }

    #[test]
    fn build_rejects_zero_batch_size_and_zero_row_cap() {
        let result = GenerateConfigBuilder::new()
            .add_superfamily_id("1.10.8.10")
            .batch_size(0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "batch_size",
                ..
            })
        ));

        let result = GenerateConfigBuilder::new()
            .add_superfamily_id("1.10.8.10")
            .max_rows(Some(0))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "max_rows",
                ..
            })
        ));
    }

    #[test]
    fn partitioned_run_requires_threshold_up_front() {
        let result = GenerateConfigBuilder::new().add_superfamily_id("A").build();
        assert_eq!(
            result,
            Err(ConfigError::MissingParameter("min_partition_size"))
        );

        let unpartitioned = GenerateConfigBuilder::new()
            .add_superfamily_id("A")
            .partition_by_architecture(false)
            .build()
            .unwrap();
        assert_eq!(unpartitioned.partition.min_partition_size, None);
    }

    #[test]
    fn evalue_cutoff_can_be_disabled_but_not_invalid() {
        let config = GenerateConfigBuilder::new()
            .add_superfamily_id("A")
            .min_partition_size(Some(1))
            .max_evalue(None)
            .build()
            .unwrap();
        assert_eq!(config.max_evalue, None);

        for bad in [0.0, -1.0, f64::NAN] {
            let result = GenerateConfigBuilder::new()
                .add_superfamily_id("A")
                .min_partition_size(Some(1))
                .max_evalue(Some(bad))
                .build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidValue {
                    name: "max_evalue",
                    ..
                })
            ));
        }
    }
}
