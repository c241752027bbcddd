use crate::cli::SelectionArgs;
use crate::error::{CliError, Result};
use cathmda::core::io::accessions::read_accessions_from_path;
use cathmda::core::io::writers::WriteMode;
use cathmda::core::models::segment::DEFAULT_MAX_GAP;
use cathmda::engine::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_EVALUE, DEFAULT_MDA_FILENAME, DEFAULT_PROJECTS_FILENAME,
    DEFAULT_SEQUENCES_DIRNAME, GenerateConfig, GenerateConfigBuilder, OutputConfig,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Values used when neither the command line nor the config file sets a parameter.
#[derive(Debug, Clone)]
pub struct DefaultsConfig {
    pub batch_size: usize,
    pub max_gap: usize,
    pub max_evalue: f64,
    pub min_partition_size: usize,
    pub write_mode: WriteMode,
    pub projects_filename: String,
    pub mda_filename: String,
    pub sequences_dirname: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_gap: DEFAULT_MAX_GAP,
            max_evalue: DEFAULT_MAX_EVALUE,
            min_partition_size: 1000,
            write_mode: WriteMode::None,
            projects_filename: DEFAULT_PROJECTS_FILENAME.to_string(),
            mda_filename: DEFAULT_MDA_FILENAME.to_string(),
            sequences_dirname: DEFAULT_SEQUENCES_DIRNAME.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSelectionConfig {
    superfamily_ids: Option<Vec<String>>,
    taxon_id: Option<String>,
    accessions_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialCollectionConfig {
    batch_size: Option<usize>,
    max_rows: Option<usize>,
    max_gap: Option<usize>,
    max_evalue: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialPartitionConfig {
    by_architecture: Option<bool>,
    min_size: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialOutputConfig {
    write_mode: Option<WriteMode>,
    projects_file: Option<String>,
    mda_file: Option<String>,
    sequences_dir: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialRunConfig {
    selection: Option<PartialSelectionConfig>,
    collection: Option<PartialCollectionConfig>,
    partition: Option<PartialPartitionConfig>,
    output: Option<PartialOutputConfig>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub generate: GenerateConfig,
    pub output: OutputConfig,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts empty.
    pub fn load(args: &SelectionArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves every parameter: command line, then `-S` overrides, then the file, then
    /// [`DefaultsConfig`].
    pub fn merge_with_cli(
        mut self,
        args: &SelectionArgs,
        write_mode: Option<WriteMode>,
    ) -> Result<RunConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let selection = self.selection.take().unwrap_or_default();
        let collection = self.collection.take().unwrap_or_default();
        let partition = self.partition.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let superfamily_ids = if args.superfamily_ids.is_empty() {
            selection.superfamily_ids.unwrap_or_default()
        } else {
            args.superfamily_ids.clone()
        };
        let taxon_id = args.taxon_id.clone().or(selection.taxon_id);

        let accessions = match args.accessions_file.as_ref().or(selection.accessions_file.as_ref())
        {
            Some(path) => {
                debug!("Reading accessions from {:?}", path);
                let accessions =
                    read_accessions_from_path(path).map_err(|e| CliError::FileParsing {
                        path: path.clone(),
                        source: e.into(),
                    })?;
                Some(accessions)
            }
            None => None,
        };

        let by_architecture = if args.no_partition {
            false
        } else {
            partition.by_architecture.unwrap_or(true)
        };

        let generate = GenerateConfigBuilder::new()
            .superfamily_ids(superfamily_ids)
            .taxon_id(taxon_id)
            .accessions(accessions)
            .batch_size(
                args.batch_size
                    .or(collection.batch_size)
                    .unwrap_or(defaults.batch_size),
            )
            .max_rows(args.max_rows.or(collection.max_rows))
            .max_gap(
                args.max_gap
                    .or(collection.max_gap)
                    .unwrap_or(defaults.max_gap),
            )
            .max_evalue(Some(
                args.max_evalue
                    .or(collection.max_evalue)
                    .unwrap_or(defaults.max_evalue),
            ))
            .partition_by_architecture(by_architecture)
            .min_partition_size(Some(
                args.min_partition_size
                    .or(partition.min_size)
                    .unwrap_or(defaults.min_partition_size),
            ))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let output = OutputConfig {
            write_mode: write_mode
                .or(output.write_mode)
                .unwrap_or(defaults.write_mode),
            projects_filename: output
                .projects_file
                .unwrap_or(defaults.projects_filename),
            mda_filename: output.mda_file.unwrap_or(defaults.mda_filename),
            sequences_dirname: output
                .sequences_dir
                .unwrap_or(defaults.sequences_dirname),
        };

        Ok(RunConfig { generate, output })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "selection.taxon-id" => {
                    self.selection
                        .get_or_insert_with(Default::default)
                        .taxon_id = Some(value_str.to_string());
                }
                "selection.superfamily-ids" => {
                    self.selection
                        .get_or_insert_with(Default::default)
                        .superfamily_ids = Some(
                        value_str
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect(),
                    );
                }
                "collection.batch-size" => {
                    self.collection
                        .get_or_insert_with(Default::default)
                        .batch_size = Some(parse_value(key, value_str)?);
                }
                "collection.max-rows" => {
                    self.collection
                        .get_or_insert_with(Default::default)
                        .max_rows = Some(parse_value(key, value_str)?);
                }
                "collection.max-gap" => {
                    self.collection
                        .get_or_insert_with(Default::default)
                        .max_gap = Some(parse_value(key, value_str)?);
                }
                "collection.max-evalue" => {
                    self.collection
                        .get_or_insert_with(Default::default)
                        .max_evalue = Some(parse_value(key, value_str)?);
                }
                "partition.by-architecture" => {
                    self.partition
                        .get_or_insert_with(Default::default)
                        .by_architecture = Some(parse_value(key, value_str)?);
                }
                "partition.min-size" => {
                    self.partition
                        .get_or_insert_with(Default::default)
                        .min_size = Some(parse_value(key, value_str)?);
                }
                "output.write-mode" => {
                    self.output
                        .get_or_insert_with(Default::default)
                        .write_mode = Some(value_str.parse().map_err(CliError::Config)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid value for {}: '{}'",
            key, value_str
        ))
    })
}
