use cathmda::core::io::writers::WriteMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "CATH MDA CLI - assemble domain predictions into multi-domain architectures and partition them into clustering projects.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect domains for a selection, merge them into MDAs and write the results.
    Generate(GenerateArgs),
    /// Collect domains for a selection and print the per-MDA summary without writing files.
    Summary(SummaryArgs),
}

/// Input table, selection and run parameters shared by every command.
#[derive(Args, Debug)]
pub struct SelectionArgs {
    /// Tab-separated domain prediction table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Selection ---
    /// Superfamily id of the target MDA. Repeat in order for multi-domain targets.
    #[arg(short = 's', long = "sfam", value_name = "SFAM_ID")]
    pub superfamily_ids: Vec<String>,

    /// File of UniProtKB accessions to process (one per line).
    #[arg(short = 'u', long = "uniprotids", value_name = "PATH")]
    pub accessions_file: Option<PathBuf>,

    /// Restrict the initial lookup to a taxon id.
    #[arg(short = 't', long = "taxon", value_name = "TAXON_ID")]
    pub taxon_id: Option<String>,

    // --- Collection Overrides ---
    /// Only keep domain hits with an independent e-value below this cutoff [default: 0.001].
    #[arg(short = 'e', long = "evalue", value_name = "FLOAT")]
    pub max_evalue: Option<f64>,

    /// Stop after processing this many domain rows.
    #[arg(long = "maxrows", value_name = "INT")]
    pub max_rows: Option<usize>,

    /// Number of accessions per lookup batch.
    #[arg(long, value_name = "INT")]
    pub batch_size: Option<usize>,

    /// Maximum gap between segments that are squashed together when merging domains.
    #[arg(long, value_name = "INT")]
    pub max_gap: Option<usize>,

    // --- Partition Overrides ---
    /// Put all sequences in a single project rather than partitioning by MDA.
    #[arg(long = "nopartition")]
    pub no_partition: bool,

    /// Minimum number of domains for an MDA to get its own project.
    #[arg(long = "minpartition", value_name = "INT")]
    pub min_partition_size: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S collection.batch-size=200
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub destination: Destination,

    /// How to treat existing output files: none, overwrite or append.
    #[arg(short = 'w', long, value_name = "MODE")]
    pub write_mode: Option<WriteMode>,
}

/// Exactly one of a flat domain table or a project directory.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct Destination {
    /// Write a single tab-separated domain table to this file.
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Write project files (manifest, MDA lookup, sequences) under this directory.
    #[arg(short, long, value_name = "DIR")]
    pub basedir: Option<PathBuf>,
}

/// Arguments for the `summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}
