//! # Workflows Module
//!
//! Top-level entry points that tie the `core` and `engine` layers into complete runs.
//!
//! - **Generate Workflow** ([`generate`]) - seeds accessions from a selection, re-queries
//!   them in batches to collect every domain, and fuses target-architecture domains.
//! - **Output Workflow** ([`output`]) - summarises and partitions the registry, then writes
//!   the project manifest, lookup table, domain table and per-project FASTA files.

pub mod generate;
pub mod output;
