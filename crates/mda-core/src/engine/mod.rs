//! # Engine Module
//!
//! The stateful layer: everything that accumulates or reshapes the run-wide protein
//! registry once rows have been read.
//!
//! ## Architecture
//!
//! - **Registry** ([`merger`]) - `ProteinMerger`, the additive, sequence-preserving
//!   accumulation of per-lookup protein batches, plus the shared row budget
//! - **Assembly** ([`assembler`]) - `MdaAssembler`, which fuses consecutive domains
//!   matching the target architecture
//! - **Aggregation** ([`summary`]) - per-architecture `MdaSummary` records with chopped
//!   domain sequences and length statistics
//! - **Partitioning** ([`partition`]) - `ProjectPartitioner`, which buckets summaries
//!   into projects by size
//! - **Configuration** ([`config`]) - run parameters and their builder
//! - **Progress Monitoring** ([`progress`]) - the injected progress callback port
//! - **Error Handling** ([`error`]) - the aggregated `EngineError`
//!
//! The registry has a single writer: batches are merged one at a time.

pub mod assembler;
pub mod config;
pub mod error;
pub mod merger;
pub mod partition;
pub mod progress;
pub mod summary;
