//! # CATH MDA Core Library
//!
//! Assembles per-domain superfamily predictions into whole-protein multi-domain
//! architectures (MDAs), fuses fragmented domains that match a target architecture,
//! and partitions the resulting proteins into projects for downstream clustering.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer structure:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Segment`, `Domain`, `Protein`)
//!   and the I/O surface: the row-source port, a tabular row source, accession lists and
//!   record writers.
//!
//! - **[`engine`]: The Logic Core.** The protein registry and its additive merge, target
//!   architecture assembly, per-architecture summaries and size-based project partitioning.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built from the two layers
//!   below: collecting proteins from a row source and writing project files.

pub mod core;
pub mod engine;
pub mod workflows;
