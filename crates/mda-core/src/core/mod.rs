//! # Core Module
//!
//! Stateless building blocks: the protein/domain data model and the I/O surface
//! through which domain predictions enter and finished records leave.
//!
//! - **Data model** ([`models`]) - `Segment`, `Domain` and `Protein`
//! - **I/O** ([`io`]) - the row-source port, a tabular row source, accession lists
//!   and the record writers used for domain tables, FASTA files and project manifests

pub mod io;
pub mod models;
