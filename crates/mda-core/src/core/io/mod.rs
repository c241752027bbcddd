//! Input/output surface of the library.
//!
//! Domain predictions arrive through the [`traits::RowSource`] port; [`table`]
//! provides a tab-separated implementation. [`accessions`] reads accession lists and
//! [`writers`] writes whole records to output files under a chosen [`writers::WriteMode`].

pub mod accessions;
pub mod table;
pub mod traits;
pub mod writers;
