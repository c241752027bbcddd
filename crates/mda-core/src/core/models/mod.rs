//! # Core Models Module
//!
//! Data structures describing proteins and the domains predicted on them.
//!
//! - [`segment`] - Inclusive residue ranges, parsing and gap squashing
//! - [`domain`] - A region of a protein tagged with one or more superfamily ids
//! - [`protein`] - A sequence plus its uniquely keyed domains and architecture string
//!
//! ```ignore
//! use cathmda::core::models::{domain::Domain, protein::Protein};
//!
//! let mut protein = Protein::new("Q14119", Some(sequence));
//! protein.add_domain(Domain::from_string("Q14119/1-50", vec!["1.10.8.10".into()])?);
//! let mda = protein.to_architecture_string();
//! ```

pub mod domain;
pub mod protein;
pub mod segment;
