use crate::core::models::domain::Domain;
use crate::core::models::segment::{ParseError, Segment};
use std::error::Error;

/// One domain prediction as yielded by a row source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRow {
    pub accession: String,
    pub sequence_hash: String,
    pub superfamily_id: Option<String>,
    pub sequence: Option<String>,
    pub resolved_segments: String, // Segments separated by ',' (or '_')
}

impl DomainRow {
    pub fn normalized_segments(&self) -> String {
        self.resolved_segments.replace(',', "_")
    }

    /// `"<accession>/<segments>"`, with segments joined by `_`.
    pub fn domain_id(&self) -> String {
        format!("{}/{}", self.accession, self.normalized_segments())
    }

    pub fn to_domain(&self) -> Result<Domain, ParseError> {
        let segments = Segment::parse_list(&self.resolved_segments)?;
        let superfamily_ids = self.superfamily_id.iter().cloned().collect();
        Ok(Domain::new(self.domain_id(), superfamily_ids, segments))
    }
}

/// Selection pushed down to the row source for the initial lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    pub superfamily_ids: Vec<String>,
    pub taxon_id: Option<String>,
    pub max_evalue: Option<f64>,
}

impl RowFilter {
    /// True when neither superfamilies nor a taxon narrow the lookup. The e-value
    /// cutoff alone is not a selection.
    pub fn is_empty(&self) -> bool {
        self.superfamily_ids.is_empty() && self.taxon_id.is_none()
    }
}

/// Whether a row scoring `evalue` survives the `max_evalue` cutoff.
///
/// Rows without a score are kept; scored rows must fall strictly below the cutoff.
pub fn within_evalue(evalue: Option<f64>, max_evalue: Option<f64>) -> bool {
    match (evalue, max_evalue) {
        (Some(evalue), Some(max)) => evalue < max,
        _ => true,
    }
}

pub type RowIter<'a, E> = Box<dyn Iterator<Item = Result<DomainRow, E>> + 'a>;

/// Defines the interface to whatever store holds the per-domain predictions.
///
/// Implementors receive already-decided selections and return matching rows; the
/// assembly engine never builds queries itself.
pub trait RowSource {
    /// The error type for lookups.
    type Error: Error + Send + Sync + 'static;

    /// Returns every row matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be queried.
    fn rows_for_filter<'a>(
        &'a mut self,
        filter: &'a RowFilter,
    ) -> Result<RowIter<'a, Self::Error>, Self::Error>;

    /// Returns every classified row for the given accessions, regardless of superfamily,
    /// that passes the `max_evalue` cutoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be queried.
    fn rows_for_accessions<'a>(
        &'a mut self,
        accessions: &'a [String],
        max_evalue: Option<f64>,
    ) -> Result<RowIter<'a, Self::Error>, Self::Error>;
}
