use super::traits::{DomainRow, RowFilter, RowIter, RowSource, within_evalue};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("TSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// A row of the tab-separated prediction table.
///
/// Expected header: `accession sequence_md5 superfamily_id sequence resolved
/// [taxon_id] [independent_evalue]`. Empty cells are treated as null.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TableRecord {
    pub accession: String,
    pub sequence_md5: String,
    pub superfamily_id: Option<String>,
    pub sequence: Option<String>,
    pub resolved: String,
    #[serde(default)]
    pub taxon_id: Option<String>,
    #[serde(default)]
    pub independent_evalue: Option<f64>,
}

impl TableRecord {
    fn to_row(&self) -> DomainRow {
        DomainRow {
            accession: self.accession.clone(),
            sequence_hash: self.sequence_md5.clone(),
            superfamily_id: self.superfamily_id.clone(),
            sequence: self.sequence.clone(),
            resolved_segments: self.resolved.clone(),
        }
    }

    fn matches(&self, filter: &RowFilter) -> bool {
        let Some(sfam) = &self.superfamily_id else {
            return false;
        };
        let sfam_ok = filter.superfamily_ids.is_empty() || filter.superfamily_ids.contains(sfam);
        let taxon_ok = match &filter.taxon_id {
            Some(taxon) => self.taxon_id.as_ref() == Some(taxon),
            None => true,
        };
        sfam_ok && taxon_ok && within_evalue(self.independent_evalue, filter.max_evalue)
    }
}

/// An in-memory row source backed by a prediction table, filtering in place.
#[derive(Debug, Clone, Default)]
pub struct TableRowSource {
    records: Vec<TableRecord>,
}

impl TableRowSource {
    pub fn new(records: Vec<TableRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let to_error = |e: csv::Error| TableError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        };
        let reader = Self::tsv_reader()
            .from_path(path)
            .map_err(to_error)?;
        let records = Self::read_records(reader).map_err(to_error)?;
        debug!("Loaded {} prediction rows from {:?}", records.len(), path);
        Ok(Self { records })
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, TableError> {
        let records = Self::read_records(Self::tsv_reader().from_reader(reader)).map_err(|e| {
            TableError::Csv {
                path: "<reader>".to_string(),
                source: e,
            }
        })?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }

    fn tsv_reader() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.delimiter(b'\t').trim(csv::Trim::All);
        builder
    }

    fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<TableRecord>, csv::Error> {
        reader.deserialize::<TableRecord>().collect()
    }
}

impl RowSource for TableRowSource {
    type Error = TableError;

    fn rows_for_filter<'a>(
        &'a mut self,
        filter: &'a RowFilter,
    ) -> Result<RowIter<'a, Self::Error>, Self::Error> {
        Ok(Box::new(
            self.records
                .iter()
                .filter(move |r| r.matches(filter))
                .map(|r| Ok::<_, TableError>(r.to_row())),
        ))
    }

    fn rows_for_accessions<'a>(
        &'a mut self,
        accessions: &'a [String],
        max_evalue: Option<f64>,
    ) -> Result<RowIter<'a, Self::Error>, Self::Error> {
        let wanted: HashSet<&str> = accessions.iter().map(String::as_str).collect();
        Ok(Box::new(
            self.records
                .iter()
                .filter(move |r| {
                    r.superfamily_id.is_some()
                        && wanted.contains(r.accession.as_str())
                        && within_evalue(r.independent_evalue, max_evalue)
                })
                .map(|r| Ok::<_, TableError>(r.to_row())),
        ))
    }
}
