use super::segment::{ParseError, Segment};
use std::fmt;
use thiserror::Error;

/// Architecture label used when a domain carries no superfamily id.
pub const UNKNOWN_ARCHITECTURE: &str = "unknown";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Protein '{protein_id}' has no sequence to chop domain '{domain_id}' from")]
    MissingSequence {
        protein_id: String,
        domain_id: String,
    },

    #[error(
        "Segment {segment} of domain '{domain_id}' lies outside its protein sequence (length {sequence_length})"
    )]
    OutOfBounds {
        domain_id: String,
        segment: Segment,
        sequence_length: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub domain_id: String,
    pub superfamily_ids: Vec<String>,
    pub segments: Vec<Segment>,
    pub sequence: Option<String>, // Chopped residue sequence, once materialised
}

impl Domain {
    pub fn new(
        domain_id: impl Into<String>,
        superfamily_ids: Vec<String>,
        segments: Vec<Segment>,
    ) -> Self {
        Self {
            domain_id: domain_id.into(),
            superfamily_ids,
            segments,
            sequence: None,
        }
    }

    /// Parses `"<id>/<seg1>_<seg2>..."`, splitting on the first `/`.
    pub fn from_string(text: &str, superfamily_ids: Vec<String>) -> Result<Self, ParseError> {
        let (domain_id, segments_str) = text
            .split_once('/')
            .filter(|(id, segs)| !id.is_empty() && !segs.is_empty())
            .ok_or_else(|| ParseError::InvalidDomain(text.to_string()))?;

        if superfamily_ids.is_empty() {
            return Err(ParseError::MissingSuperfamily(text.to_string()));
        }

        let segments = segments_str
            .split('_')
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(domain_id, superfamily_ids, segments))
    }

    /// Fuses `domains` into a single domain tagged with `superfamily_ids`.
    ///
    /// All segments are pooled, sorted and squashed with [`Segment::merge_adjacent`];
    /// the new id is `"<protein_id>/<rendered segments>"`.
    pub fn merge<'a>(
        protein_id: &str,
        domains: impl IntoIterator<Item = &'a Domain>,
        superfamily_ids: Vec<String>,
        max_gap: usize,
    ) -> Self {
        let mut all_segments: Vec<Segment> = domains
            .into_iter()
            .flat_map(|d| d.segments.iter().copied())
            .collect();
        all_segments.sort_by_key(|s| s.start);

        let squashed = Segment::merge_adjacent(&all_segments, max_gap);
        let domain_id = format!("{}/{}", protein_id, Segment::render(&squashed));
        Self::new(domain_id, superfamily_ids, squashed)
    }

    pub fn architecture_key(&self) -> Option<String> {
        if self.superfamily_ids.is_empty() {
            None
        } else {
            Some(self.superfamily_ids.join("-"))
        }
    }

    /// The single (or first) superfamily id, used when rendering a whole-protein architecture.
    pub fn primary_superfamily(&self) -> Option<&str> {
        self.superfamily_ids.first().map(String::as_str)
    }

    pub fn is_merged(&self) -> bool {
        self.superfamily_ids.len() > 1
    }

    pub fn start_pos(&self) -> Option<usize> {
        self.segments.first().map(|s| s.start)
    }

    pub fn stop_pos(&self) -> Option<usize> {
        self.segments.last().map(|s| s.stop)
    }

    /// Total residues covered by the segments.
    pub fn residue_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Concatenates `protein_sequence[start-1..stop]` across all segments (1-based, inclusive).
    pub fn chop(&self, protein_sequence: &str) -> Result<String, SequenceError> {
        let mut chopped = String::with_capacity(self.residue_count());
        for segment in &self.segments {
            let slice = segment
                .start
                .checked_sub(1)
                .and_then(|from| protein_sequence.get(from..segment.stop))
                .ok_or_else(|| SequenceError::OutOfBounds {
                    domain_id: self.domain_id.clone(),
                    segment: *segment,
                    sequence_length: protein_sequence.len(),
                })?;
            chopped.push_str(slice);
        }
        Ok(chopped)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<40} [{}]",
            self.domain_id,
            self.architecture_key()
                .as_deref()
                .unwrap_or(UNKNOWN_ARCHITECTURE)
        )
    }
}
