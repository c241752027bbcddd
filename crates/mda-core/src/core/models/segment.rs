use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

/// Gap (in residues) below which two neighbouring segments are fused.
pub const DEFAULT_MAX_GAP: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Failed to parse segment '{0}': expected '<start>-<stop>'")]
    InvalidSegment(String),

    #[error("Failed to parse segment '{text}': start {start} is after stop {stop}")]
    InvertedSegment {
        text: String,
        start: usize,
        stop: usize,
    },

    #[error("Failed to parse segment '{0}': residue positions are 1-based")]
    ZeroPosition(String),

    #[error("Failed to parse domain '{0}': expected '<id>/<segments>'")]
    InvalidDomain(String),

    #[error("Domain '{0}' must be tagged with at least one superfamily id")]
    MissingSuperfamily(String),
}

/// An inclusive, 1-based residue range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub stop: usize,
}

impl Segment {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut tokens = text.split('-');
        let (Some(start_str), Some(stop_str), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ParseError::InvalidSegment(text.to_string()));
        };

        let start: usize = start_str
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidSegment(text.to_string()))?;
        let stop: usize = stop_str
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidSegment(text.to_string()))?;

        if start == 0 {
            return Err(ParseError::ZeroPosition(text.to_string()));
        }
        if start > stop {
            return Err(ParseError::InvertedSegment {
                text: text.to_string(),
                start,
                stop,
            });
        }
        Ok(Self { start, stop })
    }

    /// Parses a resolved-segments string where segments are separated by `,` or `_`.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, ParseError> {
        text.split([',', '_']).map(Self::parse).collect()
    }

    /// Number of residues covered.
    pub fn len(&self) -> usize {
        self.stop - self.start + 1
    }

    /// Sorts by start and sweeps left to right, fusing the current segment with its
    /// successor while the gap between them is below `max_gap`. After a fusion the
    /// gap check restarts from the fused segment.
    pub fn merge_adjacent(segments: &[Segment], max_gap: usize) -> Vec<Segment> {
        let mut segs = segments.to_vec();
        segs.sort_by_key(|s| s.start);

        // Signed and wide enough for any pair of usize positions.
        let max_gap = max_gap as i128;
        let mut idx = 0;
        while idx + 1 < segs.len() {
            let next = segs[idx + 1];
            let gap = next.start as i128 - segs[idx].stop as i128;
            if gap < max_gap {
                let current = &mut segs[idx];
                current.stop = current.stop.max(next.stop);
                segs.remove(idx + 1);
                continue;
            }
            idx += 1;
        }

        trace!(
            before = %Segment::render(segments),
            after = %Segment::render(&segs),
            "Squashed segments"
        );
        segs
    }

    pub fn render(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(Segment::to_string)
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}

impl FromStr for Segment {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
