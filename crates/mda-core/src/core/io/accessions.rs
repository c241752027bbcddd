use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse UniProtKB accession from line '{content}' (line {line})")]
    Parse { line: usize, content: String },
}

/// Reads one accession per line: `#` lines and blank lines are skipped, and the
/// leading word token of every other line is taken.
pub fn read_accessions(reader: impl BufRead) -> Result<Vec<String>, AccessionError> {
    let mut accessions = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let token: String = line
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if token.is_empty() {
            return Err(AccessionError::Parse {
                line: idx + 1,
                content: line.trim().to_string(),
            });
        }
        accessions.push(token);
    }
    Ok(accessions)
}

pub fn read_accessions_from_path(path: &Path) -> Result<Vec<String>, AccessionError> {
    let file = File::open(path)?;
    read_accessions(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_token_and_skips_comments() {
        let input = "# header\nP12345\nQ14119 some description\n\nA0A024R161\t9606\n";
        let accessions = read_accessions(input.as_bytes()).unwrap();
        assert_eq!(accessions, vec!["P12345", "Q14119", "A0A024R161"]);
    }

    #[test]
    fn rejects_lines_without_leading_accession() {
        let input = "P12345\n-bad\n";
        let result = read_accessions(input.as_bytes());
        assert!(matches!(
            result,
            Err(AccessionError::Parse { line: 2, ref content }) if content == "-bad"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_accessions_from_path(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(AccessionError::Io(_))));
    }
}
