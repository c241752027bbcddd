use serde::Deserialize;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use thiserror::Error;

/// How existing output files are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Refuse to touch any target that already exists.
    #[default]
    None,
    Overwrite,
    Append,
}

impl FromStr for WriteMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(WriteMode::None),
            "overwrite" => Ok(WriteMode::Overwrite),
            "append" => Ok(WriteMode::Append),
            other => Err(format!(
                "Invalid write mode '{}'. Expected 'none', 'overwrite' or 'append'.",
                other
            )),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                WriteMode::None => "none",
                WriteMode::Overwrite => "overwrite",
                WriteMode::Append => "append",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(
        "Output file '{path}' exists and write mode is 'none' (requires 'overwrite' or 'append')",
        path = path.display()
    )]
    Conflict { path: PathBuf },

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fails on the first existing target when `mode` is [`WriteMode::None`].
pub fn check_targets<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
    mode: WriteMode,
) -> Result<(), OutputError> {
    if mode != WriteMode::None {
        return Ok(());
    }
    match paths.into_iter().find(|p| p.exists()) {
        Some(path) => Err(OutputError::Conflict {
            path: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}

enum Sink {
    Staged(BufWriter<NamedTempFile>),
    Append(File),
}

/// Writes whole records to an output file.
///
/// In `none` and `overwrite` modes records are staged in a temporary file next to the
/// target and only moved into place by [`RecordWriter::finish`]; dropping the writer
/// early leaves the target untouched. In `append` mode each record is appended with a
/// single write.
pub struct RecordWriter {
    path: PathBuf,
    mode: WriteMode,
    sink: Sink,
}

impl RecordWriter {
    pub fn create(path: &Path, mode: WriteMode) -> Result<Self, OutputError> {
        let io_err = |source: io::Error| OutputError::Io {
            path: path.to_path_buf(),
            source,
        };

        let sink = match mode {
            WriteMode::None | WriteMode::Overwrite => {
                check_targets([path], mode)?;
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                Sink::Staged(BufWriter::new(
                    NamedTempFile::new_in(dir).map_err(io_err)?,
                ))
            }
            WriteMode::Append => Sink::Append(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(io_err)?,
            ),
        };

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            sink,
        })
    }

    pub fn write_record(&mut self, record: &str) -> Result<(), OutputError> {
        let result = match &mut self.sink {
            Sink::Staged(writer) => writer.write_all(record.as_bytes()),
            Sink::Append(file) => file.write_all(record.as_bytes()),
        };
        result.map_err(|source| OutputError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Flushes and moves staged output into place.
    pub fn finish(self) -> Result<PathBuf, OutputError> {
        let path = self.path;
        let io_err = |source: io::Error| OutputError::Io {
            path: path.clone(),
            source,
        };

        match self.sink {
            Sink::Staged(writer) => {
                let staged = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
                let persisted = if self.mode == WriteMode::None {
                    staged.persist_noclobber(&path)
                } else {
                    staged.persist(&path)
                };
                persisted.map_err(|e| io_err(e.error))?;
            }
            Sink::Append(mut file) => file.flush().map_err(io_err)?,
        }
        Ok(path)
    }
}

pub fn tsv_record(fields: &[&str]) -> String {
    let mut record = fields.join("\t");
    record.push('\n');
    record
}

pub fn fasta_record(id: &str, sequence: &str) -> String {
    format!(">{}\n{}\n", id, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn write_mode_parses_case_insensitively() {
        assert_eq!("none".parse::<WriteMode>().unwrap(), WriteMode::None);
        assert_eq!(
            "Overwrite".parse::<WriteMode>().unwrap(),
            WriteMode::Overwrite
        );
        assert_eq!("APPEND".parse::<WriteMode>().unwrap(), WriteMode::Append);
        assert!("clobber".parse::<WriteMode>().is_err());
        assert_eq!(WriteMode::Append.to_string(), "append");
    }

    #[test]
    fn check_targets_only_conflicts_in_none_mode() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("exists.txt");
        let fresh = dir.path().join("fresh.txt");
        fs::write(&existing, "x").unwrap();

        let targets = [fresh.as_path(), existing.as_path()];
        assert!(matches!(
            check_targets(targets, WriteMode::None),
            Err(OutputError::Conflict { ref path }) if path == &existing
        ));
        assert!(check_targets(targets, WriteMode::Overwrite).is_ok());
        assert!(check_targets(targets, WriteMode::Append).is_ok());
        assert!(check_targets([fresh.as_path()], WriteMode::None).is_ok());
    }

    #[test]
    fn staged_writer_only_creates_target_on_finish() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.tsv");

        let mut writer = RecordWriter::create(&path, WriteMode::None).unwrap();
        writer.write_record(&tsv_record(&["a", "b"])).unwrap();
        assert!(!path.exists());
        writer.finish().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\tb\n");
    }

    #[test]
    fn dropped_writer_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        {
            let mut writer = RecordWriter::create(&path, WriteMode::Overwrite).unwrap();
            writer.write_record("partial\n").unwrap();
        }
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn none_mode_refuses_existing_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        fs::write(&path, "keep").unwrap();

        assert!(matches!(
            RecordWriter::create(&path, WriteMode::None),
            Err(OutputError::Conflict { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep");
    }

    #[test]
    fn overwrite_and_append_modes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.fasta");
        fs::write(&path, "old\n").unwrap();

        let mut writer = RecordWriter::create(&path, WriteMode::Overwrite).unwrap();
        writer.write_record(&fasta_record("d1", "AAA")).unwrap();
        writer.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), ">d1\nAAA\n");

        let mut writer = RecordWriter::create(&path, WriteMode::Append).unwrap();
        writer.write_record(&fasta_record("d2", "CC")).unwrap();
        writer.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), ">d1\nAAA\n>d2\nCC\n");
    }
}
