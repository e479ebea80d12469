//! CSV Data Loader Module
//! Handles CSV reading and writing using Polars.

use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to process CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },
    #[error("Output path is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
}

/// Reads and writes the flat files living in one data directory.
#[derive(Debug, Clone)]
pub struct DataLoader {
    data_dir: PathBuf,
}

impl DataLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a file inside the data directory.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Load a CSV with every column kept as text.
    ///
    /// Schema inference is disabled so decorated values like "$52,300" and
    /// "-" reach the normalizer untouched.
    pub fn load_text_csv(&self, file_name: &str) -> Result<DataFrame, LoaderError> {
        let path = self.path(file_name);
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path));
        }

        let df = LazyCsvReader::new(&path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        debug!(
            "Loaded {} ({} rows, {} columns)",
            path.display(),
            df.height(),
            df.width()
        );
        Ok(df)
    }

    /// Write a frame as CSV, replacing any previous file.
    pub fn write_csv(&self, df: &mut DataFrame, file_name: &str) -> Result<PathBuf, LoaderError> {
        let mut paths = self.write_csvs(vec![(df, file_name)])?;
        paths.pop().ok_or_else(|| LoaderError::NotAFile(self.path(file_name)))
    }

    /// Write several frames as one unit: either every target is replaced or
    /// none is.
    ///
    /// All frames are written to temporary siblings first. Targets are only
    /// swapped in once every temporary file is complete, and a failed swap
    /// restores the targets already replaced.
    pub fn write_csvs(&self, frames: Vec<(&mut DataFrame, &str)>) -> Result<Vec<PathBuf>, LoaderError> {
        fs::create_dir_all(&self.data_dir)?;

        let staged: Vec<StagedFile> = frames.iter().map(|(_, name)| self.staged(name)).collect();
        if let Some(bad) = staged.iter().find(|s| s.target.is_dir()) {
            return Err(LoaderError::NotAFile(bad.target.clone()));
        }

        for ((df, _), file) in frames.into_iter().zip(&staged) {
            if let Err(e) = write_frame(df, &file.tmp) {
                discard(&staged);
                return Err(e);
            }
        }

        let mut committed: Vec<&StagedFile> = Vec::with_capacity(staged.len());
        for file in &staged {
            if let Err(e) = file.commit() {
                warn!("Failed to replace {}: {}", file.target.display(), e);
                committed.iter().rev().for_each(|f| f.rollback());
                discard(&staged);
                return Err(e.into());
            }
            committed.push(file);
        }

        for file in &staged {
            let _ = fs::remove_file(&file.backup);
            debug!("Wrote {}", file.target.display());
        }
        Ok(staged.into_iter().map(|s| s.target).collect())
    }

    fn staged(&self, file_name: &str) -> StagedFile {
        StagedFile {
            target: self.path(file_name),
            tmp: self.path(&format!(".{file_name}.tmp")),
            backup: self.path(&format!(".{file_name}.bak")),
        }
    }
}

/// One output file on its way into place.
struct StagedFile {
    target: PathBuf,
    tmp: PathBuf,
    backup: PathBuf,
}

impl StagedFile {
    /// Move any previous target aside, then move the temporary file in.
    fn commit(&self) -> std::io::Result<()> {
        let had_previous = self.target.is_file();
        if had_previous {
            fs::rename(&self.target, &self.backup)?;
        }
        if let Err(e) = fs::rename(&self.tmp, &self.target) {
            if had_previous {
                let _ = fs::rename(&self.backup, &self.target);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Undo a successful commit.
    fn rollback(&self) {
        if self.backup.is_file() {
            let _ = fs::rename(&self.backup, &self.target);
        } else {
            let _ = fs::remove_file(&self.target);
        }
    }
}

fn write_frame(df: &mut DataFrame, path: &Path) -> Result<(), LoaderError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)?;
    file.sync_all()?;
    Ok(())
}

/// Remove leftover temporary files.
fn discard(staged: &[StagedFile]) {
    for file in staged {
        let _ = fs::remove_file(&file.tmp);
    }
}

/// Fail with a descriptive error when a required column is absent.
pub fn require_columns(df: &DataFrame, file: &str, columns: &[&str]) -> Result<(), LoaderError> {
    for column in columns {
        if df.get_column_index(column).is_none() {
            return Err(LoaderError::MissingColumn {
                file: file.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Borrow a text column as optional string slices.
pub fn text_values<'a>(df: &'a DataFrame, column: &str) -> Result<Vec<Option<&'a str>>, LoaderError> {
    let values = df
        .column(column)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .collect();
    Ok(values)
}
