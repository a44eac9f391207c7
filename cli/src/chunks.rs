use chrono::Local;
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    csv::{to_csv, Cell},
    errors::ExportError,
};

/// Accumulates flat rows and writes timestamped CSV artifacts.
///
/// Without a capacity the writer produces exactly one
/// `<entity>_<YYYYMMDD_HHMMSS>.csv` file on `finish`, header-only when no
/// rows were pushed. With a capacity, a full accumulator is flushed
/// immediately as `<entity>_<stamp>_chunk<N>.csv` (N starting at 1) and
/// cleared; `finish` flushes a non-empty remainder only, so an empty export
/// yields zero chunk files.
pub struct CsvChunkWriter {
    basename: &'static str,
    headers: &'static [&'static str],
    out_dir: PathBuf,
    stamp: String,
    capacity: Option<usize>,
    rows: Vec<Vec<Cell>>,
    next_chunk: usize,
    artifacts: Vec<PathBuf>,
}

impl CsvChunkWriter {
    pub fn new(
        basename: &'static str,
        headers: &'static [&'static str],
        out_dir: &Path,
        capacity: Option<usize>,
    ) -> Result<Self, ExportError> {
        fs::create_dir_all(out_dir).map_err(|source| ExportError::WriteArtifact {
            path: out_dir.to_owned(),
            source,
        })?;
        Ok(CsvChunkWriter {
            basename,
            headers,
            out_dir: out_dir.to_owned(),
            stamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
            capacity,
            rows: Vec::new(),
            next_chunk: 1,
            artifacts: Vec::new(),
        })
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), ExportError> {
        self.rows.push(row);
        if self
            .capacity
            .is_some_and(|capacity| self.rows.len() >= capacity)
        {
            self.flush_chunk()?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<Vec<PathBuf>, ExportError> {
        match self.capacity {
            None => {
                let path = self.artifact_path(None);
                self.write_file(&path)?;
            }
            Some(_) if !self.rows.is_empty() => self.flush_chunk()?,
            Some(_) => {}
        }
        Ok(self.artifacts)
    }

    fn flush_chunk(&mut self) -> Result<(), ExportError> {
        let path = self.artifact_path(Some(self.next_chunk));
        self.write_file(&path)?;
        self.next_chunk += 1;
        self.rows.clear();
        Ok(())
    }

    fn artifact_path(&self, chunk: Option<usize>) -> PathBuf {
        let file_name = match chunk {
            Some(index) => format!("{}_{}_chunk{}.csv", self.basename, self.stamp, index),
            None => format!("{}_{}.csv", self.basename, self.stamp),
        };
        self.out_dir.join(file_name)
    }

    fn write_file(&mut self, path: &Path) -> Result<(), ExportError> {
        let csv = to_csv(self.headers, &self.rows);
        fs::write(path, csv).map_err(|source| ExportError::WriteArtifact {
            path: path.to_owned(),
            source,
        })?;
        debug!("Wrote {} rows to `{}`", self.rows.len(), path.display());
        self.artifacts.push(path.to_owned());
        Ok(())
    }
}
