//! Scratch directory handling and the final merge into the output file.

use crate::error::DownloaderError;
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Per-run scratch directory holding the decompressed station files.
///
/// Not safe to share between concurrent runs; nothing locks it.
#[derive(Debug)]
pub struct TempWorkspace {
    path: PathBuf,
}

impl TempWorkspace {
    /// Creates the directory, purging anything left by a previous run.
    pub fn recreate(path: impl Into<PathBuf>) -> Result<Self, DownloaderError> {
        let path = path.into();
        if path.exists() {
            debug!("Purging existing workspace {}", path.display());
            fs::remove_dir_all(&path).map_err(|e| DownloaderError::fs(&path, e))?;
        }
        fs::create_dir_all(&path).map_err(|e| DownloaderError::fs(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Regular files directly inside the workspace, sorted by file name.
    pub fn files(&self) -> Result<Vec<PathBuf>, DownloaderError> {
        let fs_err = |e| DownloaderError::fs(&self.path, e);
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(fs_err)? {
            let entry = entry.map_err(fs_err)?;
            if entry.file_type().map_err(fs_err)?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Concatenates every workspace file into `output`, then deletes the
    /// workspace. Returns the number of bytes written.
    ///
    /// The output is assembled in a `.partial` sibling and renamed into
    /// place only once complete.
    pub fn merge_into(self, output: &Path) -> Result<u64, DownloaderError> {
        let partial = partial_path(output);
        let result = self.concatenate(&partial).and_then(|written| {
            fs::rename(&partial, output).map_err(|e| DownloaderError::fs(output, e))?;
            Ok(written)
        });

        if result.is_err() {
            if let Err(e) = fs::remove_file(&partial) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Could not remove {}: {}", partial.display(), e);
                }
            }
            self.discard();
            return result;
        }

        self.remove()?;
        result
    }

    fn concatenate(&self, target: &Path) -> Result<u64, DownloaderError> {
        let out = File::create(target).map_err(|e| DownloaderError::fs(target, e))?;
        let mut writer = BufWriter::new(out);
        let mut written = 0u64;

        for path in self.files()? {
            debug!("Appending {}", path.display());
            let mut part = File::open(&path).map_err(|e| DownloaderError::fs(&path, e))?;
            written += io::copy(&mut part, &mut writer).map_err(|e| DownloaderError::fs(&path, e))?;
        }

        writer.flush().map_err(|e| DownloaderError::fs(target, e))?;
        Ok(written)
    }

    pub fn remove(self) -> Result<(), DownloaderError> {
        fs::remove_dir_all(&self.path).map_err(|e| DownloaderError::fs(&self.path, e))
    }

    /// Best-effort removal used on fatal paths.
    pub fn discard(self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Could not remove workspace {}: {}", self.path.display(), e);
            }
        }
    }
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    output.with_file_name(name)
}

/// `{data_dir}/{station}_{year}.txt`, or `{data_dir}/{station}.txt` without a year.
pub fn output_path(data_dir: &Path, station: &str, min_year: u16) -> PathBuf {
    if min_year > 0 {
        data_dir.join(format!("{station}_{min_year}.txt"))
    } else {
        data_dir.join(format!("{station}.txt"))
    }
}

/// Removes a previous run's output so a failed run cannot be mistaken for a fresh one.
pub fn remove_stale_output(output: &Path) -> Result<(), DownloaderError> {
    match fs::remove_file(output) {
        Ok(()) => {
            debug!("Removed previous output {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DownloaderError::fs(output, e)),
    }
}
