use crate::cli::Cli;
use crate::error::DownloaderError;
use std::path::PathBuf;

pub const MIN_ARCHIVE_YEAR: u16 = 1901;
const WORKSPACE_DIR: &str = "temp";

/// Validated run settings. Built once from the command line and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub station: String,
    /// 0 means every year in the archive.
    pub min_year: u16,
    pub concurrency: usize,
    pub base_url: String,
    pub data_dir: PathBuf,
    pub insecure: bool,
    pub show_progress: bool,
}

impl Config {
    pub fn from_cli(cli: Cli, current_year: u16) -> Result<Self, DownloaderError> {
        let station = match cli.station.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(DownloaderError::ArgumentError("station id is required".into())),
        };
        if station.contains(['/', '\\']) {
            return Err(DownloaderError::ArgumentError(format!(
                "station id {station:?} must not contain path separators"
            )));
        }

        let min_year = match cli.year.as_deref() {
            None => 0,
            Some(raw) => parse_year(raw, current_year)?,
        };

        let concurrency = cli.concurrency.trim().parse::<usize>().map_err(|e| {
            DownloaderError::ArgumentError(format!("concurrency {:?}: {e}", cli.concurrency))
        })?;
        if concurrency == 0 {
            return Err(DownloaderError::ArgumentError(
                "concurrency must be at least 1".into(),
            ));
        }

        Ok(Config {
            station,
            min_year,
            concurrency,
            base_url: cli.base_url,
            data_dir: cli.data_dir,
            insecure: cli.insecure,
            show_progress: !cli.quiet,
        })
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.data_dir.join(WORKSPACE_DIR)
    }
}

fn parse_year(raw: &str, current_year: u16) -> Result<u16, DownloaderError> {
    let year = raw
        .trim()
        .parse::<u16>()
        .map_err(|e| DownloaderError::ArgumentError(format!("year {raw:?}: {e}")))?;

    if !(MIN_ARCHIVE_YEAR..=current_year).contains(&year) {
        return Err(DownloaderError::ArgumentError(format!(
            "year {year} is outside {MIN_ARCHIVE_YEAR}..={current_year}"
        )));
    }
    Ok(year)
}
