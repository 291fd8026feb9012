//! Discovery of the station's files across the archive's year directories.

use crate::error::DownloaderError;
use crate::fetcher::Fetcher;
use crate::parser::{self, StationMatcher};
use crate::types::{DownloadTask, ScanResult, YearFailure};
use futures::StreamExt;
use log::{error, info};
use std::path::{Path, PathBuf};

pub struct Scanner {
    fetcher: Fetcher,
    concurrency: usize,
}

impl Scanner {
    pub fn new(fetcher: Fetcher, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Lists year directories under `base_url`, keeps those at or after
    /// `min_year` (0 keeps all) and collects one task per station file.
    ///
    /// Only a failure to fetch the root listing is returned as an error.
    /// Year listings that fail are reported in [`ScanResult::failures`].
    pub async fn scan(
        &self,
        base_url: &str,
        matcher: &StationMatcher,
        min_year: u16,
        destination_dir: &Path,
    ) -> Result<ScanResult, DownloaderError> {
        let base_url = base_url.trim_end_matches('/');

        println!("Scanning root directory for all year directories");
        let root = self.fetcher.fetch(&format!("{base_url}/")).await?;
        let years = filter_years(parser::extract_years(&parser::decode_listing(&root)), min_year);
        info!("{} year directories qualify (min year {})", years.len(), min_year);

        println!("Initializing worker pool with concurrency: {}", self.concurrency);
        let results: Vec<(String, Result<Vec<DownloadTask>, DownloaderError>)> =
            futures::stream::iter(years)
                .map(|year| async move {
                    let result = self
                        .scan_year(base_url, &year, matcher, destination_dir)
                        .await;
                    (year, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let years_scanned = results.len();
        let mut tasks = Vec::new();
        let mut failures = Vec::new();
        for (year, result) in results {
            match result {
                Ok(found) => tasks.extend(found),
                Err(e) => {
                    error!("Skipping year {}: {}", year, e);
                    failures.push(YearFailure {
                        year,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(ScanResult {
            years_scanned,
            tasks,
            failures,
        })
    }

    async fn scan_year(
        &self,
        base_url: &str,
        year: &str,
        matcher: &StationMatcher,
        destination_dir: &Path,
    ) -> Result<Vec<DownloadTask>, DownloaderError> {
        let year_url = format!("{base_url}/{year}");
        println!("Scanning: {}", year_url);

        let listing = self.fetcher.fetch(&format!("{year_url}/")).await?;
        let files = matcher.extract_files(&parser::decode_listing(&listing));
        info!("Year {}: {} files for {}", year, files.len(), matcher.station());

        Ok(files
            .into_iter()
            .map(|file| DownloadTask {
                url: format!("{year_url}/{file}"),
                destination_dir: PathBuf::from(destination_dir),
            })
            .collect())
    }
}

/// Keeps years `>= min_year`; a threshold of 0 keeps everything.
pub fn filter_years(years: Vec<String>, min_year: u16) -> Vec<String> {
    years
        .into_iter()
        .filter(|y| y.parse::<u16>().map(|y| y >= min_year).unwrap_or(false))
        .collect()
}
