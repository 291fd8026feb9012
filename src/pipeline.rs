//! One complete run: workspace setup, scan, download, merge.

use crate::config::Config;
use crate::downloader::Downloader;
use crate::error::DownloaderError;
use crate::fetcher::Fetcher;
use crate::parser::StationMatcher;
use crate::scanner::Scanner;
use crate::types::RunSummary;
use crate::workspace::{self, TempWorkspace};
use log::{info, warn};

pub async fn run(config: &Config) -> Result<RunSummary, DownloaderError> {
    let matcher = StationMatcher::new(&config.station)?;
    let fetcher = Fetcher::new(config.insecure)?;

    std::fs::create_dir_all(&config.data_dir)
        .map_err(|e| DownloaderError::fs(&config.data_dir, e))?;
    let output_path = workspace::output_path(&config.data_dir, &config.station, config.min_year);
    workspace::remove_stale_output(&output_path)?;
    let ws = TempWorkspace::recreate(config.workspace_dir())?;
    info!("Workspace ready at {}", ws.path().display());

    let scanner = Scanner::new(fetcher.clone(), config.concurrency);
    let scanned = scanner
        .scan(&config.base_url, &matcher, config.min_year, ws.path())
        .await;
    let scan = match scanned {
        Ok(scan) => scan,
        Err(e) => {
            ws.discard();
            return Err(e);
        }
    };

    println!("Found {} files for {}", scan.tasks.len(), config.station);
    if scan.tasks.is_empty() {
        warn!("No files found for station {}", config.station);
    }

    // Scan is complete before any download starts.
    let downloader = Downloader::new(fetcher, config.concurrency, config.show_progress);
    let downloads = downloader.download_all(scan.tasks.clone()).await;

    let target = output_path.clone();
    let output_bytes = tokio::task::spawn_blocking(move || ws.merge_into(&target)).await??;
    println!("Generated: {}", output_path.display());

    Ok(RunSummary {
        scan,
        downloads,
        output_path,
        output_bytes,
    })
}
