use crate::decompress;
use crate::error::DownloaderError;
use crate::fetcher::Fetcher;
use crate::types::{DownloadReport, DownloadStatus, DownloadSummary, DownloadTask, TaskFiles};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::collections::HashMap;
use std::time::Instant;

/// Bounded pool that materialises each task as a decompressed file in its
/// destination directory.
pub struct Downloader {
    fetcher: Fetcher,
    concurrency: usize,
    show_progress: bool,
}

impl Downloader {
    pub fn new(fetcher: Fetcher, concurrency: usize, show_progress: bool) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
            show_progress,
        }
    }

    /// Runs every task and waits for all of them. A failing task is logged
    /// and reported, never propagated, so siblings always run to completion.
    pub async fn download_all(&self, tasks: Vec<DownloadTask>) -> DownloadSummary {
        println!("Initializing worker pool with concurrency: {}", self.concurrency);
        let start_time = Instant::now();
        let pb = self.create_progress_bar(tasks.len() as u64);

        let files = assign_workspace_files(&tasks);
        let reports: Vec<DownloadReport> = futures::stream::iter(tasks.into_iter().zip(files))
            .map(|(task, files)| {
                let pb = pb.clone();
                async move {
                    let report = self.download_file(task, files).await;
                    pb.inc(1);
                    report
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        pb.finish_and_clear();
        DownloadSummary::from_reports(reports, start_time.elapsed())
    }

    async fn download_file(&self, task: DownloadTask, files: TaskFiles) -> DownloadReport {
        let start_time = Instant::now();
        println!("Downloading: {}", task.file_name());
        info!("Starting download: {}", task.url);
        let mut downloaded: u64 = 0;

        let result = async {
            let body = self.fetcher.fetch(&task.url).await?;
            downloaded = body.len() as u64;

            let gz_path = &files.compressed;
            tokio::fs::write(gz_path, &body)
                .await
                .map_err(|e| DownloaderError::fs(gz_path, e))?;

            let written = {
                let (src, dst) = (gz_path.clone(), files.decompressed.clone());
                tokio::task::spawn_blocking(move || decompress::decompress_file(&src, &dst))
                    .await??
            };

            tokio::fs::remove_file(gz_path)
                .await
                .map_err(|e| DownloaderError::fs(gz_path, e))?;

            Ok::<u64, DownloaderError>(written)
        }
        .await;

        let duration = start_time.elapsed();
        match result {
            Ok(written) => DownloadReport {
                task,
                status: DownloadStatus::Success,
                bytes_downloaded: downloaded,
                bytes_decompressed: written,
                duration,
                error: None,
            },
            Err(e) => {
                let error_msg = e.to_string();
                error!("Download failed for {}: {}", task.url, error_msg);
                discard_partial_files(&files).await;
                DownloadReport {
                    task,
                    status: DownloadStatus::Failed,
                    bytes_downloaded: downloaded,
                    bytes_decompressed: 0,
                    duration,
                    error: Some(error_msg),
                }
            }
        }
    }

    fn create_progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}

/// Numbers tasks that share a file stem so each one owns distinct paths.
fn assign_workspace_files(tasks: &[DownloadTask]) -> Vec<TaskFiles> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    tasks
        .iter()
        .map(|task| {
            let count = seen.entry(task.file_stem()).or_insert(0);
            let files = task.workspace_files(*count);
            *count += 1;
            files
        })
        .collect()
}

// A failed task must not leave anything behind for the merge to pick up.
async fn discard_partial_files(files: &TaskFiles) {
    for path in [&files.compressed, &files.decompressed] {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                error!("Could not remove {}: {}", path.display(), e);
            }
        }
    }
}
