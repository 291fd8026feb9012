use std::path::PathBuf;
use std::time::Duration;

/// One remote `.gz` file and the workspace it is materialised into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub destination_dir: PathBuf,
}

impl DownloadTask {
    /// Final path segment of the source URL.
    pub fn file_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }

    /// Download name minus its `.gz` suffix.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        name.strip_suffix(".gz").unwrap_or(name)
    }

    /// Workspace paths owned by this task. `duplicate` is non-zero for the
    /// n-th later task with the same stem; those get a `~n` suffix so that
    /// no two tasks ever write or clean up the same file.
    pub fn workspace_files(&self, duplicate: usize) -> TaskFiles {
        let stem = match duplicate {
            0 => self.file_stem().to_string(),
            n => format!("{}~{}", self.file_stem(), n),
        };
        TaskFiles {
            compressed: self.destination_dir.join(format!("{stem}.gz")),
            decompressed: self.destination_dir.join(stem),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFiles {
    pub compressed: PathBuf,
    pub decompressed: PathBuf,
}

#[derive(Debug)]
pub struct DownloadReport {
    pub task: DownloadTask,
    pub status: DownloadStatus,
    pub bytes_downloaded: u64,
    pub bytes_decompressed: u64,
    pub duration: Duration,
    pub error: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum DownloadStatus {
    Success,
    Failed,
}

#[derive(Debug)]
pub struct DownloadSummary {
    pub total_downloads: usize,
    pub successful_downloads: usize,
    pub failed_downloads: usize,
    pub total_bytes_downloaded: u64,
    pub total_duration: Duration,
    pub reports: Vec<DownloadReport>,
}

impl DownloadSummary {
    pub fn from_reports(reports: Vec<DownloadReport>, total_duration: Duration) -> Self {
        let total_downloads = reports.len();
        let successful_downloads = reports
            .iter()
            .filter(|r| r.status == DownloadStatus::Success)
            .count();

        DownloadSummary {
            total_downloads,
            successful_downloads,
            failed_downloads: total_downloads - successful_downloads,
            total_bytes_downloaded: reports.iter().map(|r| r.bytes_downloaded).sum(),
            total_duration,
            reports,
        }
    }
}

/// A year directory whose listing could not be fetched.
#[derive(Debug)]
pub struct YearFailure {
    pub year: String,
    pub error: String,
}

#[derive(Debug)]
pub struct ScanResult {
    pub years_scanned: usize,
    pub tasks: Vec<DownloadTask>,
    pub failures: Vec<YearFailure>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub scan: ScanResult,
    pub downloads: DownloadSummary,
    pub output_path: PathBuf,
    pub output_bytes: u64,
}
