mod cli;
mod config;
mod decompress;
mod downloader;
mod error;
mod fetcher;
mod parser;
mod pipeline;
mod scanner;
mod types;
mod workspace;

#[cfg(test)]
mod fixtures;

use chrono::Datelike;
use clap::{CommandFactory, Parser};
use cli::Cli;
use colored::*;
use config::Config;
use error::DownloaderError;
use log::{error, info};
use std::process::ExitCode;
use types::{DownloadStatus, RunSummary};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 99;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Unknown flags and malformed syntax exit with clap's own code (2).
    let cli = Cli::parse();
    let current_year = chrono::Local::now().year().clamp(0, u16::MAX as i32) as u16;

    let config = match Config::from_cli(cli, current_year) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            eprintln!("{}", Cli::command().render_usage());
            return ExitCode::from(exit_code_for(&e));
        }
    };
    info!("Configuration: {:?}", config);

    println!("{}", "NOAA ISD-Lite Download Utility".bold());
    println!("Download data for station_id: {}", config.station);

    match pipeline::run(&config).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{} {}", "Download process failed:".red(), e);
            if e.is_network() {
                eprintln!("Check --base-url, or pass --insecure if the archive's certificate is invalid");
            }
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Validation problems exit with the usage code; everything else is a run failure.
fn exit_code_for(err: &DownloaderError) -> u8 {
    match err {
        DownloaderError::ArgumentError(_) => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

fn print_summary(summary: &RunSummary) {
    let downloads = &summary.downloads;

    println!("\n{}", "Download Summary:".bold());
    println!("Year directories scanned: {}", summary.scan.years_scanned);
    println!(
        "Files downloaded: {} of {}",
        downloads.successful_downloads.to_string().green(),
        downloads.total_downloads
    );
    println!(
        "Total data transferred: {:.2} MB",
        downloads.total_bytes_downloaded as f64 / 1_048_576.0
    );
    println!("Total duration: {:.2?}", downloads.total_duration);
    println!(
        "Output: {} ({:.2} MB)",
        summary.output_path.display(),
        summary.output_bytes as f64 / 1_048_576.0
    );

    if downloads.successful_downloads > 0 {
        println!("\n{}", "Successful Downloads:".green().bold());
        for report in downloads
            .reports
            .iter()
            .filter(|r| r.status == DownloadStatus::Success)
        {
            println!(
                "✓ {} ({:.2} KB decompressed in {:.2?})",
                report.task.file_name().green(),
                report.bytes_decompressed as f64 / 1024.0,
                report.duration
            );
        }
    }

    if !summary.scan.failures.is_empty() {
        println!("\n{}", "Skipped Year Directories:".red().bold());
        for failure in &summary.scan.failures {
            println!("✗ {} - Error: {}", failure.year.red(), failure.error);
        }
    }

    if downloads.failed_downloads > 0 {
        println!("\n{}", "Failed Downloads:".red().bold());
        for report in downloads
            .reports
            .iter()
            .filter(|r| r.status == DownloadStatus::Failed)
        {
            println!(
                "✗ {} - Error: {}",
                report.task.file_name().red(),
                report.error.as_deref().unwrap_or("unknown")
            );
            println!("  URL: {}", report.task.url);
        }
    } else if downloads.total_downloads > 0 {
        println!("\n{}", "All downloads completed successfully".green());
    }
}
