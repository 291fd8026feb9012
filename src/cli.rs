use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://www.ncei.noaa.gov/pub/data/noaa/isd-lite";

/// Download and merge NOAA ISD-Lite observation files for one station.
///
/// Year and concurrency are taken as text and validated afterwards so that
/// bad values exit with the validation code rather than clap's parse code.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Station identifier, e.g. 029070-99999
    #[arg(short, long, value_name = "ID")]
    pub station: Option<String>,

    /// Only fetch years from YYYY onwards
    #[arg(short, long, value_name = "YYYY")]
    pub year: Option<String>,

    /// Number of concurrent workers
    #[arg(short, long, value_name = "N", default_value = "4", allow_hyphen_values = true)]
    pub concurrency: String,

    /// Archive root containing the year directories
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory for the merged output and the scratch workspace
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Skip TLS certificate verification (the connection can then be intercepted)
    #[arg(long)]
    pub insecure: bool,

    /// Hide the download progress bar
    #[arg(short, long)]
    pub quiet: bool,
}
