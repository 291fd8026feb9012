//! Link extraction from the archive's Apache-style directory listings.
//!
//! Listings are entity-decoded first and then matched with regular
//! expressions. A year directory is a four digit link directly preceded by
//! the folder icon; a station file is a `.gz` link whose href starts with the
//! station identifier and whose visible text repeats the href.

use crate::error::DownloaderError;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

const YEAR_PATTERN: &str = r#"<img\s+src="[^"]*folder\.gif"\s+alt="\[DIR\]"\s*/?>\s*(?:</td>\s*<td[^>]*>\s*)?<a\s+href="([0-9]{4})/"\s*>([0-9]{4})/</a>"#;

fn year_regex() -> &'static Regex {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    YEAR_RE.get_or_init(|| Regex::new(YEAR_PATTERN).expect("year pattern is valid"))
}

/// Decodes a raw listing body into text with HTML entities resolved.
pub fn decode_listing(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    html_escape::decode_html_entities(&text).into_owned()
}

/// Year directory names in listing order.
pub fn extract_years(markup: &str) -> Vec<String> {
    let years: Vec<String> = year_regex()
        .captures_iter(markup)
        .filter(|caps| caps[1] == caps[2])
        .map(|caps| caps[1].to_string())
        .collect();

    debug!("Extracted {} year directories", years.len());
    years
}

/// Matches `.gz` files belonging to a single station.
#[derive(Debug, Clone)]
pub struct StationMatcher {
    station: String,
    file_re: Regex,
}

impl StationMatcher {
    pub fn new(station: &str) -> Result<Self, DownloaderError> {
        let id = regex::escape(station);
        let pattern = format!(r#"<a\s+href="({id}[^"]*?\.gz)"\s*>({id}[^<]*?\.gz)</a>"#);
        let file_re = Regex::new(&pattern).map_err(|e| {
            DownloaderError::ArgumentError(format!("station id {station:?} is unusable: {e}"))
        })?;

        Ok(Self {
            station: station.to_string(),
            file_re,
        })
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    /// Station file names in listing order. An empty result is not an error.
    pub fn extract_files(&self, markup: &str) -> Vec<String> {
        let files: Vec<String> = self
            .file_re
            .captures_iter(markup)
            .filter(|caps| caps[1] == caps[2])
            .map(|caps| caps[1].to_string())
            .collect();

        debug!("Extracted {} files for {}", files.len(), self.station);
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_LISTING: &str = r#"<html><body><table>
<tr><th valign="top"><img src="/icons/blank.gif" alt="[ICO]"></th><th><a href="?C=N;O=D">Name</a></th></tr>
<tr><td valign="top"><img src="/icons/back.gif" alt="[PARENTDIR]"></td><td><a href="/pub/data/noaa/">Parent Directory</a></td></tr>
<tr><td valign="top"><img src="/icons/folder.gif" alt="[DIR]"></td><td><a href="1901/">1901/</a></td><td align="right">2020-01-01 10:00  </td></tr>
<tr><td valign="top"><img src="/icons/folder.gif" alt="[DIR]"></td><td><a href="20&#50;0/">2020/</a></td><td align="right">2021-01-01 10:00  </td></tr>
<tr><td valign="top"><img src="/icons/folder.gif" alt="[DIR]"></td><td><a href="2021/">2021/</a></td><td align="right">2022-01-01 10:00  </td></tr>
<tr><td valign="top"><img src="/icons/folder.gif" alt="[DIR]"></td><td><a href="docs/">docs/</a></td></tr>
<tr><td valign="top"><img src="/icons/text.gif" alt="[TXT]"></td><td><a href="1999/">1999/</a></td></tr>
<tr><td valign="top"><img src="/icons/folder.gif" alt="[DIR]"></td><td><a href="20221/">20221/</a></td></tr>
</table></body></html>"#;

    const YEAR_LISTING: &str = r#"<html><body><table>
<tr><td valign="top"><img src="/icons/compressed.gif" alt="[   ]"></td><td><a href="029070-99999-2020.gz">029070-99999-2020.gz</a></td><td align="right"> 12K</td></tr>
<tr><td valign="top"><img src="/icons/compressed.gif" alt="[   ]"></td><td><a href="029070-99999-2020.txt">029070-99999-2020.txt</a></td></tr>
<tr><td valign="top"><img src="/icons/compressed.gif" alt="[   ]"></td><td><a href="029071-99999-2020.gz">029071-99999-2020.gz</a></td></tr>
<tr><td valign="top"><img src="/icons/compressed.gif" alt="[   ]"></td><td><a href="A&amp;B-99999-2020.gz">A&amp;B-99999-2020.gz</a></td></tr>
<tr><td valign="top"><img src="/icons/compressed.gif" alt="[   ]"></td><td><a href="029070-99999-2020-b.gz">something else</a></td></tr>
</table></body></html>"#;

    #[test]
    fn should_extract_only_folder_years() {
        let years = extract_years(&decode_listing(ROOT_LISTING.as_bytes()));
        assert_eq!(years, vec!["1901", "2020", "2021"]);
    }

    #[test]
    fn should_return_empty_when_no_years() {
        assert!(extract_years("<html><body>nothing here</body></html>").is_empty());
    }

    #[test]
    fn should_extract_station_files() {
        let matcher = StationMatcher::new("029070-99999").unwrap();
        let files = matcher.extract_files(&decode_listing(YEAR_LISTING.as_bytes()));
        assert_eq!(files, vec!["029070-99999-2020.gz"]);
    }

    #[test]
    fn should_match_after_entity_decoding() {
        let matcher = StationMatcher::new("A&B-99999").unwrap();
        let files = matcher.extract_files(&decode_listing(YEAR_LISTING.as_bytes()));
        assert_eq!(files, vec!["A&B-99999-2020.gz"]);
    }

    #[test]
    fn should_treat_station_id_literally() {
        let listing = r#"<a href="029070x99999-2020.gz">029070x99999-2020.gz</a>
<a href="029070.99999-2020.gz">029070.99999-2020.gz</a>"#;

        let matcher = StationMatcher::new("029070.99999").unwrap();
        assert_eq!(matcher.extract_files(listing), vec!["029070.99999-2020.gz"]);

        let matcher = StationMatcher::new("029070+").unwrap();
        assert!(matcher.extract_files(listing).is_empty());
    }

    #[test]
    fn should_require_station_prefix() {
        let listing = r#"<a href="X029070-99999-2020.gz">X029070-99999-2020.gz</a>"#;
        let matcher = StationMatcher::new("029070-99999").unwrap();
        assert!(matcher.extract_files(listing).is_empty());
    }
}
