//! Shared builders for the mock archive used in tests.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Apache-style root listing with one folder row per year.
pub fn root_listing(years: &[&str]) -> String {
    let rows: String = years
        .iter()
        .map(|y| {
            format!(
                "<tr><td valign=\"top\"><img src=\"/icons/folder.gif\" alt=\"[DIR]\"></td><td><a href=\"{y}/\">{y}/</a></td></tr>\n"
            )
        })
        .collect();
    format!("<html><body><table>\n{rows}</table></body></html>")
}

pub fn year_listing(files: &[&str]) -> String {
    let rows: String = files
        .iter()
        .map(|f| {
            format!(
                "<tr><td valign=\"top\"><img src=\"/icons/compressed.gif\" alt=\"[   ]\"></td><td><a href=\"{f}\">{f}</a></td></tr>\n"
            )
        })
        .collect();
    format!("<html><body><table>\n{rows}</table></body></html>")
}

pub async fn mount_body(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
