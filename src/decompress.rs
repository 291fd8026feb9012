//! Gzip decompression for downloaded station files.

use crate::error::DownloaderError;
use flate2::read::MultiGzDecoder;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Decompresses an in-memory gzip stream. Concatenated members are all decoded.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, DownloaderError> {
    if bytes.is_empty() {
        return Err(empty_input());
    }

    let mut out = Vec::new();
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(DownloaderError::FormatError)?;
    Ok(out)
}

/// Decompresses the file at `src` into a new file at `dst`, returning the
/// number of decompressed bytes. Nothing is written when `src` is not valid gzip.
pub fn decompress_file(src: &Path, dst: &Path) -> Result<u64, DownloaderError> {
    let compressed = fs::read(src).map_err(|e| DownloaderError::fs(src, e))?;
    let data = decompress(&compressed)?;
    fs::write(dst, &data).map_err(|e| DownloaderError::fs(dst, e))?;
    Ok(data.len() as u64)
}

fn empty_input() -> DownloaderError {
    DownloaderError::FormatError(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "empty gzip stream",
    ))
}
