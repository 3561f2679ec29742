//! MPCORB download and cache handling.
//!
//! Fetches the gzip-compressed orbital-elements file from the Minor Planet
//! Center into the configured cache directory and decompresses it in place.
//! The decompressed `MPCORB.DAT` is the only artifact kept; the `.gz` archive
//! is removed after a successful gunzip.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::time::Duration;

use camino::Utf8PathBuf;
use flate2::read::GzDecoder;
use tracing::info;

use crate::config::Config;
use crate::errors::OrreryError;

/// Canonical MPC distribution URL for the full orbit catalog.
pub const MPCORB_URL: &str = "https://minorplanetcenter.net/iau/MPCORB/MPCORB.DAT.gz";

/// Local name of the decompressed catalog.
const MPCORB_FILENAME: &str = "MPCORB.DAT";

/// Path of the cached, decompressed MPCORB file.
pub fn mpcorb_path(config: &Config) -> Utf8PathBuf {
    config.cache_dir().join(MPCORB_FILENAME)
}

fn file_exists_and_not_empty(path: &Utf8PathBuf) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.len() > 0,
        Err(_) => false,
    }
}

/// Download MPCORB.DAT.gz to the cache directory and gunzip it.
///
/// Arguments
/// -----------------
/// * `config`: resolved crate configuration (cache directory).
/// * `force`: re-download even when a cached copy exists.
///
/// Return
/// ----------
/// * The path to the decompressed `MPCORB.DAT`, or an [`OrreryError`] on
///   network or filesystem failure. Network failures propagate as-is; there
///   is no retry.
pub async fn download_mpcorb(config: &Config, force: bool) -> Result<Utf8PathBuf, OrreryError> {
    let cache_dir = config.cache_dir();
    fs::create_dir_all(&cache_dir)?;

    let out_path = mpcorb_path(config);
    if !force && file_exists_and_not_empty(&out_path) {
        info!("Using cached {out_path}");
        return Ok(out_path);
    }

    let gz_path = cache_dir.join(format!("{MPCORB_FILENAME}.gz"));
    info!("Downloading {MPCORB_URL} ...");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(600))
        .build()?;
    let response = client.get(MPCORB_URL).send().await?;
    if !response.status().is_success() {
        return Err(OrreryError::DownloadStatus {
            url: MPCORB_URL.to_string(),
            status: response.status(),
        });
    }
    let body = response.bytes().await?;

    let mut gz_file = BufWriter::new(File::create(&gz_path)?);
    gz_file.write_all(&body)?;
    gz_file.flush()?;
    drop(gz_file);

    decompress_gzip(&gz_path, &out_path)?;

    // Best effort: the archive is only an intermediate.
    let _ = fs::remove_file(&gz_path);

    info!("Cached to {out_path}");
    Ok(out_path)
}

fn decompress_gzip(gz_path: &Utf8PathBuf, out_path: &Utf8PathBuf) -> Result<(), OrreryError> {
    let gz = BufReader::new(File::open(gz_path)?);
    let mut decoder = GzDecoder::new(gz);
    let mut writer = BufWriter::new(File::create(out_path)?);

    match io::copy(&mut decoder, &mut writer) {
        Ok(_) => {
            writer.flush()?;
            Ok(())
        }
        Err(e) => {
            // Do not leave a truncated catalog behind.
            let _ = fs::remove_file(out_path);
            Err(e.into())
        }
    }
}
