use thiserror::Error;

/// Error taxonomy for the crate.
///
/// Per-record problems (malformed MPCORB lines, unparseable epochs, invalid
/// orbits) are deliberately **not** represented here: they are handled by
/// skipping or defaulting at the point of use, so only genuinely fatal
/// conditions surface as an `OrreryError`.
#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("MPCORB file not found at {0}. Run the download command first.")]
    MpcorbNotFound(camino::Utf8PathBuf),

    #[error("Invalid date {0}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Download of {url} failed with HTTP status {status}")]
    DownloadStatus {
        url: String,
        status: reqwest::StatusCode,
    },
}
