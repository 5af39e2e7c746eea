use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("utc offset {hours}h in {path} is outside -14h..14h")]
    UtcOffsetOutOfRange { path: PathBuf, hours: f64 },

    #[error("no calendar date for month {month}, {hour:02}:{minute:02}")]
    InvalidSiteDate { month: u32, hour: u32, minute: u32 },
}
