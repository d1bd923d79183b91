use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn image bytes into pixels.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Unable to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Unable to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to fetch or understand a paintings manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest not found ({0})")]
    Status(u16),
    #[error("Manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Manifest format should be an array or {{items: []}}")]
    InvalidFormat,
    #[error("Unable to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("item at position {0} has an empty id")]
    EmptyId(usize),
    #[error("item {0:?} has an empty title")]
    EmptyTitle(String),
    #[error("duplicate item id {0:?}")]
    DuplicateId(String),
    #[error("item {id:?} has year {year}, expected a 4-digit year")]
    InvalidYear { id: String, year: i32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("unknown category {0:?} (expected all, painting, 3d or game)")]
    Category(String),
    #[error("unknown sort order {0:?} (expected new or old)")]
    Sort(String),
    #[error("unknown theme {0:?} (expected dark or light)")]
    Theme(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unable to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Settings file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unable to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
}
