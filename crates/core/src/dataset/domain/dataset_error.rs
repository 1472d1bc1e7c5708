use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("empty root directory: {0}")]
    EmptyRoot(PathBuf),
    #[error("no objects left to process after filtering")]
    NothingToProcess,
    #[error("object {0:?} is not a numeric id")]
    NonNumericObject(String),
    #[error("range start {start} is below the smallest object id {min}")]
    RangeStartTooLow { start: i64, min: i64 },
    #[error("range end {end} is above the largest object id {max}")]
    RangeEndTooHigh { end: i64, max: i64 },
    #[error("failed to list {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
