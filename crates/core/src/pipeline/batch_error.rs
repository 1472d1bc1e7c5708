use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::domain::dataset_error::DatasetError;
use crate::output::infrastructure::json_store::FragmentError;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    #[error("detection failed for {path}: {message}")]
    Detection { path: PathBuf, message: String },
    #[error("images {first} and {second} in {camera_dir} would both write {fragment}")]
    FragmentCollision {
        camera_dir: PathBuf,
        fragment: String,
        first: String,
        second: String,
    },
    #[error("failed to create face detector: {0}")]
    DetectorInit(String),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}
