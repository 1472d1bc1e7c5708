use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::detection::domain::detection_record::DetectionRecord;
use crate::output::domain::shard::{Shard, ShardKind};
use crate::shared::constants::FRAGMENT_EXTENSION;

#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fragment file name for an image: the image stem with a `.json` extension.
pub fn fragment_file_name(image: &str) -> String {
    let stem = Path::new(image)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.to_string());
    format!("{stem}.{FRAGMENT_EXTENSION}")
}

pub fn write_fragment(path: &Path, record: &DetectionRecord) -> Result<(), FragmentError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| FragmentError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    write_json(path, record)
}

pub fn read_fragment(path: &Path) -> Result<DetectionRecord, FragmentError> {
    read_json(path)
}

/// Writes `shard` as `<dir>/<kind prefix><pod>.json` and returns the path.
///
/// The shard is written to a temporary sibling and renamed into place, so
/// readers never observe a partial file.
pub fn write_shard(
    dir: &Path,
    kind: ShardKind,
    pod_index: usize,
    shard: &Shard,
) -> Result<PathBuf, FragmentError> {
    fs::create_dir_all(dir).map_err(|source| FragmentError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let dest = dir.join(kind.file_name(pod_index));
    let temp = dest.with_extension("part");

    if let Err(e) = write_json(&temp, shard) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    fs::rename(&temp, &dest).map_err(|source| FragmentError::Write {
        path: dest.clone(),
        source,
    })?;
    Ok(dest)
}

pub fn read_shard(path: &Path) -> Result<Shard, FragmentError> {
    read_json(path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), FragmentError> {
    let write_err = |source| FragmentError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|source| FragmentError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(write_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FragmentError> {
    let file = fs::File::open(path).map_err(|source| FragmentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| FragmentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
