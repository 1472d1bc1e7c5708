pub const FACE_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Per-object subdirectory holding one directory per camera.
pub const IMAGES_SUBDIR: &str = "images_lr";

/// Root-level entries with these suffixes are metadata, not objects.
pub const IGNORED_OBJECT_SUFFIXES: &[&str] = &["json", "txt"];

pub const FRAGMENT_EXTENSION: &str = "json";

pub const DATA_SHARD_PREFIX: &str = "data_part_";
pub const FULL_DATA_SHARD_PREFIX: &str = "full_data_part_";

pub const POD_INDEX_ENV: &str = "JOB_COMPLETION_INDEX";
pub const POD_COUNT_ENV: &str = "JOB_PARALLELISM";

/// Frames kept by the full-data runner: two digits followed by `05`.
pub const SELECTED_FRAME_PATTERN: &str = r"^(\d{2}05)_img\.jpg$";

/// Fragments eligible for re-detection when unreadable.
pub const REPAIRABLE_FRAGMENT_PATTERN: &str = r"^(\d+)_img\.json$";
