//! Batch face detection over multi-camera image datasets.
//!
//! The crate walks `root/<object>/images_lr/<camera>/<image>` trees, runs a
//! face detector per image and persists the results either as one JSON
//! fragment per image or as per-pod shards. Pods split the object list by
//! contiguous range; see [`shared::partition`].

pub mod dataset;
pub mod detection;
pub mod output;
pub mod pipeline;
pub mod shared;
