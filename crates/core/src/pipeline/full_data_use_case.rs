use std::path::PathBuf;

use crate::dataset::domain::dataset_error::DatasetError;
use crate::dataset::domain::frame_pattern::FramePattern;
use crate::dataset::domain::object_selection::exclude_id_range;
use crate::dataset::infrastructure::dataset_layout::DatasetLayout;
use crate::detection::domain::face_detector::FaceDetector;
use crate::output::domain::shard::{CameraResults, ObjectResult, Shard, ShardKind};
use crate::output::infrastructure::json_store::write_shard;
use crate::pipeline::batch_error::BatchError;
use crate::pipeline::batch_logger::{timed, BatchLogger};
use crate::pipeline::detect_image::detect_image;
use crate::shared::partition::PodAssignment;

pub struct FullDataConfig {
    pub root_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pod: PodAssignment,
    /// Numeric object ids `lo..=hi` left out before partitioning.
    pub skip_range: Option<(i64, i64)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullDataSummary {
    pub shard_path: PathBuf,
    pub objects: usize,
    pub images: usize,
}

/// Sampled-frame detection for one pod, written as a single shard.
///
/// Results accumulate in memory and are written once at the end; a failure
/// part-way loses the pod's batch but never leaves a partial shard.
pub struct FullDataUseCase {
    detector: Box<dyn FaceDetector>,
    logger: Box<dyn BatchLogger>,
    pattern: FramePattern,
}

impl FullDataUseCase {
    pub fn new(detector: Box<dyn FaceDetector>, logger: Box<dyn BatchLogger>) -> Self {
        Self {
            detector,
            logger,
            pattern: FramePattern::selected_frames(),
        }
    }

    pub fn execute(&mut self, config: &FullDataConfig) -> Result<FullDataSummary, BatchError> {
        let layout = DatasetLayout::new(&config.root_dir);
        let mut objects = layout.objects()?;
        if let Some((lo, hi)) = config.skip_range {
            objects = exclude_id_range(objects, lo, hi);
        }
        if objects.is_empty() {
            return Err(DatasetError::NothingToProcess.into());
        }

        let assigned = config.pod.slice(&objects);
        self.logger.info(&format!(
            "Pod {}/{}: {} of {} objects from {}",
            config.pod.index(),
            config.pod.count(),
            assigned.len(),
            objects.len(),
            config.root_dir.display()
        ));

        let mut shard = Shard::new();
        for (i, object) in assigned.iter().enumerate() {
            log::debug!("Processing object {object}");
            let result = self.detect_object(&layout, object)?;
            shard.insert_object(object.clone(), result);
            self.logger.progress(i + 1, assigned.len());
        }

        let shard_path = timed(&mut *self.logger, "write", || {
            write_shard(
                &config.output_dir,
                ShardKind::FullData,
                config.pod.index(),
                &shard,
            )
        })?;
        self.logger.info(&format!("Saved {}", shard_path.display()));
        self.logger.summary();

        Ok(FullDataSummary {
            shard_path,
            objects: shard.len(),
            images: shard.record_count(),
        })
    }

    fn detect_object(
        &mut self,
        layout: &DatasetLayout,
        object: &str,
    ) -> Result<ObjectResult, BatchError> {
        let mut result = ObjectResult::new();
        for camera in layout.cameras(object)? {
            let selected: Vec<String> = layout
                .images(object, &camera)?
                .into_iter()
                .filter(|name| self.pattern.is_selected(name))
                .collect();
            log::debug!("{} images selected for camera {camera}", selected.len());

            let mut records = CameraResults::new();
            for image in selected {
                let path = layout.image_path(object, &camera, &image);
                let record = detect_image(&mut *self.detector, &path, &mut *self.logger)?;
                records.insert(image, record);
            }
            result.insert(camera, records);
        }
        Ok(result)
    }
}
