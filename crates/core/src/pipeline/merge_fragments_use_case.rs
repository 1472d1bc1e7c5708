use std::path::{Path, PathBuf};

use crate::dataset::domain::dataset_error::DatasetError;
use crate::dataset::domain::frame_pattern::FramePattern;
use crate::dataset::infrastructure::dataset_layout::{list_entries, DatasetLayout, EntryKind};
use crate::detection::domain::detection_record::DetectionRecord;
use crate::detection::domain::face_detector::{DetectorFactory, FaceDetector};
use crate::output::domain::shard::{CameraResults, ObjectResult, Shard, ShardKind};
use crate::output::infrastructure::json_store::{read_fragment, write_shard, FragmentError};
use crate::pipeline::batch_error::BatchError;
use crate::pipeline::batch_logger::{timed, BatchLogger, BufferedBatchLogger};
use crate::pipeline::detect_image::detect_image;
use crate::pipeline::infrastructure::threaded_chunk_executor::{
    ProgressTicker, ThreadedChunkExecutor,
};
use crate::shared::partition::PodAssignment;

pub struct MergeConfig {
    /// Tree of `<object>/<camera>/<fragment>.json` files.
    pub fragments_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pod: PodAssignment,
    /// In-process workers sharing this pod's objects.
    pub workers: usize,
}

/// Where to re-detect faces when a fragment cannot be read.
pub struct RepairSource {
    pub layout: DatasetLayout,
    pub factory: Box<dyn DetectorFactory>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeSummary {
    pub shard_path: PathBuf,
    pub objects: usize,
    pub fragments: usize,
    pub repaired: usize,
}

#[derive(Default)]
struct WorkerOutput {
    shard: Shard,
    fragments: usize,
    repaired: usize,
    /// Decode and detect timings of repaired fragments.
    timings: BufferedBatchLogger,
}

/// Re-assembles per-image fragments into one `data_part_<pod>.json` shard.
pub struct MergeFragmentsUseCase {
    repair: Option<RepairSource>,
    logger: Box<dyn BatchLogger>,
    repairable: FramePattern,
}

impl MergeFragmentsUseCase {
    pub fn new(repair: Option<RepairSource>, logger: Box<dyn BatchLogger>) -> Self {
        Self {
            repair,
            logger,
            repairable: FramePattern::repairable_fragments(),
        }
    }

    pub fn execute(&mut self, config: &MergeConfig) -> Result<MergeSummary, BatchError> {
        let objects = list_entries(&config.fragments_dir, EntryKind::Dir)?;
        if objects.is_empty() {
            return Err(DatasetError::EmptyRoot(config.fragments_dir.clone()).into());
        }
        let assigned = config.pod.slice(&objects);
        let executor = ThreadedChunkExecutor::new(config.workers);

        self.logger.info(&format!(
            "Pod {}/{}: merging {} of {} objects with {} workers",
            config.pod.index(),
            config.pod.count(),
            assigned.len(),
            objects.len(),
            executor.workers()
        ));

        let repair = self.repair.as_ref();
        let repairable = &self.repairable;
        let fragments_dir = config.fragments_dir.as_path();
        let logger = &mut self.logger;

        let outputs = executor.execute(
            assigned,
            |done, total| logger.progress(done, total),
            |worker, chunk, ticker| {
                let out = merge_objects(fragments_dir, chunk, repair, repairable, ticker)?;
                log::debug!("Worker {worker} merged {} fragments", out.fragments);
                Ok(out)
            },
        )?;

        let mut shard = Shard::new();
        let mut fragments = 0;
        let mut repaired = 0;
        for out in outputs {
            shard.extend(out.shard);
            fragments += out.fragments;
            repaired += out.repaired;
            out.timings.replay_into(&mut *self.logger);
        }

        let shard_path = timed(&mut *self.logger, "write", || {
            write_shard(&config.output_dir, ShardKind::Data, config.pod.index(), &shard)
        })?;
        if repaired > 0 {
            log::warn!("Repaired {repaired} unreadable fragments");
        }
        self.logger.info(&format!("Saved {}", shard_path.display()));
        self.logger.summary();

        Ok(MergeSummary {
            shard_path,
            objects: shard.len(),
            fragments,
            repaired,
        })
    }
}

fn merge_objects(
    fragments_dir: &Path,
    objects: &[String],
    repair: Option<&RepairSource>,
    repairable: &FramePattern,
    ticker: &ProgressTicker<'_, WorkerOutput>,
) -> Result<WorkerOutput, BatchError> {
    let mut out = WorkerOutput::default();
    let mut detector: Option<Box<dyn FaceDetector>> = None;

    for object in objects {
        let object_dir = fragments_dir.join(object);
        let mut result = ObjectResult::new();
        for camera in list_entries(&object_dir, EntryKind::Dir)? {
            let camera_dir = object_dir.join(&camera);
            let mut records = CameraResults::new();
            for file in list_entries(&camera_dir, EntryKind::File)? {
                let record = match read_fragment(&camera_dir.join(&file)) {
                    Ok(record) => record,
                    Err(e) => {
                        let record = repair_fragment(
                            e,
                            object,
                            &camera,
                            &file,
                            repair,
                            repairable,
                            &mut detector,
                            &mut out.timings,
                        )?;
                        out.repaired += 1;
                        record
                    }
                };
                records.insert(file, record);
                out.fragments += 1;
            }
            result.insert(camera, records);
        }
        out.shard.insert_object(object.clone(), result);
        ticker.tick();
    }
    Ok(out)
}

/// Re-runs detection on the source image of an unreadable fragment.
///
/// Only `<digits>_img.json` fragments can be traced back to
/// `<digits>_img.jpg`; anything else, or no repair source, returns the
/// underlying read error.
#[allow(clippy::too_many_arguments)]
fn repair_fragment(
    error: FragmentError,
    object: &str,
    camera: &str,
    file: &str,
    repair: Option<&RepairSource>,
    repairable: &FramePattern,
    detector: &mut Option<Box<dyn FaceDetector>>,
    logger: &mut dyn BatchLogger,
) -> Result<DetectionRecord, BatchError> {
    let (Some(source), Some(digits)) = (repair, repairable.frame_digits(file)) else {
        return Err(error.into());
    };

    let image_path = source
        .layout
        .image_path(object, camera, &format!("{digits}_img.jpg"));
    log::warn!("{error}; re-detecting from {}", image_path.display());

    let detector = match detector {
        Some(d) => d,
        None => detector.insert(
            source
                .factory
                .create()
                .map_err(|e| BatchError::DetectorInit(e.to_string()))?,
        ),
    };
    detect_image(&mut **detector, &image_path, logger)
}
