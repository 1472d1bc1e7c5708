use std::path::Path;

use crate::dataset::infrastructure::image_loader::load_frame;
use crate::detection::domain::detection_record::DetectionRecord;
use crate::detection::domain::face_detector::{first_face_record, FaceDetector};
use crate::pipeline::batch_error::BatchError;
use crate::pipeline::batch_logger::{timed, BatchLogger};

/// Decode → detect for one image, timing both stages.
pub fn detect_image(
    detector: &mut dyn FaceDetector,
    path: &Path,
    logger: &mut dyn BatchLogger,
) -> Result<DetectionRecord, BatchError> {
    let frame = timed(logger, "decode", || load_frame(path))?;
    let record = timed(logger, "detect", || first_face_record(detector, &frame)).map_err(|e| {
        BatchError::Detection {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    logger.image_done();
    Ok(record)
}
