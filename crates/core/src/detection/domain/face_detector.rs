use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::detection_record::DetectionRecord;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Returned faces are ordered by descending confidence. Implementations may
/// hold mutable inference state, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>>;
}

/// Builds a detector on the thread that will use it.
///
/// Merge workers each create their own detector lazily, so detectors are
/// never shared across threads.
pub trait DetectorFactory: Sync {
    fn create(&self) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>>;
}

impl<F> DetectorFactory for F
where
    F: Fn() -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> + Sync,
{
    fn create(&self) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
        self()
    }
}

/// Runs the detector and keeps only the top-ranked face.
pub fn first_face_record(
    detector: &mut dyn FaceDetector,
    frame: &Frame,
) -> Result<DetectionRecord, Box<dyn std::error::Error>> {
    let faces = detector.detect(frame)?;
    Ok(DetectionRecord::from_first_face(&faces))
}
