pub mod detected_face;
pub mod detection_record;
pub mod face_detector;
