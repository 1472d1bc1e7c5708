//! Fixtures shared by the use case tests.

use std::fs;
use std::path::{Path, PathBuf};

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;

/// Reports one face whenever the top-left pixel is pure white.
pub struct WhitePixelDetector;

impl FaceDetector for WhitePixelDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
        if frame.data()[..3] == [255, 255, 255] {
            Ok(vec![DetectedFace::from_box_and_landmarks(
                [1.0, 2.0, 6.5, 7.9],
                [(2.0, 3.0), (5.0, 3.0), (3.5, 4.5), (2.5, 6.0), (4.5, 6.0)],
                0.97,
            )])
        } else {
            Ok(vec![])
        }
    }
}

/// Writes an 8×8 image under `root/<object>/images_lr/<camera>/<name>`.
pub fn write_image(root: &Path, object: &str, camera: &str, name: &str, face: bool) -> PathBuf {
    let dir = root.join(object).join("images_lr").join(camera);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let shade = if face { 255 } else { 40 };
    image::RgbImage::from_pixel(8, 8, image::Rgb([shade, shade, shade]))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}
