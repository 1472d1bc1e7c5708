use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::domain::object_selection::select_by_range;
use crate::dataset::infrastructure::dataset_layout::DatasetLayout;
use crate::detection::domain::face_detector::FaceDetector;
use crate::output::infrastructure::json_store::{fragment_file_name, write_fragment};
use crate::pipeline::batch_error::BatchError;
use crate::pipeline::batch_logger::{timed, BatchLogger};
use crate::pipeline::detect_image::detect_image;

pub struct DetectConfig {
    pub root_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Object ids `start..end`; `None` processes every object.
    pub range: Option<(i64, i64)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectSummary {
    pub objects: usize,
    pub images: usize,
    pub faces: usize,
}

/// Per-image detection: one JSON fragment per image, mirroring the input
/// tree as `output/<object>/<camera>/<image stem>.json`.
pub struct DetectObjectsUseCase {
    detector: Box<dyn FaceDetector>,
    logger: Box<dyn BatchLogger>,
}

impl DetectObjectsUseCase {
    pub fn new(detector: Box<dyn FaceDetector>, logger: Box<dyn BatchLogger>) -> Self {
        Self { detector, logger }
    }

    pub fn execute(&mut self, config: &DetectConfig) -> Result<DetectSummary, BatchError> {
        let layout = DatasetLayout::new(&config.root_dir);
        let all_objects = layout.objects()?;
        let objects = match config.range {
            Some((start, end)) => select_by_range(&all_objects, start, end)?,
            None => all_objects,
        };

        self.logger.info(&format!(
            "Detecting faces for {} objects in {}, writing to {}",
            objects.len(),
            config.root_dir.display(),
            config.output_dir.display()
        ));

        let mut summary = DetectSummary::default();
        for (i, object) in objects.iter().enumerate() {
            log::debug!("Face detection for object {object}");
            self.detect_object(&layout, object, config, &mut summary)?;
            summary.objects += 1;
            self.logger.progress(i + 1, objects.len());
        }

        self.logger.summary();
        Ok(summary)
    }

    fn detect_object(
        &mut self,
        layout: &DatasetLayout,
        object: &str,
        config: &DetectConfig,
        summary: &mut DetectSummary,
    ) -> Result<(), BatchError> {
        for camera in layout.cameras(object)? {
            let camera_out = config.output_dir.join(object).join(&camera);
            let fragments = fragment_names(&camera_out, layout.images(object, &camera)?)?;
            fs::create_dir_all(&camera_out).map_err(|source| BatchError::OutputDir {
                path: camera_out.clone(),
                source,
            })?;

            for (fragment_name, image) in fragments {
                let path = layout.image_path(object, &camera, &image);
                let record = detect_image(&mut *self.detector, &path, &mut *self.logger)?;
                let fragment = camera_out.join(fragment_name);
                timed(&mut *self.logger, "write", || write_fragment(&fragment, &record))?;

                summary.images += 1;
                if !record.is_empty() {
                    summary.faces += 1;
                }
            }
        }
        Ok(())
    }
}

/// Maps each fragment name to its image. Fails if two images share a stem.
fn fragment_names(
    camera_out: &Path,
    images: Vec<String>,
) -> Result<BTreeMap<String, String>, BatchError> {
    let mut fragments: BTreeMap<String, String> = BTreeMap::new();
    for image in images {
        let fragment = fragment_file_name(&image);
        if let Some(first) = fragments.get(&fragment) {
            return Err(BatchError::FragmentCollision {
                camera_dir: camera_out.to_path_buf(),
                fragment,
                first: first.clone(),
                second: image,
            });
        }
        fragments.insert(fragment, image);
    }
    Ok(fragments)
}
