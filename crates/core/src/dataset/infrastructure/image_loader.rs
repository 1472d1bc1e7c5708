use std::path::Path;

use crate::dataset::domain::dataset_error::DatasetError;
use crate::shared::frame::Frame;

/// Decodes an image file into an RGB [`Frame`].
///
/// The format is sniffed from the file contents, not the extension.
pub fn load_frame(path: &Path) -> Result<Frame, DatasetError> {
    let img = image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::from)
        .and_then(|reader| reader.decode())
        .map_err(|source| DatasetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Frame::from_rgb_image(img.to_rgb8()))
}
