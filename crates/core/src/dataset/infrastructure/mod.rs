pub mod dataset_layout;
pub mod image_loader;
