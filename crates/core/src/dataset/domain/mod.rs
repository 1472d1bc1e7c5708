pub mod dataset_error;
pub mod frame_pattern;
pub mod object_selection;
