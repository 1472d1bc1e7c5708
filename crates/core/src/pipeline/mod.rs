pub mod batch_error;
pub mod batch_logger;
pub mod detect_image;
pub mod detect_objects_use_case;
pub mod full_data_use_case;
pub mod infrastructure;
pub mod merge_fragments_use_case;

#[cfg(test)]
pub(crate) mod test_support;
