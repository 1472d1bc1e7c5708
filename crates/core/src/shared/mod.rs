pub mod constants;
pub mod frame;
pub mod partition;
