pub mod detection;
pub mod object_detector;
pub mod target;
