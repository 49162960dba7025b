pub mod camera_source;
