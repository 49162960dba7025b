pub mod distance;
pub mod font_resolver;
pub mod frame_annotator;
