pub mod coco_labels;
pub mod onnx_yolo_detector;
