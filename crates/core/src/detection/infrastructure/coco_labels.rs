/// The 80 COCO class names, indexed by YOLOv8 class id.
pub const COCO_LABELS: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// Class name for a YOLO class id, or `"unknown"` for out-of-range ids.
pub fn label_for(class_id: usize) -> &'static str {
    COCO_LABELS.get(class_id).copied().unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_eighty_classes() {
        assert_eq!(COCO_LABELS.len(), 80);
    }

    #[test]
    fn test_known_ids() {
        assert_eq!(label_for(0), "person");
        assert_eq!(label_for(39), "bottle");
        assert_eq!(label_for(79), "toothbrush");
    }

    #[test]
    fn test_out_of_range_id() {
        assert_eq!(label_for(80), "unknown");
    }

    #[test]
    fn test_no_duplicate_labels() {
        let unique: std::collections::HashSet<_> = COCO_LABELS.iter().collect();
        assert_eq!(unique.len(), COCO_LABELS.len());
    }
}
