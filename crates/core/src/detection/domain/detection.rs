/// Axis-aligned bounding box in pixel coordinates of the original frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// IoU (intersection over union) with another box.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.width() * self.height();
        let area_b = other.width() * other.height();
        inter / (area_a + area_b - inter)
    }
}

/// One recognized object in a single frame.
///
/// Produced fresh per frame by the detector; carries no identity across
/// frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    /// Annotation caption: class name plus confidence, e.g. `"car 0.87"`.
    pub fn caption(&self) -> String {
        format!("{} {:.2}", self.label, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn bbox(x1: f64, y1: f64, x2: f64, y2: f64) -> BoundingBox {
        BoundingBox { x1, y1, x2, y2 }
    }

    #[test]
    fn test_width_and_height() {
        let b = bbox(10.0, 20.0, 110.0, 70.0);
        assert_relative_eq!(b.width(), 100.0);
        assert_relative_eq!(b.height(), 50.0);
    }

    #[test]
    fn test_iou_identical_boxes() {
        let b = bbox(10.0, 10.0, 110.0, 110.0);
        assert_relative_eq!(b.iou(&b), 1.0);
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = bbox(0.0, 0.0, 50.0, 50.0);
        let b = bbox(100.0, 100.0, 150.0, 150.0);
        assert_relative_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_partial_overlap() {
        // a: [0,0]-[100,100], b: [50,0]-[150,100]
        // intersection: 50*100 = 5000, union: 10000 + 10000 - 5000 = 15000
        let a = bbox(0.0, 0.0, 100.0, 100.0);
        let b = bbox(50.0, 0.0, 150.0, 100.0);
        assert_relative_eq!(a.iou(&b), 5000.0 / 15000.0);
    }

    #[rstest]
    #[case::zero_width(bbox(0.0, 0.0, 0.0, 100.0))]
    #[case::touching_edges(bbox(50.0, 0.0, 100.0, 50.0))]
    fn test_iou_degenerate_is_zero(#[case] other: BoundingBox) {
        let a = bbox(0.0, 0.0, 50.0, 50.0);
        assert_relative_eq!(a.iou(&other), 0.0);
    }

    #[test]
    fn test_caption_format() {
        let det = Detection {
            label: "bottle".to_string(),
            confidence: 0.873,
            bbox: bbox(0.0, 0.0, 10.0, 10.0),
        };
        assert_eq!(det.caption(), "bottle 0.87");
    }
}
