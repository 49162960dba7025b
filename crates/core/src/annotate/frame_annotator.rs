use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::detection::domain::detection::Detection;
use crate::shared::frame::Frame;

use super::distance::Distance;

/// Annotation color for boxes and text.
pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

const BOX_THICKNESS: i32 = 2;
const TEXT_SCALE: f32 = 16.0;
const TEXT_MARGIN: i32 = 4;

/// Draws matched detections onto frames: a hollow rectangle at the box, the
/// class/confidence caption above it, and the distance line below it.
///
/// Without a font, boxes still draw and text is skipped.
pub struct FrameAnnotator {
    font: Option<FontVec>,
}

impl FrameAnnotator {
    pub fn new(font: Option<FontVec>) -> Self {
        Self { font }
    }

    /// Annotate one matched detection in place. Exactly one annotated frame
    /// results per call; the box is clamped to the frame bounds.
    pub fn annotate(&self, frame: &mut Frame, detection: &Detection, distance: &Distance) {
        let caption = detection.caption();
        let distance_line = format!("Distance: {distance}");
        let bbox = detection.bbox;
        let font = self.font.as_ref();

        frame.edit(|img| {
            let (w, h) = (img.width() as i32, img.height() as i32);
            let x1 = (bbox.x1 as i32).clamp(0, w - 1);
            let y1 = (bbox.y1 as i32).clamp(0, h - 1);
            let x2 = (bbox.x2 as i32).clamp(0, w - 1);
            let y2 = (bbox.y2 as i32).clamp(0, h - 1);

            draw_thick_rect(img, x1, y1, x2, y2);

            if let Some(font) = font {
                let scale = PxScale::from(TEXT_SCALE);
                let text_h = TEXT_SCALE as i32;
                // Caption above the box, or inside it at the top edge
                let caption_y = (y1 - text_h - TEXT_MARGIN).max(0);
                draw_text_mut(img, BOX_COLOR, x1, caption_y, scale, font, &caption);
                // Distance below the box, or clamped to the bottom edge
                let distance_y = (y2 + TEXT_MARGIN).min(h - text_h).max(0);
                draw_text_mut(img, BOX_COLOR, x1, distance_y, scale, font, &distance_line);
            }
        });
    }
}

fn draw_thick_rect(img: &mut RgbImage, x1: i32, y1: i32, x2: i32, y2: i32) {
    for i in 0..BOX_THICKNESS {
        let bw = (x2 - x1) - 2 * i;
        let bh = (y2 - y1) - 2 * i;
        if bw <= 0 || bh <= 0 {
            break;
        }
        let rect = Rect::at(x1 + i, y1 + i).of_size(bw as u32, bh as u32);
        draw_hollow_rect_mut(img, rect, BOX_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::BoundingBox;

    fn det(x1: f64, y1: f64, x2: f64, y2: f64) -> Detection {
        Detection {
            label: "car".to_string(),
            confidence: 0.9,
            bbox: BoundingBox { x1, y1, x2, y2 },
        }
    }

    fn black_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![0u8; (w * h * 3) as usize], w, h, 0)
    }

    fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * frame.width() + x) * 3) as usize;
        let d = frame.data();
        [d[i], d[i + 1], d[i + 2]]
    }

    #[test]
    fn test_box_edges_are_painted() {
        let annotator = FrameAnnotator::new(None);
        let mut frame = black_frame(64, 64);
        annotator.annotate(&mut frame, &det(10.0, 10.0, 40.0, 40.0), &Distance::Unknown);

        // Top-left corner of the box is green
        assert_eq!(pixel(&frame, 10, 10), [0, 255, 0]);
        // Second ring too (2 px thickness)
        assert_eq!(pixel(&frame, 11, 11), [0, 255, 0]);
        // Box interior stays black
        assert_eq!(pixel(&frame, 25, 25), [0, 0, 0]);
    }

    #[test]
    fn test_pixels_outside_box_untouched() {
        let annotator = FrameAnnotator::new(None);
        let mut frame = black_frame(64, 64);
        annotator.annotate(&mut frame, &det(10.0, 10.0, 40.0, 40.0), &Distance::Meters(1.0));

        assert_eq!(pixel(&frame, 50, 50), [0, 0, 0]);
        assert_eq!(pixel(&frame, 0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_box_clamped_to_frame_bounds() {
        let annotator = FrameAnnotator::new(None);
        let mut frame = black_frame(32, 32);
        // Box extends past every edge; must not panic
        annotator.annotate(
            &mut frame,
            &det(-10.0, -10.0, 100.0, 100.0),
            &Distance::Meters(0.5),
        );
        assert_eq!(pixel(&frame, 0, 0), [0, 255, 0]);
    }

    #[test]
    fn test_degenerate_box_does_not_panic() {
        let annotator = FrameAnnotator::new(None);
        let mut frame = black_frame(32, 32);
        annotator.annotate(&mut frame, &det(5.0, 5.0, 5.0, 5.0), &Distance::Unknown);
    }

    #[test]
    fn test_text_drawn_when_font_available() {
        let Some(font) = crate::annotate::font_resolver::resolve_font() else {
            return; // host has no system fonts; box-only path covered above
        };
        let annotator = FrameAnnotator::new(Some(font));
        let mut frame = black_frame(128, 128);
        annotator.annotate(&mut frame, &det(20.0, 40.0, 100.0, 100.0), &Distance::Meters(1.0));

        // Some pixel in the caption band above the box is painted
        let band_touched = (0..40u32)
            .flat_map(|y| (20..100u32).map(move |x| (x, y)))
            .any(|(x, y)| pixel(&frame, x, y) != [0, 0, 0]);
        assert!(band_touched);
    }
}
