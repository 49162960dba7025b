use image::{ImageBuffer, RgbImage};
use ndarray::ArrayView3;

/// A single camera frame: contiguous RGB bytes in row-major order.
///
/// Color conversion happens at the capture boundary; everything downstream
/// (detector, annotator, display) works on plain RGB.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: u64,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: u64) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Capture counter within the session, starting at 0.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// View as `[height, width, 3]` for detector preprocessing.
    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape((self.height as usize, self.width as usize, 3), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Run an in-place edit on the frame as an [`RgbImage`].
    ///
    /// The pixel buffer is moved into the image and back without copying.
    pub fn edit<F: FnOnce(&mut RgbImage)>(&mut self, f: F) {
        let mut img: RgbImage =
            ImageBuffer::from_raw(self.width, self.height, std::mem::take(&mut self.data))
                .expect("Frame data length must match dimensions");
        f(&mut img);
        self.data = img.into_raw();
    }

    /// Copy out as an [`RgbImage`], e.g. for writing a snapshot to disk.
    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::from_raw(self.width, self.height, self.data.clone())
            .expect("Frame data length must match dimensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2 RGB
        let frame = Frame::new(data.clone(), 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2 RGB
        Frame::new(data, 2, 2, 0);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGB: set pixel (row=1, col=0) to red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let frame = Frame::new(data, 2, 2, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_edit_mutates_in_place() {
        let mut frame = Frame::new(vec![0u8; 12], 2, 2, 0);
        frame.edit(|img| {
            img.put_pixel(1, 1, image::Rgb([9, 8, 7]));
        });
        assert_eq!(&frame.data()[9..12], &[9, 8, 7]);
        assert_eq!(frame.data().len(), 12);
    }

    #[test]
    fn test_to_rgb_image_is_a_copy() {
        let frame = Frame::new(vec![3u8; 12], 2, 2, 0);
        let img = frame.to_rgb_image();
        assert_eq!(img.get_pixel(0, 0).0, [3, 3, 3]);
        assert_eq!(frame.data()[0], 3);
    }
}
