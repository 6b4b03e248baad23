//! Decoded frame values

use image::RgbImage;
use ndarray::{Array3, ArrayView3};

use crate::error::{FrameXError, FrameXResult};
use crate::planner::FrameGeometry;

/// One decoded RGB24 frame, shape `(height, width, 3)`, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// 1-based position in the extraction sequence
    index: usize,
    pixels: Array3<u8>,
}

impl Frame {
    /// Reinterpret one raw chunk as a frame; `raw` must hold exactly one frame
    pub fn from_raw(index: usize, geometry: FrameGeometry, raw: Vec<u8>) -> FrameXResult<Self> {
        let len = raw.len();
        let pixels = Array3::from_shape_vec(geometry.shape(), raw).map_err(|e| {
            FrameXError::decode(
                format!(
                    "chunk of {} bytes does not fit a {}x{} RGB24 frame: {}",
                    len, geometry.width, geometry.height, e
                ),
                "",
            )
        })?;
        Ok(Self { index, pixels })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.pixels.shape()[1] as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.shape()[0] as u32
    }

    /// (height, width, channels)
    pub fn shape(&self) -> (usize, usize, usize) {
        self.pixels.dim()
    }

    pub fn pixels(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// Interleaved RGB bytes in row-major order
    pub fn as_raw(&self) -> &[u8] {
        self.pixels
            .as_slice()
            .expect("frame pixels are built from a flat Vec in standard layout")
    }

    /// RGB value of the pixel at column `x`, row `y`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let (row, col) = (y as usize, x as usize);
        if row >= self.pixels.shape()[0] || col >= self.pixels.shape()[1] {
            return None;
        }
        Some([
            self.pixels[[row, col, 0]],
            self.pixels[[row, col, 1]],
            self.pixels[[row, col, 2]],
        ])
    }

    /// Copy into an `image` buffer for consumers that take image values
    pub fn to_rgb_image(&self) -> RgbImage {
        let (width, height) = (self.width(), self.height());
        RgbImage::from_raw(width, height, self.as_raw().to_vec())
            .expect("frame buffer holds exactly width * height * 3 bytes")
    }
}

/// Ordered frames produced by one extraction call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Shape shared by every frame, `None` when empty
    pub fn shape(&self) -> Option<(usize, usize, usize)> {
        self.frames.first().map(Frame::shape)
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn into_images(self) -> Vec<RgbImage> {
        self.frames.iter().map(Frame::to_rgb_image).collect()
    }
}

impl IntoIterator for FrameSequence {
    type Item = Frame;
    type IntoIter = std::vec::IntoIter<Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
