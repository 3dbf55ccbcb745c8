//! Decoded video frames.

use serde::{Deserialize, Serialize};

/// Byte order of the three color channels in a packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    /// Blue, green, red. What ffmpeg `bgr24` and OpenCV produce.
    Bgr,
    /// Red, green, blue. What landmark detectors usually expect.
    Rgb,
}

/// The buffer length did not match `width * height * 3`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("frame buffer has {actual} bytes, expected {expected} for {width}x{height}x3")]
pub struct FrameSizeError {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub actual: usize,
}

/// One decoded frame: a packed 3-channel, 8-bit pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Zero-based position in the stream.
    pub index: u64,
    pub width: u32,
    pub height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    /// Wrap a packed buffer, checking its length against the dimensions.
    pub fn new(
        index: u64,
        width: u32,
        height: u32,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, FrameSizeError> {
        let expected = Self::byte_len(width, height);
        if data.len() != expected {
            return Err(FrameSizeError {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            index,
            width,
            height,
            order,
            data,
        })
    }

    /// Bytes needed for a `width x height` frame.
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * Self::CHANNELS
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)` in the frame's own channel order.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Reorder channels in place if needed. BGR and RGB differ only by
    /// swapping the first and third byte of each pixel.
    pub fn into_order(mut self, order: ChannelOrder) -> Self {
        if self.order != order {
            for px in self.data.chunks_exact_mut(Self::CHANNELS) {
                px.swap(0, 2);
            }
            self.order = order;
        }
        self
    }
}
