use crate::foundation::error::{AtlasmendError, AtlasmendResult};

/// Channel index carrying opacity. Channels 0..=2 are RGB; anything past
/// index 3 is carried through untouched.
pub const ALPHA_CHANNEL: usize = 3;

/// Row-major 8-bit raster with an RGBA-compatible channel layout.
///
/// The buffer invariant (`data.len() == width * height * channels`,
/// `channels >= 4`) is enforced at construction, so pixel accessors can
/// index without re-validating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster of the given shape.
    pub fn new(width: u32, height: u32, channels: u32) -> AtlasmendResult<Self> {
        let len = buffer_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0u8; len],
        })
    }

    /// Wraps an existing pixel buffer, validating its shape.
    pub fn from_parts(
        width: u32,
        height: u32,
        channels: u32,
        data: Vec<u8>,
    ) -> AtlasmendResult<Self> {
        let len = buffer_len(width, height, channels)?;
        if data.len() != len {
            return Err(AtlasmendError::validation(format!(
                "raster buffer length {} does not match {}x{}x{}",
                data.len(),
                width,
                height,
                channels
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Fully transparent raster with this raster's shape.
    pub fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: vec![0u8; self.data.len()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let at = self.offset(x, y);
        &self.data[at..at + self.channels as usize]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let at = self.offset(x, y);
        let c = self.channels as usize;
        &mut self.data[at..at + c]
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.data[self.offset(x, y) + ALPHA_CHANNEL]
    }

    /// Zeroes every channel of one pixel.
    pub fn clear_pixel(&mut self, x: u32, y: u32) {
        self.pixel_mut(x, y).fill(0);
    }

    /// Copies one pixel verbatim from `src`. Shapes must share a channel
    /// count; coordinates are caller-validated.
    pub fn copy_pixel_from(&mut self, src: &Raster, sx: u32, sy: u32, dx: u32, dy: u32) {
        debug_assert_eq!(self.channels, src.channels);
        let from = src.offset(sx, sy);
        let to = self.offset(dx, dy);
        let c = self.channels as usize;
        self.data[to..to + c].copy_from_slice(&src.data[from..from + c]);
    }
}

fn buffer_len(width: u32, height: u32, channels: u32) -> AtlasmendResult<usize> {
    if width == 0 || height == 0 {
        return Err(AtlasmendError::validation(
            "raster width/height must be > 0",
        ));
    }
    if channels < 4 {
        return Err(AtlasmendError::validation(format!(
            "raster must carry at least 4 channels (rgba), got {channels}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels as usize))
        .ok_or_else(|| AtlasmendError::validation("raster buffer size overflow"))
}
