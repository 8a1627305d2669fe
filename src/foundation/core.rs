use std::str::FromStr;

use crate::foundation::error::{GifkeyError, GifkeyResult};

/// Pixel written in place of every keyed background pixel.
///
/// Colour channels are reset to white regardless of the original colour.
pub const TRANSPARENT_RGBA: [u8; 4] = [255, 255, 255, 0];

/// Display duration used when the decoder reports no (or a zero) delay for a frame.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// Background colour to key out, plus a per-channel tolerance.
///
/// Channels are plain integers and are not range checked: values outside `0..=255` are compared
/// with exact integer arithmetic against the 8-bit pixel channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorKey {
    /// Red component of the background colour.
    pub r: i32,
    /// Green component of the background colour.
    pub g: i32,
    /// Blue component of the background colour.
    pub b: i32,
    /// Maximum absolute difference allowed on each channel. Negative values never match.
    pub tolerance: i32,
}

impl ColorKey {
    /// Create a key for `rgb` with the given per-channel tolerance.
    pub fn new(rgb: [i32; 3], tolerance: i32) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            tolerance,
        }
    }

    /// Exact-match white key, the command-line default.
    pub fn white() -> Self {
        Self::new([255, 255, 255], 0)
    }

    /// Return a copy of this key with a different tolerance.
    pub fn with_tolerance(self, tolerance: i32) -> Self {
        Self { tolerance, ..self }
    }

    /// Key colour as an `[r, g, b]` triple.
    pub fn rgb(&self) -> [i32; 3] {
        [self.r, self.g, self.b]
    }

    /// Return `true` when `px` lies inside the tolerance cube around the key colour.
    ///
    /// Each channel is tested independently (`|c - k| <= tolerance`); alpha is ignored.
    pub fn matches(&self, px: [u8; 4]) -> bool {
        channel_within(px[0], self.r, self.tolerance)
            && channel_within(px[1], self.g, self.tolerance)
            && channel_within(px[2], self.b, self.tolerance)
    }
}

impl Default for ColorKey {
    fn default() -> Self {
        Self::white()
    }
}

fn channel_within(c: u8, k: i32, tolerance: i32) -> bool {
    let Ok(tol) = u64::try_from(tolerance) else {
        return false;
    };
    (i64::from(c) - i64::from(k)).unsigned_abs() <= tol
}

/// Parse an `R,G,B` triple such as `"255,255,255"`.
///
/// Exactly three comma-separated integers are required; whitespace around each part is ignored.
pub fn parse_rgb(s: &str) -> GifkeyResult<[i32; 3]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(GifkeyError::validation("color must be R,G,B"));
    }

    let mut rgb = [0i32; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part.trim().parse().map_err(|_| {
            GifkeyError::validation(format!("color must be R,G,B (bad component '{part}')"))
        })?;
    }
    Ok(rgb)
}

impl FromStr for ColorKey {
    type Err = GifkeyError;

    /// Parse an `R,G,B` key with zero tolerance.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(parse_rgb(s)?, 0))
    }
}

/// A decoded frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Wrap an RGBA8 buffer, checking that its length matches the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> GifkeyResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| GifkeyError::validation("frame dimensions overflow"))?;
        if data.len() != expected {
            return Err(GifkeyError::validation(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height} RGBA8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with a single RGBA colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(n),
        }
    }

    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// Read the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Frame disposal hint as reported by the decoder.
///
/// This is carried through the pipeline untouched; the encoder applies a fixed policy instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Disposal {
    /// No disposal specified.
    Any,
    /// Leave the frame in place.
    Keep,
    /// Clear the frame area to the background.
    Background,
    /// Restore the area to what it was before the frame was drawn.
    Previous,
}

/// One frame of an animated sequence with its timing metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Pixels of the frame.
    pub image: FrameRGBA,
    /// Display duration in milliseconds.
    pub duration_ms: u32,
    /// Disposal hint from the source, if the decoder exposed one.
    pub disposal: Option<Disposal>,
}

impl Frame {
    /// Create a frame with no disposal hint.
    pub fn new(image: FrameRGBA, duration_ms: u32) -> Self {
        Self {
            image,
            duration_ms,
            disposal: None,
        }
    }
}

/// Ordered frames of one animation, all sharing the same dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    width: u32,
    height: u32,
    frames: Vec<Frame>,
}

impl Sequence {
    /// Create an empty sequence with a fixed canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Append a frame in presentation order.
    pub fn push(&mut self, frame: Frame) -> GifkeyResult<()> {
        if frame.image.width != self.width || frame.image.height != self.height {
            return Err(GifkeyError::validation(format!(
                "frame {} is {}x{}, sequence is {}x{}",
                self.frames.len(),
                frame.image.width,
                frame.image.height,
                self.width,
                self.height
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Borrow the frames in presentation order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub(crate) fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    /// Per-frame display durations in milliseconds.
    pub fn durations(&self) -> Vec<u32> {
        self.frames.iter().map(|f| f.duration_ms).collect()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when the sequence has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
