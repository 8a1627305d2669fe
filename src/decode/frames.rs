use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use image::AnimationDecoder as _;
use image::codecs::gif::GifDecoder;

use crate::foundation::core::{
    DEFAULT_FRAME_DURATION_MS, Disposal, Frame, FrameRGBA, Sequence,
};
use crate::foundation::error::{GifkeyError, GifkeyResult};

/// Read and decode an animated GIF from disk.
///
/// Fails with [`GifkeyError::InputNotFound`] before touching the file contents when `path` does
/// not name an existing regular file.
pub fn read_gif(path: &Path) -> GifkeyResult<Sequence> {
    if !path.is_file() {
        return Err(GifkeyError::InputNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).with_context(|| format!("read input '{}'", path.display()))?;
    decode_gif(&bytes)
}

/// Decode every frame of an animated GIF into full-canvas straight-alpha RGBA8.
///
/// Frames are composited onto the logical screen by the decoder, so every frame has the canvas
/// dimensions. A GIF containing no image blocks decodes to an empty [`Sequence`].
pub fn decode_gif(bytes: &[u8]) -> GifkeyResult<Sequence> {
    let probe = probe_frames(bytes)?;
    let mut seq = Sequence::new(probe.width, probe.height);
    if probe.disposals.is_empty() {
        return Ok(seq);
    }

    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| GifkeyError::decode(format!("read gif header: {e}")))?;

    for (i, frame) in decoder.into_frames().enumerate() {
        let frame = frame.map_err(|e| GifkeyError::decode(format!("decode frame {i}: {e}")))?;
        let (numer, denom) = frame.delay().numer_denom_ms();
        let has_control = probe.has_control.get(i).copied().unwrap_or(false);
        let duration_ms = duration_from_delay(numer, denom, has_control);

        let rgba = frame.into_buffer();
        let (width, height) = rgba.dimensions();
        let image = FrameRGBA::new(width, height, rgba.into_raw())?;

        seq.push(Frame {
            image,
            duration_ms,
            disposal: probe.disposals.get(i).copied(),
        })?;
    }

    tracing::debug!(
        frames = seq.len(),
        width = seq.width(),
        height = seq.height(),
        "decoded gif"
    );
    Ok(seq)
}

/// Convert a decoder delay ratio to whole milliseconds.
///
/// Frames without a graphic control extension carry no delay at all and get
/// [`DEFAULT_FRAME_DURATION_MS`]; an explicit zero delay stays zero.
pub(crate) fn duration_from_delay(numer: u32, denom: u32, has_control: bool) -> u32 {
    if !has_control {
        return DEFAULT_FRAME_DURATION_MS;
    }
    numer.checked_div(denom).unwrap_or(0)
}

struct GifProbe {
    width: u32,
    height: u32,
    disposals: Vec<Disposal>,
    has_control: Vec<bool>,
}

// Walks the raw frame blocks for metadata the compositing decoder does not surface.
fn probe_frames(bytes: &[u8]) -> GifkeyResult<GifProbe> {
    let mut opts = ::gif::DecodeOptions::new();
    opts.set_color_output(::gif::ColorOutput::Indexed);
    let mut decoder = opts
        .read_info(Cursor::new(bytes))
        .map_err(|e| GifkeyError::decode(format!("read gif header: {e}")))?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());

    let mut disposals = Vec::new();
    while let Some(frame) = decoder
        .read_next_frame()
        .map_err(|e| GifkeyError::decode(format!("read frame {}: {e}", disposals.len())))?
    {
        disposals.push(disposal_from_gif(frame.dispose));
    }

    Ok(GifProbe {
        width,
        height,
        disposals,
        has_control: control_extension_flags(bytes)?,
    })
}

const EXTENSION_INTRODUCER: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;
const TRAILER: u8 = 0x3B;
const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;

/// For each image block, whether a graphic control extension preceded it.
///
/// The high-level gif decoder reports a zero delay both for an explicit `0` and for a frame with
/// no control block, so this walks the block framing directly. Sub-block payloads are skipped,
/// never decoded.
pub(crate) fn control_extension_flags(bytes: &[u8]) -> GifkeyResult<Vec<bool>> {
    let screen_flags = *bytes.get(10).ok_or_else(truncated)?;
    let mut pos = 13 + color_table_len(screen_flags);

    let mut flags = Vec::new();
    let mut pending_control = false;
    loop {
        match bytes.get(pos).copied() {
            Some(EXTENSION_INTRODUCER) => {
                let label = *bytes.get(pos + 1).ok_or_else(truncated)?;
                pending_control |= label == GRAPHIC_CONTROL_LABEL;
                pos = skip_sub_blocks(bytes, pos + 2)?;
            }
            Some(IMAGE_SEPARATOR) => {
                let packed = *bytes.get(pos + 9).ok_or_else(truncated)?;
                // Descriptor, local colour table, then the LZW minimum code size byte.
                pos += 10 + color_table_len(packed) + 1;
                pos = skip_sub_blocks(bytes, pos)?;
                flags.push(pending_control);
                pending_control = false;
            }
            Some(TRAILER) | None => break,
            Some(other) => {
                return Err(GifkeyError::decode(format!(
                    "unknown gif block 0x{other:02x} at offset {pos}"
                )));
            }
        }
    }
    Ok(flags)
}

fn color_table_len(packed: u8) -> usize {
    if packed & 0x80 == 0 {
        0
    } else {
        3 * (2usize << (packed & 0x07))
    }
}

fn skip_sub_blocks(bytes: &[u8], mut pos: usize) -> GifkeyResult<usize> {
    loop {
        let len = usize::from(*bytes.get(pos).ok_or_else(truncated)?);
        pos += 1;
        if len == 0 {
            return Ok(pos);
        }
        pos += len;
    }
}

fn truncated() -> GifkeyError {
    GifkeyError::decode("truncated gif block structure")
}

fn disposal_from_gif(method: ::gif::DisposalMethod) -> Disposal {
    match method {
        ::gif::DisposalMethod::Any => Disposal::Any,
        ::gif::DisposalMethod::Keep => Disposal::Keep,
        ::gif::DisposalMethod::Background => Disposal::Background,
        ::gif::DisposalMethod::Previous => Disposal::Previous,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/frames.rs"]
mod tests;
