use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::palette::{TRANSPARENT_INDEX, index_frame};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Frame, Sequence};
use crate::foundation::error::{GifkeyError, GifkeyResult};

/// Options for [`GifSink`] output.
///
/// Looping, disposal and the transparent palette slot are fixed for the whole animation: the
/// output always loops forever, every frame is disposed to the background, and palette index
/// [`TRANSPARENT_INDEX`] is transparent in every frame. Per-frame disposal hints from the source
/// are not consulted. An existing file at `out_path` is replaced.
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Output GIF file path.
    pub out_path: PathBuf,
}

impl GifSinkOpts {
    /// Create options for writing a GIF to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
        }
    }
}

/// Sink that encodes frames into an in-memory GIF stream and writes the file once, in `end`.
///
/// Nothing touches the filesystem until every frame has been encoded, so a failure part way
/// through leaves no output behind.
pub struct GifSink {
    opts: GifSinkOpts,
    stream: Option<GifStream>,
    cfg: Option<SinkConfig>,
    frames_written: usize,
}

impl GifSink {
    /// Create a new sink writing to `opts.out_path`.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            stream: None,
            cfg: None,
            frames_written: 0,
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> GifkeyResult<()> {
        self.stream = Some(GifStream::new(cfg.width, cfg.height)?);
        self.cfg = Some(cfg);
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> GifkeyResult<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| GifkeyError::encode("gif sink not started"))?;
        stream.write_frame(frame)?;
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> GifkeyResult<()> {
        let stream = self
            .stream
            .take()
            .ok_or_else(|| GifkeyError::encode("gif sink not started"))?;
        if let Some(cfg) = self.cfg.take()
            && cfg.frame_count != self.frames_written
        {
            return Err(GifkeyError::encode(format!(
                "gif sink expected {} frames, got {}",
                cfg.frame_count, self.frames_written
            )));
        }

        let bytes = stream.finish()?;
        ensure_parent_dir(&self.opts.out_path)?;
        std::fs::write(&self.opts.out_path, &bytes)
            .with_context(|| format!("write gif '{}'", self.opts.out_path.display()))?;

        tracing::info!(
            path = %self.opts.out_path.display(),
            bytes = bytes.len(),
            frames = self.frames_written,
            "wrote gif"
        );
        Ok(())
    }
}

/// Encode a whole sequence into GIF bytes using the fixed output policy of [`GifSink`].
pub fn encode_gif(seq: &Sequence) -> GifkeyResult<Vec<u8>> {
    let mut stream = GifStream::new(seq.width(), seq.height())?;
    for frame in seq.frames() {
        stream.write_frame(frame)?;
    }
    stream.finish()
}

/// Convert a frame duration to a GIF delay in hundredths of a second (truncating).
pub fn delay_centis(duration_ms: u32) -> u16 {
    u16::try_from(duration_ms / 10).unwrap_or(u16::MAX)
}

/// Create the parent directory of `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> GifkeyResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

struct GifStream {
    encoder: ::gif::Encoder<Vec<u8>>,
    width: u16,
    height: u16,
}

impl GifStream {
    fn new(width: u32, height: u32) -> GifkeyResult<Self> {
        if width == 0 || height == 0 {
            return Err(GifkeyError::validation(
                "gif width/height must be non-zero",
            ));
        }
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(GifkeyError::validation(format!(
                "gif canvas {width}x{height} exceeds {}x{}",
                u16::MAX,
                u16::MAX
            )));
        };

        let mut encoder = ::gif::Encoder::new(Vec::new(), w, h, &[])
            .map_err(|e| GifkeyError::encode(format!("write gif header: {e}")))?;
        encoder
            .set_repeat(::gif::Repeat::Infinite)
            .map_err(|e| GifkeyError::encode(format!("write loop extension: {e}")))?;

        Ok(Self {
            encoder,
            width: w,
            height: h,
        })
    }

    fn write_frame(&mut self, frame: &Frame) -> GifkeyResult<()> {
        if frame.image.width != u32::from(self.width) || frame.image.height != u32::from(self.height)
        {
            return Err(GifkeyError::validation(format!(
                "frame is {}x{}, gif canvas is {}x{}",
                frame.image.width, frame.image.height, self.width, self.height
            )));
        }

        let indexed = index_frame(&frame.image);
        let out = ::gif::Frame {
            width: self.width,
            height: self.height,
            delay: delay_centis(frame.duration_ms),
            dispose: ::gif::DisposalMethod::Background,
            transparent: Some(TRANSPARENT_INDEX),
            palette: Some(indexed.palette),
            buffer: Cow::Owned(indexed.indices),
            ..::gif::Frame::default()
        };
        self.encoder
            .write_frame(&out)
            .map_err(|e| GifkeyError::encode(format!("write gif frame: {e}")))
    }

    fn finish(self) -> GifkeyResult<Vec<u8>> {
        self.encoder
            .into_inner()
            .map_err(|e| GifkeyError::encode(format!("finish gif stream: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
