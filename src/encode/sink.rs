use crate::foundation::core::Frame;
use crate::foundation::error::GifkeyResult;

/// Configuration provided to a [`FrameSink`] before any frame is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: usize,
}

/// Sink contract for consuming keyed frames in presentation order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> GifkeyResult<()>;
    /// Push one frame, in presentation order.
    fn push_frame(&mut self, frame: &Frame) -> GifkeyResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> GifkeyResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<Frame>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Return `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GifkeyResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> GifkeyResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> GifkeyResult<()> {
        self.finished = true;
        Ok(())
    }
}
