use std::path::PathBuf;

use crate::{
    decode::frames::read_gif,
    encode::gif::{GifSink, GifSinkOpts},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{ColorKey, Sequence},
    foundation::error::{GifkeyError, GifkeyResult},
    key::transform::{KeyStats, KeyThreading, key_sequence},
};

/// Options for [`remove_background`].
#[derive(Clone, Debug)]
pub struct KeyOpts {
    /// Animated GIF to read.
    pub input: PathBuf,
    /// Path the keyed GIF is written to.
    pub output: PathBuf,
    /// Background colour and tolerance.
    pub key: ColorKey,
    /// Frame-level threading controls.
    pub threading: KeyThreading,
}

impl KeyOpts {
    /// Options keying exact white from `input` into `output`, sequentially.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            key: ColorKey::default(),
            threading: KeyThreading::default(),
        }
    }
}

/// Summary of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyReport {
    /// Path that was written.
    pub output: PathBuf,
    /// Keying counters.
    pub stats: KeyStats,
    /// Per-frame durations written to the output, in milliseconds.
    pub durations_ms: Vec<u32>,
}

/// Read `opts.input`, key out the background colour in every frame and write `opts.output`.
///
/// Fails with [`GifkeyError::InputNotFound`] before decoding when the input does not exist, and
/// with [`GifkeyError::EmptySequence`] when it decodes to no frames. The output is written
/// exactly once, after every frame has been keyed and encoded.
#[tracing::instrument(skip(opts), fields(input = %opts.input.display(), output = %opts.output.display()))]
pub fn remove_background(opts: &KeyOpts) -> GifkeyResult<KeyReport> {
    let mut seq = read_gif(&opts.input)?;
    if seq.is_empty() {
        return Err(GifkeyError::EmptySequence);
    }

    let stats = key_sequence(&mut seq, &opts.key, &opts.threading)?;
    tracing::info!(
        frames = stats.frames,
        keyed = stats.pixels_keyed,
        total = stats.pixels_total,
        "keyed background"
    );

    let mut sink = GifSink::new(GifSinkOpts::new(&opts.output));
    write_sequence(&seq, &mut sink)?;

    Ok(KeyReport {
        output: opts.output.clone(),
        stats,
        durations_ms: seq.durations(),
    })
}

/// Stream every frame of `seq` into `sink` in presentation order.
pub fn write_sequence(seq: &Sequence, sink: &mut dyn FrameSink) -> GifkeyResult<()> {
    sink.begin(SinkConfig {
        width: seq.width(),
        height: seq.height(),
        frame_count: seq.len(),
    })?;
    for frame in seq.frames() {
        sink.push_frame(frame)?;
    }
    sink.end()
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
