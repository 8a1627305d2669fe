//! gifkey turns a solid background colour in an animated GIF into transparency.
//!
//! The library is a short linear pipeline:
//!
//! 1. **Decode**: GIF bytes -> [`Sequence`] of full-canvas RGBA8 [`Frame`]s with durations
//! 2. **Key**: every pixel inside the [`ColorKey`] tolerance cube becomes `(255, 255, 255, 0)`
//! 3. **Encode**: the keyed frames stream into a [`FrameSink`]; [`GifSink`] writes one looping
//!    GIF with background disposal and palette index 0 as the shared transparent slot
//!
//! [`remove_background`] runs all three stages for a pair of paths.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod decode;
mod foundation;
mod key;
mod pipeline;

/// Encoding sinks.
pub mod encode;
/// `tracing` subscriber setup for the command-line tool.
pub mod logging;

pub use crate::decode::frames::{decode_gif, read_gif};
pub use crate::encode::gif::{GifSink, GifSinkOpts, delay_centis, encode_gif, ensure_parent_dir};
pub use crate::encode::palette::{IndexedFrame, TRANSPARENT_INDEX, index_frame};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::foundation::core::{
    ColorKey, DEFAULT_FRAME_DURATION_MS, Disposal, Frame, FrameRGBA, Sequence, TRANSPARENT_RGBA,
    parse_rgb,
};
pub use crate::foundation::error::{GifkeyError, GifkeyResult};
pub use crate::key::transform::{
    KeyStats, KeyThreading, key_frame, key_frame_in_place, key_pixel, key_sequence,
};
pub use crate::pipeline::{KeyOpts, KeyReport, remove_background, write_sequence};
