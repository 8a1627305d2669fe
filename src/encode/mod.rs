//! Encoding sinks.
//!
//! Sinks consume keyed frames in presentation order.

/// Animated GIF output.
pub mod gif;
/// Palette construction with a reserved transparent slot.
pub mod palette;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
