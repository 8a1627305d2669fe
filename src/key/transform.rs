use rayon::prelude::*;

use crate::foundation::core::{ColorKey, FrameRGBA, Sequence, TRANSPARENT_RGBA};
use crate::foundation::error::{GifkeyError, GifkeyResult};

/// Key a single RGBA8 pixel.
///
/// Returns [`TRANSPARENT_RGBA`] when the pixel matches `key`, and the pixel unchanged otherwise.
#[inline]
pub fn key_pixel(px: [u8; 4], key: &ColorKey) -> [u8; 4] {
    if key.matches(px) { TRANSPARENT_RGBA } else { px }
}

/// Key every pixel of `frame` in place and return how many pixels changed.
///
/// Pixels that already equal [`TRANSPARENT_RGBA`] are left as they are and not counted.
pub fn key_frame_in_place(frame: &mut FrameRGBA, key: &ColorKey) -> usize {
    let mut keyed = 0usize;
    for px in frame.data.chunks_exact_mut(4) {
        let src = [px[0], px[1], px[2], px[3]];
        let out = key_pixel(src, key);
        if out != src {
            px.copy_from_slice(&out);
            keyed += 1;
        }
    }
    keyed
}

/// Produce a keyed copy of `frame` with identical dimensions.
pub fn key_frame(frame: &FrameRGBA, key: &ColorKey) -> FrameRGBA {
    let mut out = frame.clone();
    key_frame_in_place(&mut out, key);
    out
}

#[derive(Clone, Debug, Default)]
/// Threading controls for keying a whole sequence.
pub struct KeyThreading {
    /// Key frames on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count (parallel mode only).
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated keying counters.
pub struct KeyStats {
    /// Frames processed.
    pub frames: u64,
    /// Pixels inspected across all frames.
    pub pixels_total: u64,
    /// Pixels replaced with the transparent colour.
    pub pixels_keyed: u64,
}

/// Key every frame of `seq` independently.
///
/// Frame order, durations and disposal hints are left untouched. The parallel path produces the
/// same pixels as the sequential one.
pub fn key_sequence(
    seq: &mut Sequence,
    key: &ColorKey,
    threading: &KeyThreading,
) -> GifkeyResult<KeyStats> {
    let frames = seq.frames_mut();

    let keyed: Vec<(usize, usize)> = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            frames
                .par_iter_mut()
                .map(|f| {
                    (
                        f.image.pixel_count(),
                        key_frame_in_place(&mut f.image, key),
                    )
                })
                .collect()
        })
    } else {
        frames
            .iter_mut()
            .enumerate()
            .map(|(i, f)| {
                let n = key_frame_in_place(&mut f.image, key);
                tracing::trace!(frame = i, keyed = n, "keyed frame");
                (f.image.pixel_count(), n)
            })
            .collect()
    };

    let mut stats = KeyStats::default();
    for (total, n) in keyed {
        stats.frames += 1;
        stats.pixels_total += total as u64;
        stats.pixels_keyed += n as u64;
    }
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> GifkeyResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GifkeyError::validation(
            "keying 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| GifkeyError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/key/transform.rs"]
mod tests;
