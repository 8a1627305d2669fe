use std::collections::{BTreeSet, HashMap};

use crate::foundation::core::{FrameRGBA, TRANSPARENT_RGBA};

/// Palette slot reserved for fully transparent pixels in every encoded frame.
pub const TRANSPARENT_INDEX: u8 = 0;

const MAX_OPAQUE_COLORS: usize = 255;
const NEUQUANT_SAMPLE_FACTOR: i32 = 10;

/// A frame reduced to palette indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    /// RGB triples, at most 256 entries. Entry [`TRANSPARENT_INDEX`] is the transparent slot.
    pub palette: Vec<u8>,
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
}

impl IndexedFrame {
    /// Number of palette entries.
    pub fn palette_len(&self) -> usize {
        self.palette.len() / 3
    }

    /// RGB colour stored at palette index `i`.
    pub fn color(&self, i: u8) -> Option<[u8; 3]> {
        let i = usize::from(i) * 3;
        let c = self.palette.get(i..i + 3)?;
        Some([c[0], c[1], c[2]])
    }
}

/// Map `frame` onto a palette whose first entry is the transparent slot.
///
/// Pixels with zero alpha map to [`TRANSPARENT_INDEX`]; every other pixel is treated as opaque.
/// Frames with at most 255 distinct opaque colours get an exact, sorted palette. Larger colour
/// sets are reduced with NeuQuant.
pub fn index_frame(frame: &FrameRGBA) -> IndexedFrame {
    let mut colors = BTreeSet::new();
    for px in frame.data.chunks_exact(4) {
        if px[3] == 0 {
            continue;
        }
        colors.insert([px[0], px[1], px[2]]);
        if colors.len() > MAX_OPAQUE_COLORS {
            return index_quantized(frame);
        }
    }
    index_exact(frame, colors)
}

fn transparent_entry() -> [u8; 3] {
    [TRANSPARENT_RGBA[0], TRANSPARENT_RGBA[1], TRANSPARENT_RGBA[2]]
}

fn index_exact(frame: &FrameRGBA, colors: BTreeSet<[u8; 3]>) -> IndexedFrame {
    let mut palette = Vec::with_capacity((colors.len() + 1) * 3);
    palette.extend_from_slice(&transparent_entry());

    let mut lookup = HashMap::with_capacity(colors.len());
    for (slot, c) in (1u8..=u8::MAX).zip(colors) {
        palette.extend_from_slice(&c);
        lookup.insert(c, slot);
    }

    let indices = frame
        .data
        .chunks_exact(4)
        .map(|px| {
            if px[3] == 0 {
                return TRANSPARENT_INDEX;
            }
            lookup
                .get(&[px[0], px[1], px[2]])
                .copied()
                .unwrap_or(TRANSPARENT_INDEX)
        })
        .collect();

    IndexedFrame { palette, indices }
}

fn index_quantized(frame: &FrameRGBA) -> IndexedFrame {
    let opaque: Vec<u8> = frame
        .data
        .chunks_exact(4)
        .filter(|px| px[3] != 0)
        .flat_map(|px| [px[0], px[1], px[2], 0xFF])
        .collect();
    let nq = color_quant::NeuQuant::new(NEUQUANT_SAMPLE_FACTOR, MAX_OPAQUE_COLORS, &opaque);

    let mut palette = Vec::with_capacity((MAX_OPAQUE_COLORS + 1) * 3);
    palette.extend_from_slice(&transparent_entry());
    palette.extend_from_slice(&nq.color_map_rgb());

    let indices = frame
        .data
        .chunks_exact(4)
        .map(|px| {
            if px[3] == 0 {
                TRANSPARENT_INDEX
            } else {
                // NeuQuant indices are 0..255; shift past the transparent slot.
                (nq.index_of(&[px[0], px[1], px[2], 0xFF]) + 1) as u8
            }
        })
        .collect();

    IndexedFrame { palette, indices }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/palette.rs"]
mod tests;
