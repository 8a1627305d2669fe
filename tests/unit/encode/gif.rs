use std::io::Cursor;

use super::*;
use crate::foundation::core::{Disposal, FrameRGBA, TRANSPARENT_RGBA};

fn keyed_sequence() -> Sequence {
    let mut seq = Sequence::new(2, 2);
    let mut first = FrameRGBA::filled(2, 2, [200, 10, 10, 255]);
    first.data[0..4].copy_from_slice(&TRANSPARENT_RGBA);
    seq.push(Frame {
        image: first,
        duration_ms: 50,
        disposal: Some(Disposal::Keep),
    })
    .unwrap();
    seq.push(Frame {
        image: FrameRGBA::filled(2, 2, [0, 0, 255, 255]),
        duration_ms: 150,
        disposal: Some(Disposal::Previous),
    })
    .unwrap();
    seq
}

struct ReadBack {
    delays: Vec<u16>,
    disposals: Vec<::gif::DisposalMethod>,
    transparent: Vec<Option<u8>>,
    first_indices: Vec<u8>,
}

fn read_back(bytes: &[u8]) -> ReadBack {
    let mut opts = ::gif::DecodeOptions::new();
    opts.set_color_output(::gif::ColorOutput::Indexed);
    let mut decoder = opts.read_info(Cursor::new(bytes)).unwrap();
    let mut out = ReadBack {
        delays: Vec::new(),
        disposals: Vec::new(),
        transparent: Vec::new(),
        first_indices: Vec::new(),
    };
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        if out.delays.is_empty() {
            out.first_indices = frame.buffer.to_vec();
        }
        out.delays.push(frame.delay);
        out.disposals.push(frame.dispose);
        out.transparent.push(frame.transparent);
    }
    out
}

#[test]
fn encoded_stream_uses_fixed_policy() {
    let bytes = encode_gif(&keyed_sequence()).unwrap();
    let back = read_back(&bytes);

    assert_eq!(back.delays, vec![5, 15]);
    // Source hints (Keep, Previous) are not carried over.
    assert_eq!(
        back.disposals,
        vec![
            ::gif::DisposalMethod::Background,
            ::gif::DisposalMethod::Background
        ]
    );
    assert_eq!(back.transparent, vec![Some(0), Some(0)]);
    assert_eq!(back.first_indices[0], TRANSPARENT_INDEX);
    assert!(back.first_indices[1..].iter().all(|&i| i != 0));
}

#[test]
fn encoded_stream_loops_forever() {
    let bytes = encode_gif(&keyed_sequence()).unwrap();
    let needle = b"NETSCAPE2.0\x03\x01\x00\x00";
    assert!(bytes.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn delay_conversion_truncates_and_saturates() {
    assert_eq!(delay_centis(50), 5);
    assert_eq!(delay_centis(155), 15);
    assert_eq!(delay_centis(9), 0);
    assert_eq!(delay_centis(u32::MAX), u16::MAX);
}

#[test]
fn oversized_canvas_is_rejected() {
    let seq = Sequence::new(70_000, 1);
    assert!(matches!(
        encode_gif(&seq).unwrap_err(),
        GifkeyError::Validation(_)
    ));
    assert!(encode_gif(&Sequence::new(0, 4)).is_err());
}

#[test]
fn sink_writes_file_only_at_end() {
    let dir = PathBuf::from("target").join("gif_sink_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("out.gif");
    let _ = std::fs::remove_file(&out_path);

    let seq = keyed_sequence();
    let mut sink = GifSink::new(GifSinkOpts::new(&out_path));
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        frame_count: seq.len(),
    })
    .unwrap();
    for frame in seq.frames() {
        sink.push_frame(frame).unwrap();
        assert!(!out_path.exists());
    }
    sink.end().unwrap();

    let bytes = std::fs::read(&out_path).unwrap();
    assert_eq!(read_back(&bytes).delays, vec![5, 15]);
}

#[test]
fn sink_replaces_an_existing_file() {
    let dir = PathBuf::from("target").join("gif_sink_unit_replace");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("out.gif");
    std::fs::write(&out_path, b"stale").unwrap();

    let seq = keyed_sequence();
    let mut sink = GifSink::new(GifSinkOpts::new(&out_path));
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        frame_count: seq.len(),
    })
    .unwrap();
    for frame in seq.frames() {
        sink.push_frame(frame).unwrap();
    }
    // Still the old contents until the single write at the end.
    assert_eq!(std::fs::read(&out_path).unwrap(), b"stale");
    sink.end().unwrap();

    let bytes = std::fs::read(&out_path).unwrap();
    assert_eq!(read_back(&bytes).delays, vec![5, 15]);
}

#[test]
fn sink_failure_leaves_no_output() {
    let dir = PathBuf::from("target").join("gif_sink_unit_fail");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("out.gif");
    let _ = std::fs::remove_file(&out_path);

    let mut sink = GifSink::new(GifSinkOpts::new(&out_path));
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        frame_count: 1,
    })
    .unwrap();
    let wrong = Frame::new(FrameRGBA::filled(3, 3, [0, 0, 0, 255]), 100);
    assert!(sink.push_frame(&wrong).is_err());
    assert!(!out_path.exists());
}

#[test]
fn sink_rejects_short_sequences() {
    let out_path = PathBuf::from("target")
        .join("gif_sink_unit_short")
        .join("out.gif");
    let mut sink = GifSink::new(GifSinkOpts::new(&out_path));
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        frame_count: 2,
    })
    .unwrap();
    sink.push_frame(&keyed_sequence().frames()[0]).unwrap();
    assert!(sink.end().is_err());
    assert!(!out_path.exists());
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = GifSink::new(GifSinkOpts::new("target/never.gif"));
    let frame = Frame::new(FrameRGBA::filled(1, 1, [0; 4]), 10);
    assert!(sink.push_frame(&frame).is_err());
    assert!(sink.end().is_err());
}
