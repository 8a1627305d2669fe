use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Frame, FrameRGBA};

#[test]
fn write_sequence_drives_sink_in_order() {
    let mut seq = Sequence::new(1, 1);
    for ms in [30, 60, 90] {
        seq.push(Frame::new(FrameRGBA::filled(1, 1, [1, 2, 3, 255]), ms))
            .unwrap();
    }

    let mut sink = InMemorySink::new();
    write_sequence(&seq, &mut sink).unwrap();

    assert!(sink.is_finished());
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 1,
            height: 1,
            frame_count: 3,
        })
    );
    let durations: Vec<u32> = sink.frames().iter().map(|f| f.duration_ms).collect();
    assert_eq!(durations, vec![30, 60, 90]);
}

#[test]
fn missing_input_fails_before_writing() {
    let out = PathBuf::from("target")
        .join("pipeline_unit_missing")
        .join("out.gif");
    let _ = std::fs::remove_file(&out);

    let opts = KeyOpts::new("target/pipeline_unit_missing/nope.gif", &out);
    let err = remove_background(&opts).unwrap_err();
    assert!(matches!(err, GifkeyError::InputNotFound(_)));
    assert!(!out.exists());
}

#[test]
fn default_opts_key_exact_white_sequentially() {
    let opts = KeyOpts::new("in.gif", "out.gif");
    assert_eq!(opts.key, ColorKey::white());
    assert!(!opts.threading.parallel);
    assert_eq!(opts.threading.threads, None);
}
