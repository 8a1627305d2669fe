use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GifkeyError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GifkeyError::decode("x").to_string().contains("decode error:"));
    assert!(GifkeyError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn named_conditions_render_console_diagnostics() {
    let err = GifkeyError::InputNotFound(PathBuf::from("missing.gif"));
    assert_eq!(err.to_string(), "Input file not found: missing.gif");
    assert_eq!(
        GifkeyError::EmptySequence.to_string(),
        "No frames loaded from GIF"
    );
}

#[test]
fn exit_codes_follow_cli_contract() {
    assert_eq!(GifkeyError::InputNotFound(PathBuf::from("x")).exit_code(), 2);
    assert_eq!(GifkeyError::EmptySequence.exit_code(), 3);
    assert_eq!(GifkeyError::validation("x").exit_code(), 1);
    assert_eq!(GifkeyError::decode("x").exit_code(), 1);
    assert_eq!(GifkeyError::encode("x").exit_code(), 1);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GifkeyError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.exit_code(), 1);
}
