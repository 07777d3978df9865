use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::invalid_image("x")
            .to_string()
            .contains("invalid image:")
    );
    assert!(CardError::render("x").to_string().contains("render error:"));
    assert!(CardError::layout("x").to_string().contains("layout error:"));
    assert!(
        CardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CardError::io("x").to_string().contains("io error:"));
}

#[test]
fn kind_matches_variant() {
    assert_eq!(CardError::invalid_image("x").kind(), ErrorKind::InvalidImage);
    assert_eq!(CardError::render("x").kind(), ErrorKind::Render);
    assert_eq!(CardError::layout("x").kind(), ErrorKind::Layout);
    assert_eq!(CardError::validation("x").kind(), ErrorKind::Validation);
    assert_eq!(CardError::io("x").kind(), ErrorKind::Io);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}
