use super::*;
use crate::portrait::processor::PortraitProcessor;

fn scenario_a() -> (CardCompositor, CanonicalArt) {
    let compositor =
        CardCompositor::new(CardSpec::new(874, 1240, 25, 0.65), StyleBook::builtin()).unwrap();
    let (w, h) = compositor.art_size();
    let art = PortraitProcessor::default().placeholder(w, h);
    (compositor, art)
}

fn tim_cheese(tier: &str) -> CharacterRecord {
    CharacterRecord::new("Tim Cheese", tier, 500, 10, "Standard")
}

#[test]
fn legendary_placeholder_card() {
    let (compositor, art) = scenario_a();
    let card = compositor.compose(&tim_cheese("Legendary"), &art).unwrap();

    assert_eq!((card.width(), card.height()), (874, 1240));
    assert!(card.placeholder_art);

    let style = StyleBook::builtin().resolve("Legendary").clone();
    // Outer frame, then background between frame and the art rule.
    assert_eq!(card.image.get_pixel(0, 0).0, style.accent.to_array());
    assert_eq!(card.image.get_pixel(14, 400).0, style.primary().to_array());
    assert_eq!(card.image.get_pixel(14, 1000).0, style.primary().to_array());
    // Art lands unscaled at the art rect origin.
    assert_eq!(card.image.get_pixel(30, 30), art.image.get_pixel(5, 5));
    assert_eq!(card.image.get_pixel(437, 425), art.image.get_pixel(412, 400));
}

#[test]
fn text_band_contains_readable_ink() {
    let (compositor, art) = scenario_a();
    let card = compositor.compose(&tim_cheese("Legendary"), &art).unwrap();
    let text = compositor.layout().text;

    // Orange is light enough for dark text.
    let ink = Rgba8::rgb(20, 20, 24).to_array();
    let inked = (text.y..text.bottom())
        .flat_map(|y| (text.x..text.right()).map(move |x| (x, y)))
        .filter(|&(x, y)| card.image.get_pixel(x, y).0 == ink)
        .count();
    assert!(inked > 1_000, "{inked}");
}

#[test]
fn compose_is_deterministic() {
    let (compositor, art) = scenario_a();
    let a = compositor.compose(&tim_cheese("OG"), &art).unwrap();
    let b = compositor.compose(&tim_cheese("OG"), &art).unwrap();
    assert_eq!(a.image.as_raw(), b.image.as_raw());
    assert_eq!(a.fingerprint(), b.fingerprint());

    let other = compositor.compose(&tim_cheese("Rare"), &art).unwrap();
    assert_ne!(a.fingerprint(), other.fingerprint());
}

#[test]
fn unknown_tier_renders_with_fallback_profile() {
    let (compositor, art) = scenario_a();
    let card = compositor.compose(&tim_cheese("Ultra Mega"), &art).unwrap();
    let fallback = compositor.styles().fallback();
    assert_eq!(card.image.get_pixel(14, 400).0, fallback.primary().to_array());
    assert_eq!((card.width(), card.height()), (874, 1240));
}

#[test]
fn gradient_runs_top_to_bottom() {
    let (compositor, art) = scenario_a();
    let card = compositor.compose(&tim_cheese("OG"), &art).unwrap();
    let top = card.image.get_pixel(14, 14).0;
    let bottom = card.image.get_pixel(14, 1225).0;
    assert_ne!(top, bottom);
    assert!(top[0] > 200, "{top:?}");
    assert!(bottom[2] > 180, "{bottom:?}");
}

#[test]
fn smaller_art_is_centered_inside_art_rect() {
    let (compositor, _) = scenario_a();
    let art = CanonicalArt {
        image: RgbaImage::from_pixel(10, 10, image::Rgba([0, 255, 0, 255])),
        is_placeholder: false,
    };
    let card = compositor.compose(&tim_cheese("Rare"), &art).unwrap();
    let art_rect = compositor.layout().art;
    let cx = art_rect.x + art_rect.width / 2;
    let cy = art_rect.y + art_rect.height / 2;
    assert_eq!(card.image.get_pixel(cx, cy).0, [0, 255, 0, 255]);
    assert!(!card.placeholder_art);
}

#[test]
fn text_that_cannot_fit_is_a_render_error() {
    let spec = CardSpec::new(56, 400, 20, 0.5);
    let compositor = CardCompositor::new(spec, StyleBook::builtin()).unwrap();
    let (w, h) = compositor.art_size();
    let art = PortraitProcessor::default().placeholder(w, h);
    let err = compositor.compose(&tim_cheese("Rare"), &art).unwrap_err();
    assert!(matches!(err, CardError::Render(_)));
    assert!(err.to_string().contains("Tim Cheese"), "{err}");
}

#[test]
fn compose_card_validates_spec() {
    let art = PortraitProcessor::default().placeholder(10, 10);
    let err = compose_card(
        &tim_cheese("Rare"),
        &art,
        &CardSpec::new(40, 40, 25, 0.5),
        &StyleBook::builtin(),
    )
    .unwrap_err();
    assert!(matches!(err, CardError::Validation(_)));
}
