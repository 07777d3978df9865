use super::*;

const SIZES: [u32; 9] = [1, 3, 17, 100, 333, 640, 874, 1240, 4096];

#[test]
fn fit_cover_stays_inside_source_and_matches_aspect() {
    for &sw in &SIZES {
        for &sh in &SIZES {
            for &(tw, th) in &[(874u32, 806u32), (100, 100), (16, 9), (9, 16), (1, 7)] {
                let r = fit_cover(sw, sh, tw, th);
                assert!(r.width >= 1 && r.height >= 1, "{sw}x{sh}->{tw}x{th}: {r:?}");
                assert!(r.right() <= sw, "{sw}x{sh}->{tw}x{th}: {r:?}");
                assert!(r.bottom() <= sh, "{sw}x{sh}->{tw}x{th}: {r:?}");

                // One axis is kept whole; the other is within half a pixel of the exact
                // aspect-matching length (unless clamped to the 1px minimum).
                let target_aspect = f64::from(tw) / f64::from(th);
                if r.width == sw && r.height == sh {
                    continue;
                }
                if r.height == sh {
                    let ideal = f64::from(sh) * target_aspect;
                    assert!(
                        (f64::from(r.width) - ideal).abs() <= 0.5 + 1e-9 || r.width == 1,
                        "{sw}x{sh}->{tw}x{th}: {r:?}"
                    );
                } else {
                    assert_eq!(r.width, sw);
                    let ideal = f64::from(sw) / target_aspect;
                    assert!(
                        (f64::from(r.height) - ideal).abs() <= 0.5 + 1e-9 || r.height == 1,
                        "{sw}x{sh}->{tw}x{th}: {r:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn fit_cover_is_centered() {
    let wide = fit_cover(1000, 500, 100, 100);
    assert_eq!(wide, PixelRect::new(250, 0, 500, 500));

    let tall = fit_cover(300, 900, 3, 2);
    assert_eq!(tall, PixelRect::new(0, 350, 300, 200));
}

#[test]
fn fit_cover_returns_full_source_for_equal_aspect() {
    assert_eq!(fit_cover(874, 806, 874, 806), PixelRect::sized(874, 806));
    assert_eq!(fit_cover(437, 403, 874, 806), PixelRect::sized(437, 403));
    assert_eq!(fit_cover(20, 10, 2000, 1000), PixelRect::sized(20, 10));
}

#[test]
fn fit_cover_allows_sources_smaller_than_target() {
    let r = fit_cover(40, 10, 800, 800);
    assert_eq!(r, PixelRect::new(15, 0, 10, 10));
}

#[test]
fn fit_cover_degenerate_target_keeps_source() {
    assert_eq!(fit_cover(10, 20, 0, 5), PixelRect::sized(10, 20));
}

#[test]
fn proportional_region_top_and_bottom() {
    let top = proportional_region(874, 1240, 0.65, Anchor::Top);
    assert_eq!(top.region, PixelRect::new(0, 0, 874, 806));
    assert_eq!(top.remainder, PixelRect::new(0, 806, 874, 434));

    let bottom = proportional_region(874, 1240, 0.65, Anchor::Bottom);
    assert_eq!(bottom.region, PixelRect::new(0, 434, 874, 806));
    assert_eq!(bottom.remainder, PixelRect::new(0, 0, 874, 434));
}

#[test]
fn proportional_region_clamps_ratio() {
    let split = proportional_region(10, 10, 1.5, Anchor::Top);
    assert_eq!(split.region.height, 10);
    assert!(split.remainder.is_empty());

    let split = proportional_region(10, 10, f64::NAN, Anchor::Top);
    assert_eq!(split.region.height, 0);
    assert_eq!(split.remainder.height, 10);
}

#[test]
fn scale_factors() {
    assert_eq!(cover_scale(100, 50, 200, 200), 4.0);
    assert_eq!(contain_scale(100, 50, 200, 200), 2.0);
    assert_eq!(cover_scale(0, 50, 200, 200), 0.0);
}

#[test]
fn centering_helpers() {
    let container = PixelRect::new(10, 20, 100, 50);
    assert_eq!(centered_origin(container, 80, 30), (20, 30));
    assert_eq!(centered_origin(container, 120, 50), (0, 20));
    assert_eq!(center_in(container, 80, 30), PixelRect::new(20, 30, 80, 30));
    assert_eq!(center_in(container, 120, 30), PixelRect::new(10, 30, 120, 30));
}

#[test]
fn rect_helpers() {
    let r = PixelRect::new(10, 10, 20, 20);
    assert_eq!(r.inset(5), PixelRect::new(15, 15, 10, 10));
    assert!(r.inset(15).is_empty());
    assert_eq!(r.outset(15), PixelRect::new(0, 0, 45, 45));
    assert!(r.contains(10, 29));
    assert!(!r.contains(30, 10));
    assert!(r.intersects(PixelRect::new(29, 29, 5, 5)));
    assert!(!r.intersects(PixelRect::new(30, 0, 5, 50)));
    assert_eq!(r.area(), 400);
}
