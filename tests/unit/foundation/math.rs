use super::*;

#[test]
fn fnv_hash_is_split_invariant() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"cardpress");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"card");
    b.write_bytes(b"press");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp_u8(10, 200, 0.0), 10);
    assert_eq!(lerp_u8(10, 200, 1.0), 200);
    assert_eq!(lerp_u8(0, 255, 0.5), 128);
    assert_eq!(lerp_u8(7, 7, 0.37), 7);
}

#[test]
fn bitmap_digest_sees_dimensions() {
    let a = image::RgbaImage::new(2, 3);
    let b = image::RgbaImage::new(3, 2);
    assert_ne!(bitmap_digest(&a), bitmap_digest(&b));
    assert_eq!(bitmap_digest(&a), bitmap_digest(&a.clone()));
}
