use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn truncate_identifier_keeps_short_strings() {
    assert_eq!(truncate_identifier("a.png", 48), "a.png");
}

#[test]
fn truncate_identifier_respects_char_boundaries() {
    let long = "é".repeat(100);
    let out = truncate_identifier(&long, 10);
    assert_eq!(out.chars().count(), 10);
    assert!(out.ends_with("..."));
}
