use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels, with an extra opacity multiplier on `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Scale a single-channel coverage value into a premultiplied colour.
pub fn tint(color: PremulRgba8, coverage: u8) -> PremulRgba8 {
    let c = u16::from(coverage);
    [
        mul_div255_u8(u16::from(color[0]), c),
        mul_div255_u8(u16::from(color[1]), c),
        mul_div255_u8(u16::from(color[2]), c),
        mul_div255_u8(u16::from(color[3]), c),
    ]
}

/// Convert a premultiplied pixel back to straight RGB, dropping alpha.
pub fn unpremultiply_rgb(px: PremulRgba8) -> [u8; 3] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0];
    }
    if a == 255 {
        return [px[0], px[1], px[2]];
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2])]
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
