/// Parse a CSS hex colour (`#rgb`, `#rrggbb`, `#rrggbbaa`) into RGBA in `0.0..=1.0`.
pub fn parse_hex_color(value: &str) -> Option<[f32; 4]> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    let short = |i: usize| channel(&hex[i..i + 1].repeat(2));

    match hex.len() {
        3 => Some([short(0)?, short(1)?, short(2)?, 1.0]),
        6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?, 1.0]),
        8 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ]),
        _ => None,
    }
}

/// Like [`parse_hex_color`], falling back to opaque black for anything unparseable.
pub fn color_or_black(value: &str) -> [f32; 4] {
    parse_hex_color(value).unwrap_or_else(|| {
        log::debug!("unrecognised colour {:?}, drawing black", value);
        [0.0, 0.0, 0.0, 1.0]
    })
}

/// Decode one sRGB-encoded channel to linear light.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// A CSS colour as linear RGBA, for drawing into sRGB render targets. Alpha is
/// not gamma encoded and passes through.
pub fn linear_or_black(value: &str) -> [f32; 4] {
    let [r, g, b, a] = color_or_black(value);
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
}
