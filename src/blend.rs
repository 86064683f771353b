use image::Rgba;

use crate::model::BlendMode;

/// Composite `top` over `base` with the given mode.
pub fn blend_pixel(base: Rgba<u8>, top: Rgba<u8>, mode: BlendMode) -> Rgba<u8> {
    // Fast path: fully transparent top pixel
    if top[3] == 0 {
        return base;
    }
    // Fast path: opaque normal blend just overwrites
    if mode == BlendMode::Normal && top[3] == 255 {
        return top;
    }

    let base_r = base[0] as f32 / 255.0;
    let base_g = base[1] as f32 / 255.0;
    let base_b = base[2] as f32 / 255.0;
    let base_a = base[3] as f32 / 255.0;

    let top_r = top[0] as f32 / 255.0;
    let top_g = top[1] as f32 / 255.0;
    let top_b = top[2] as f32 / 255.0;
    let top_a = top[3] as f32 / 255.0;

    let (r, g, b) = (
        blend_channel(mode, base_r, top_r),
        blend_channel(mode, base_g, top_g),
        blend_channel(mode, base_b, top_b),
    );

    let out_a = top_a + base_a * (1.0 - top_a);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let out_r = (r * top_a + base_r * base_a * (1.0 - top_a)) / out_a;
    let out_g = (g * top_a + base_g * base_a * (1.0 - top_a)) / out_a;
    let out_b = (b * top_a + base_b * base_a * (1.0 - top_a)) / out_a;

    Rgba([
        to_u8(out_r),
        to_u8(out_g),
        to_u8(out_b),
        to_u8(out_a),
    ])
}

fn blend_channel(mode: BlendMode, base: f32, top: f32) -> f32 {
    match mode {
        BlendMode::Normal => top,
        BlendMode::Add => (base + top).min(1.0),
        BlendMode::Darkest => base.min(top),
        BlendMode::Lightest => base.max(top),
        BlendMode::Difference => (base - top).abs(),
        BlendMode::Multiply => base * top,
        BlendMode::Screen => 1.0 - (1.0 - base) * (1.0 - top),
        BlendMode::Overlay => overlay_channel(base, top),
    }
}

fn overlay_channel(base: f32, top: f32) -> f32 {
    if base < 0.5 {
        2.0 * base * top
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - top)
    }
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Rgba<u8> = Rgba([128, 128, 128, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn transparent_top_keeps_base() {
        for mode in BlendMode::ALL {
            assert_eq!(blend_pixel(GREY, Rgba([10, 20, 30, 0]), mode), GREY);
        }
    }

    #[test]
    fn opaque_normal_overwrites() {
        assert_eq!(blend_pixel(GREY, RED, BlendMode::Normal), RED);
    }

    #[test]
    fn channel_formulas() {
        assert_eq!(blend_pixel(GREY, RED, BlendMode::Add), Rgba([255, 128, 128, 255]));
        assert_eq!(blend_pixel(GREY, RED, BlendMode::Darkest), Rgba([128, 0, 0, 255]));
        assert_eq!(blend_pixel(GREY, RED, BlendMode::Lightest), Rgba([255, 128, 128, 255]));
        assert_eq!(blend_pixel(GREY, RED, BlendMode::Difference), Rgba([127, 128, 128, 255]));
        assert_eq!(blend_pixel(GREY, RED, BlendMode::Multiply), Rgba([128, 0, 0, 255]));
        assert_eq!(blend_pixel(GREY, RED, BlendMode::Screen), Rgba([255, 128, 128, 255]));
    }

    #[test]
    fn overlay_uses_base_to_pick_branch() {
        let dark = Rgba([51, 51, 51, 255]);
        let light = Rgba([204, 204, 204, 255]);
        let top = Rgba([128, 128, 128, 255]);
        // 2 * 0.2 * 0.502 = 0.2008
        assert_eq!(blend_pixel(dark, top, BlendMode::Overlay)[0], 51);
        // 1 - 2 * 0.2 * 0.498 = 0.8008
        assert_eq!(blend_pixel(light, top, BlendMode::Overlay)[0], 204);
    }

    #[test]
    fn half_alpha_normal_mixes() {
        let top = Rgba([255, 255, 255, 128]);
        let base = Rgba([0, 0, 0, 255]);
        let out = blend_pixel(base, top, BlendMode::Normal);
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 128);
    }
}
