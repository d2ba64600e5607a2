use crate::draw::Rgb;

/// wgpu clip space has z in 0..1 where cgmath projections produce -1..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// RGBA for the shader. sRGB surfaces expect linear values and encode on write.
pub fn rgba(color: Rgb, linear: bool) -> [f32; 4] {
    if linear {
        [
            srgb_to_linear(color.r),
            srgb_to_linear(color.g),
            srgb_to_linear(color.b),
            1.0,
        ]
    } else {
        [
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
            1.0,
        ]
    }
}

pub fn clear_color(color: Rgb, linear: bool) -> wgpu::Color {
    let [r, g, b, a] = rgba(color, linear);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}
