use crate::image::GrayImageU8;

/// 256-entry table for `255 * (v / 255)^gamma`, truncated to 8 bits.
pub fn gamma_lut(gamma: f32) -> [u8; 256] {
    let gamma = f64::from(gamma);
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = 255.0 * (i as f64 / 255.0).powf(gamma);
        *slot = v.clamp(0.0, 255.0) as u8;
    }
    lut
}

pub fn gamma_correct(src: &GrayImageU8, gamma: f32) -> GrayImageU8 {
    src.apply_lut(&gamma_lut(gamma))
}
