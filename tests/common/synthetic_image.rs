use image::{ImageFormat, RgbImage};
use retina_detector::image::{ChannelOrder, RawImage};
use std::io::Cursor;

/// Generates a fundus-like photograph: an orange disc on black with a bright
/// optic disc and a few dark vessel arcs.
pub fn fundus_rgb(width: usize, height: usize) -> RawImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let radius = cx.min(cy) * 0.95;
    let (dx0, dy0) = (cx + radius * 0.4, cy);

    RawImage::from_fn(width, height, ChannelOrder::Rgb, |x, y| {
        let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
        let r = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();
        if r > radius {
            return [0, 0, 0];
        }
        let disc = ((fx - dx0).powi(2) + (fy - dy0).powi(2)).sqrt() < radius * 0.15;
        if disc {
            return [250, 220, 150];
        }
        let shade = 1.0 - 0.35 * (r / radius);
        let vessel = ((fy - cy) - 0.25 * (fx - cx)).abs() < 1.5
            || ((fy - cy) + 0.4 * (fx - cx)).abs() < 1.0;
        let (red, green, blue) = if vessel {
            (140.0, 40.0, 20.0)
        } else {
            (220.0, 110.0, 40.0)
        };
        [
            (red * shade) as u8,
            (green * shade) as u8,
            (blue * shade) as u8,
        ]
    })
}

/// Same scene stored in BGR order, as camera SDKs hand it over.
pub fn fundus_bgr(width: usize, height: usize) -> RawImage {
    let rgb = fundus_rgb(width, height);
    RawImage::from_fn(width, height, ChannelOrder::Bgr, |x, y| {
        let [r, g, b] = rgb.pixel(x, y);
        [b, g, r]
    })
}

/// Encode an RGB image as PNG bytes.
pub fn encode_png(image: &RawImage) -> Vec<u8> {
    let rgb = image.to_rgb();
    let buffer = RgbImage::from_raw(rgb.w as u32, rgb.h as u32, rgb.data)
        .expect("buffer matches dimensions");
    let mut bytes = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding succeeds");
    bytes
}
