//! Synthetic images for unit tests.

use image::{GrayImage, Luma};

/// Filled disks of gray level `fg` on a `bg` background.
///
/// A pixel belongs to a disk when its distance to the center is `<= radius`.
pub(crate) fn draw_disks(w: u32, h: u32, disks: &[([f32; 2], f32)], fg: u8, bg: u8) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, Luma([bg]));
    for y in 0..h {
        for x in 0..w {
            let inside = disks.iter().any(|(c, r)| {
                let dx = x as f32 - c[0];
                let dy = y as f32 - c[1];
                dx * dx + dy * dy <= r * r
            });
            if inside {
                img.put_pixel(x, y, Luma([fg]));
            }
        }
    }
    img
}

/// Add a vertical stripe pattern `amplitude * cos(2π k x / w)`.
pub(crate) fn add_stripes(img: &GrayImage, k: u32, amplitude: f32) -> GrayImage {
    let (w, h) = img.dimensions();
    let mut out = img.clone();
    for y in 0..h {
        for x in 0..w {
            let phase = 2.0 * std::f64::consts::PI * (k * x) as f64 / w as f64;
            let v = img.get_pixel(x, y)[0] as f64 + amplitude as f64 * phase.cos();
            out.put_pixel(x, y, Luma([v.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}
