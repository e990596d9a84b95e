// Save the canvas as a PNG.
// Visual: nothing changes on screen; a still of the current frame lands on disk.

use crate::error::Error;
use crate::types::FrameBuffer;
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Unpack 0x00RRGGBB pixels into an RGB image of the same size.
pub fn to_rgb_image(fb: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let px = fb.pixels[y as usize * fb.width + x as usize];
        Rgb([(px >> 16) as u8, (px >> 8) as u8, px as u8])
    })
}

/// Write `constellation-<frame>.png` into `dir` and return its path.
pub fn save_png(fb: &FrameBuffer, dir: &Path, frame: u64) -> Result<PathBuf, Error> {
    let path = dir.join(format!("constellation-{frame:06}.png"));
    to_rgb_image(fb).save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_unpack_to_rgb() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.pixels = vec![0x00_11_22_33, 0x00_FF_00_80];
        let img = to_rgb_image(&fb);
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0x11, 0x22, 0x33]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0xFF, 0x00, 0x80]));
    }

    #[test]
    fn png_written_with_frame_number() {
        let dir = std::env::temp_dir();
        let fb = FrameBuffer::new(3, 3);
        let path = save_png(&fb, &dir, 4242).unwrap();
        assert!(path.ends_with("constellation-004242.png"));
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 3));
        let _ = std::fs::remove_file(&path);
    }
}
