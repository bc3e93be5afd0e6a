use std::path::Path;

use crate::error::PaintError;
use crate::render::premultiply;

/// the reference image every painting is scored against.
/// stored as premultiplied RGBA8, row-major, so it lines up byte for byte with a tiny-skia canvas.
/// shared read-only between paintings through an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    width: u32,
    height: u32,
    rgba: Vec<u8>, // premultiplied
}

impl Target {
    /// build a target from straight (un-premultiplied) RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self, PaintError> {
        if width == 0 || height == 0 {
            return Err(PaintError::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(PaintError::ShapeMismatch { expected, actual: rgba.len() });
        }

        Ok(Self { width, height, rgba: premultiply(rgba) })
    }

    /// opaque target filled with a single color
    pub fn from_rgb_fill(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, PaintError> {
        let pixel = [rgb[0], rgb[1], rgb[2], 255];
        let rgba: Vec<u8> = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::from_rgba8(width, height, &rgba)
    }

    /// decode any format the `image` crate understands.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaintError> {
        profiling::scope!("Target::load");
        let path = path.as_ref();
        let rgba8 = image::open(path)?.to_rgba8();
        log::info!("loaded target {} ({}x{})", path.display(), rgba8.width(), rgba8.height());
        Self::from_rgba8(rgba8.width(), rgba8.height(), rgba8.as_raw())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// premultiplied RGBA bytes
    #[inline]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_sized() {
        assert!(matches!(
            Target::from_rgba8(0, 4, &[]),
            Err(PaintError::EmptyImage { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(matches!(
            Target::from_rgba8(2, 2, &[0u8; 15]),
            Err(PaintError::ShapeMismatch { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_fill_is_opaque() {
        let t = Target::from_rgb_fill(3, 2, [10, 20, 30]).unwrap();
        assert_eq!(t.rgba().len(), 3 * 2 * 4);
        for px in t.rgba().chunks_exact(4) {
            assert_eq!(px, &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn test_translucent_pixels_are_premultiplied() {
        let t = Target::from_rgba8(1, 1, &[255, 255, 255, 0]).unwrap();
        assert_eq!(t.rgba(), &[0, 0, 0, 0]);
    }
}
