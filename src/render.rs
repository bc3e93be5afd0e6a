//! rasterization primitives. canvases are tiny-skia pixmaps (premultiplied RGBA8, row-major).
//! everything is drawn opaque, without anti-aliasing, replacing whatever was underneath.

use std::path::Path;

use tiny_skia as sk;

use crate::error::PaintError;

/// all-zero canvas (transparent black)
pub fn blank_canvas(width: u32, height: u32) -> Result<sk::Pixmap, PaintError> {
    sk::Pixmap::new(width, height).ok_or(PaintError::EmptyImage { width, height })
}

/// draw the closed outline of `points` with a 1px non-AA stroke.
pub fn draw_polygon_outline(
    pix: &mut sk::Pixmap,
    points: &[(f32, f32)],
    color: [f32; 3],
) -> Result<(), PaintError> {
    profiling::scope!("draw_polygon_outline");
    let paint = opaque_paint(color)?;
    let Some(path) = build_path(points)? else {
        return Ok(());
    };

    let stroke = sk::Stroke { width: 1.0, ..sk::Stroke::default() };
    pix.stroke_path(&path, &paint, &stroke, sk::Transform::identity(), None);
    Ok(())
}

/// fill the interior of `points` (even-odd rule, so bow-ties leave their crossing hole).
pub fn fill_polygon(
    pix: &mut sk::Pixmap,
    points: &[(f32, f32)],
    color: [f32; 3],
) -> Result<(), PaintError> {
    profiling::scope!("fill_polygon");
    let paint = opaque_paint(color)?;
    let Some(path) = build_path(points)? else {
        return Ok(());
    };

    pix.fill_path(&path, &paint, sk::FillRule::EvenOdd, sk::Transform::identity(), None);
    Ok(())
}

/// check every vertex and build a closed path.
/// Ok(None) means the polygon is valid but has no drawable extent (e.g. all vertices collapsed to one point).
fn build_path(points: &[(f32, f32)]) -> Result<Option<sk::Path>, PaintError> {
    if points.len() < 3 {
        return Err(PaintError::TooFewSides(points.len()));
    }
    if let Some((index, &(x, y))) = points
        .iter()
        .enumerate()
        .find(|(_, (x, y))| !x.is_finite() || !y.is_finite())
    {
        return Err(PaintError::InvalidVertex { index, x, y });
    }

    let mut pb = sk::PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        pb.line_to(x, y);
    }
    pb.close();
    Ok(pb.finish())
}

fn opaque_paint(color: [f32; 3]) -> Result<sk::Paint<'static>, PaintError> {
    let c = sk::Color::from_rgba(color[0] / 255.0, color[1] / 255.0, color[2] / 255.0, 1.0)
        .ok_or(PaintError::InvalidColor(color))?;

    let mut paint = sk::Paint::default();
    paint.shader = sk::Shader::SolidColor(c);
    paint.anti_alias = false;
    paint.blend_mode = sk::BlendMode::Source;
    Ok(paint)
}

/// premultiply straight RGBA8 (scalar loop, the compiler auto-vectorizes it)
#[inline(always)]
pub fn premultiply(p: &[u8]) -> Vec<u8> {
    profiling::scope!("premultiply");

    let mut out = vec![0u8; p.len()];
    for (dst, src) in out.chunks_exact_mut(4).zip(p.chunks_exact(4)) {
        let a = src[3] as u16;
        // (x * a + 127) / 255 is a fast rounded divide-by-255
        dst[0] = ((src[0] as u16 * a + 127) / 255) as u8;
        dst[1] = ((src[1] as u16 * a + 127) / 255) as u8;
        dst[2] = ((src[2] as u16 * a + 127) / 255) as u8;
        dst[3] = a as u8;
    }

    out
}

/// drop alpha and write the canvas as an RGB image (format picked from the extension).
/// unpainted pixels are transparent black in the pixmap and come out black.
pub fn save_canvas(pix: &sk::Pixmap, path: impl AsRef<Path>) -> Result<(), PaintError> {
    profiling::scope!("save_canvas");
    let rgb: Vec<u8> = pix
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let img = image::RgbImage::from_raw(pix.width(), pix.height(), rgb).ok_or(
        PaintError::ShapeMismatch {
            expected: pix.width() as usize * pix.height() as usize * 3,
            actual: pix.data().len() / 4 * 3,
        },
    )?;
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(pix: &sk::Pixmap, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * pix.width() + x) * 4) as usize;
        let d = pix.data();
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }

    #[test]
    fn test_blank_canvas_is_zero() {
        let pix = blank_canvas(4, 3).unwrap();
        assert!(pix.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_blank_canvas_rejects_empty() {
        assert!(matches!(blank_canvas(0, 0), Err(PaintError::EmptyImage { .. })));
    }

    #[test]
    fn test_fill_covers_square() {
        let mut pix = blank_canvas(4, 4).unwrap();
        let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        fill_polygon(&mut pix, &square, [255.0, 0.0, 0.0]).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(pixel(&pix, x, y), [255, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn test_later_fill_overwrites() {
        let mut pix = blank_canvas(4, 4).unwrap();
        let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        fill_polygon(&mut pix, &square, [255.0, 0.0, 0.0]).unwrap();
        fill_polygon(&mut pix, &square, [0.0, 0.0, 255.0]).unwrap();
        assert_eq!(pixel(&pix, 2, 2), [0, 0, 255, 255]);
    }

    #[test]
    fn test_non_finite_vertex_rejected() {
        let mut pix = blank_canvas(4, 4).unwrap();
        let pts = [(0.0, 0.0), (f32::NAN, 1.0), (2.0, 2.0)];
        let err = fill_polygon(&mut pix, &pts, [1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, PaintError::InvalidVertex { index: 1, .. }));
        // nothing drawn
        assert!(pix.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_two_points_rejected() {
        let mut pix = blank_canvas(4, 4).unwrap();
        let err = draw_polygon_outline(&mut pix, &[(0.0, 0.0), (1.0, 1.0)], [0.0; 3]).unwrap_err();
        assert!(matches!(err, PaintError::TooFewSides(2)));
    }

    #[test]
    fn test_collapsed_polygon_is_not_an_error() {
        let mut pix = blank_canvas(4, 4).unwrap();
        let pts = [(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)];
        assert!(fill_polygon(&mut pix, &pts, [9.0, 9.0, 9.0]).is_ok());
    }

    #[test]
    fn test_premultiply() {
        let out = premultiply(&[255, 128, 0, 255, 200, 100, 50, 0]);
        assert_eq!(out, vec![255, 128, 0, 255, 0, 0, 0, 0]);
    }
}
