use std::fmt;

use rand::Rng;
use tiny_skia::Pixmap;

use crate::error::PaintError;
use crate::render::{draw_polygon_outline, fill_polygon};
use crate::target::Target;

/// one gene: a polygon with a fixed number of vertices and an opaque RGB color.
/// x runs along the image width (columns), y along the height (rows).
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Vec<(f32, f32)>, // `sides` vertices, never resized after creation
    pub color: [f32; 3],         // r, g, b in 0..=255, fractional after mutation
}

impl Polygon {
    /// random polygon inside the target's extents.
    /// vertices land on integer coordinates in [0, width] x [0, height], channels on integers in [0, 255].
    pub fn random<R: Rng + ?Sized>(rng: &mut R, sides: usize, target: &Target) -> Result<Self, PaintError> {
        if sides < 3 {
            return Err(PaintError::TooFewSides(sides));
        }

        let (w, h) = (target.width(), target.height());
        let points = (0..sides)
            .map(|_| (rng.random_range(0..=w) as f32, rng.random_range(0..=h) as f32))
            .collect();
        let color = [
            rng.random_range(0..=255u8) as f32,
            rng.random_range(0..=255u8) as f32,
            rng.random_range(0..=255u8) as f32,
        ];

        Ok(Self { points, color })
    }

    #[inline]
    pub fn sides(&self) -> usize {
        self.points.len()
    }

    /// draw onto `canvas` in place: outline always, interior too when `fill` is set.
    /// malformed vertices fail before any pixel is touched.
    pub fn draw(&self, canvas: &mut Pixmap, fill: bool) -> Result<(), PaintError> {
        profiling::scope!("Polygon::draw");
        draw_polygon_outline(canvas, &self.points, self.color)?;
        if fill {
            fill_polygon(canvas, &self.points, self.color)?;
        }
        Ok(())
    }

    /// perturb every channel and coordinate in place.
    /// each scalar v is resampled uniformly from [v - ratio*v, v + ratio*v], then clamped:
    /// channels to [0, 255], x to [0, width], y to [0, height]. ratio 0 leaves the gene untouched.
    /// a non-finite ratio makes the interval undefined; the sample then comes from the clamp range.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, ratio: f32, target: &Target) -> &mut Self {
        let ratio = ratio.abs();
        let (w, h) = (target.width() as f32, target.height() as f32);

        for c in &mut self.color {
            *c = jitter(rng, *c, ratio, 0.0, 255.0);
        }
        for (x, y) in &mut self.points {
            *x = jitter(rng, *x, ratio, 0.0, w);
            *y = jitter(rng, *y, ratio, 0.0, h);
        }

        self
    }
}

// uniform sample in [v - ratio*v, v + ratio*v] clamped to [lo, hi]; the bounds swap for negative v.
// the interval is built in f64 so any finite f32 ratio stays finite.
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, v: f32, ratio: f32, lo: f32, hi: f32) -> f32 {
    let (v, ratio) = (v as f64, ratio as f64);
    let a = v - ratio * v;
    let b = v + ratio * v;

    let sample = if !a.is_finite() || !b.is_finite() {
        rng.random_range(lo as f64..=hi as f64)
    } else if a == b {
        a
    } else {
        rng.random_range(a.min(b)..=a.max(b))
    };
    (sample as f32).clamp(lo, hi)
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vertices: [")?;
        for (i, (x, y)) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({x:.1}, {y:.1})")?;
        }
        write!(
            f,
            "] color: ({:.1}, {:.1}, {:.1})",
            self.color[0], self.color[1], self.color[2]
        )
    }
}
