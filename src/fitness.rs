//! pixel dissimilarity between a rendered canvas and the target.
//! buffers are RGBA8 (4 bytes per pixel); alpha is ignored, the three color channels are compared.

use rayon::prelude::*;

use crate::error::PaintError;

/// number of color channels taking part in the metric
pub const FITNESS_CHANNELS: usize = 3;

// pixels per rayon work unit, keeps per-task overhead low on big images
const PIXELS_PER_CHUNK: usize = 16 * 1024;

/// per-channel sum of squared differences (R, G, B).
/// integer accumulation, so the result is exact and independent of how rayon splits the work.
pub fn channel_sq_errors(a: &[u8], b: &[u8]) -> Result<[u64; FITNESS_CHANNELS], PaintError> {
    profiling::scope!("channel_sq_errors");
    if a.len() != b.len() || a.len() % 4 != 0 {
        return Err(PaintError::ShapeMismatch { expected: a.len(), actual: b.len() });
    }

    let sums = a
        .par_chunks(PIXELS_PER_CHUNK * 4)
        .zip(b.par_chunks(PIXELS_PER_CHUNK * 4))
        .map(|(ca, cb)| {
            let mut acc = [0u64; FITNESS_CHANNELS];
            for (pa, pb) in ca.chunks_exact(4).zip(cb.chunks_exact(4)) {
                for c in 0..FITNESS_CHANNELS {
                    let d = pa[c] as i64 - pb[c] as i64;
                    acc[c] += (d * d) as u64;
                }
            }
            acc
        })
        .reduce(
            || [0u64; FITNESS_CHANNELS],
            |x, y| [x[0] + y[0], x[1] + y[1], x[2] + y[2]],
        );

    Ok(sums)
}

/// channel-averaged mean squared error: mean over the 3 channels of (Σ d² / pixel count).
pub fn mse(a: &[u8], b: &[u8]) -> Result<f64, PaintError> {
    let sums = channel_sq_errors(a, b)?;
    let pixels = (a.len() / 4) as f64;
    if pixels == 0.0 {
        return Ok(0.0);
    }

    let per_channel: f64 = sums.iter().map(|&s| s as f64 / pixels).sum();
    Ok(per_channel / FITNESS_CHANNELS as f64)
}

/// root of the channel-averaged MSE. 0 = pixel-perfect, 255 = maximally different. lower is better.
/// symmetric in its arguments.
#[inline]
pub fn rmse(reference: &[u8], canvas: &[u8]) -> Result<f64, PaintError> {
    profiling::scope!("rmse");
    Ok(mse(reference, canvas)?.sqrt())
}

/// PSNR (peak signal-to-noise ratio) in decibels.
/// - `mse`: mean squared error
/// - `peak`: 255.0 for 8-bit images
/// higher is better; ~30 dB acceptable, 40+ dB very good.
#[inline]
pub fn psnr_from_mse(mse: f64, peak: f64) -> f64 {
    let mse = mse.max(1e-12);
    10.0 * ((peak * peak) / mse).log10()
}

/// PSNR straight from an rmse fitness value
#[inline]
pub fn psnr_from_rmse(rmse: f64) -> f64 {
    psnr_from_mse(rmse * rmse, 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(pixels: usize, px: [u8; 4]) -> Vec<u8> {
        px.iter().copied().cycle().take(pixels * 4).collect()
    }

    #[test]
    fn test_identical_buffers_score_zero() {
        let a: Vec<u8> = (0..64u32).map(|i| (i * 37 % 256) as u8).collect();
        assert_eq!(rmse(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetric_and_non_negative() {
        let a: Vec<u8> = (0..400u32).map(|i| (i * 13 % 256) as u8).collect();
        let b: Vec<u8> = (0..400u32).map(|i| (i * 71 % 256) as u8).collect();
        let ab = rmse(&a, &b).unwrap();
        let ba = rmse(&b, &a).unwrap();
        assert_eq!(ab, ba);
        assert!(ab > 0.0);
    }

    #[test]
    fn test_constant_255_difference() {
        let white = solid(16, [255, 255, 255, 255]);
        let black = solid(16, [0, 0, 0, 0]);
        assert!((rmse(&white, &black).unwrap() - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let a = solid(4, [10, 20, 30, 0]);
        let b = solid(4, [10, 20, 30, 255]);
        assert_eq!(rmse(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_channels_are_averaged() {
        // only red differs, by 30 everywhere: mse = (900 + 0 + 0) / 3 = 300
        let a = solid(9, [30, 5, 5, 255]);
        let b = solid(9, [0, 5, 5, 255]);
        assert!((mse(&a, &b).unwrap() - 300.0).abs() < 1e-9);
        assert!((rmse(&a, &b).unwrap() - 300f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_large_buffer_splits_exactly() {
        let n = PIXELS_PER_CHUNK * 3 + 7;
        let a = solid(n, [1, 2, 3, 255]);
        let b = solid(n, [4, 4, 4, 255]);
        // per-pixel squared diffs: 9, 4, 1
        assert_eq!(channel_sq_errors(&a, &b).unwrap(), [9 * n as u64, 4 * n as u64, n as u64]);
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(matches!(
            rmse(&[0u8; 8], &[0u8; 12]),
            Err(PaintError::ShapeMismatch { expected: 8, actual: 12 })
        ));
    }

    #[test]
    fn test_psnr_perfect_is_capped() {
        assert!(psnr_from_rmse(0.0) > 100.0);
        assert!((psnr_from_rmse(255.0) - 0.0).abs() < 1e-9);
    }
}
