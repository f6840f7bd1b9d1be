//! Sampling-lattice PSF and alias-offset location
//!
//! An R-fold undersampling lattice folds spectral content onto itself R
//! times. Transforming the sampling indicator itself into x-f space yields
//! the lattice's point-spread function: R delta-like peaks whose coordinates
//! are exactly the circular-shift offsets at which alias copies of any true
//! signal appear.

use log::debug;
use num_complex::Complex64;

use crate::error::KtError;
use crate::fft::kt2xf;
use crate::volume::idx3;

/// PSF entries above this magnitude count as alias peaks in explicit-R mode
const ALIAS_EPS: f64 = 1e-5;

/// Number of histogram bins for the automatic (Otsu) threshold
const OTSU_BINS: usize = 256;

/// Centering convention for the PSF transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PsfCentering {
    /// Uncentered transform: the center of k-space sampling maps to array
    /// index (0, 0, 0) and peak coordinates are direct shift offsets.
    Origin,
    /// Zero-frequency-centered transform. Peak coordinates are offsets in
    /// the centered x-f grid; only meaningful when the filter stage shifts
    /// data with the same convention.
    Centered,
}

/// How to decide which PSF entries are alias peaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AliasDetection {
    /// The undersampling factor is known; finding any other number of peaks
    /// above `ALIAS_EPS` is a hard failure.
    Known(usize),
    /// Binarize the PSF with an automatic bimodal (Otsu) threshold and
    /// accept however many peaks that yields.
    Auto,
}

/// Point-spread function magnitude of a sampling lattice in x-f space.
pub fn psf(pattern: &[bool], dims: (usize, usize, usize), centering: PsfCentering) -> Vec<f64> {
    let indicator: Vec<Complex64> = pattern
        .iter()
        .map(|&s| {
            if s {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        })
        .collect();
    let xf = kt2xf(&indicator, dims, centering == PsfCentering::Centered);
    xf.iter().map(|c| c.norm()).collect()
}

/// Locate the alias-copy offsets in a PSF magnitude array.
///
/// Returns the peak coordinates as (axis 0, axis 1, temporal frequency)
/// circular-shift triples, ordered by Fortran index.
///
/// # Errors
/// `KtError::AliasCountMismatch` in `Known(r)` mode when the number of PSF
/// entries above the peak epsilon differs from `r` (wrong R or malformed
/// lattice); never errors on count in `Auto` mode.
pub fn locate_aliases(
    psf_mag: &[f64],
    dims: (usize, usize, usize),
    detection: AliasDetection,
) -> Result<Vec<(usize, usize, usize)>, KtError> {
    let threshold = match detection {
        AliasDetection::Known(r) => {
            if r == 0 {
                return Err(KtError::InvalidAcceleration { r });
            }
            ALIAS_EPS
        }
        AliasDetection::Auto => {
            let t = otsu_threshold(psf_mag);
            debug!("auto alias detection: otsu threshold {:.3e}", t);
            t
        }
    };

    let offsets = collect_peaks(psf_mag, dims, threshold);

    if let AliasDetection::Known(r) = detection {
        if offsets.len() != r {
            return Err(KtError::AliasCountMismatch {
                expected: r,
                found: offsets.len(),
            });
        }
    }
    debug!("located {} alias copies", offsets.len());
    Ok(offsets)
}

fn collect_peaks(
    psf_mag: &[f64],
    dims: (usize, usize, usize),
    threshold: f64,
) -> Vec<(usize, usize, usize)> {
    let (n0, n1, nt) = dims;
    let mut offsets = Vec::new();
    for k in 0..nt {
        for j in 0..n1 {
            for i in 0..n0 {
                if psf_mag[idx3(i, j, k, n0, n1)] > threshold {
                    offsets.push((i, j, k));
                }
            }
        }
    }
    offsets
}

/// Otsu's bimodal histogram threshold.
///
/// Maximizes the between-class variance over a fixed-bin intensity
/// histogram; values strictly above the returned threshold form the
/// foreground class.
pub fn otsu_threshold(values: &[f64]) -> f64 {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        return max;
    }

    let mut hist = [0usize; OTSU_BINS];
    let scale = OTSU_BINS as f64 / (max - min);
    for &v in values {
        let bin = (((v - min) * scale) as usize).min(OTSU_BINS - 1);
        hist[bin] += 1;
    }

    let total = values.len() as f64;
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(t, &c)| t as f64 * c as f64)
        .sum();

    let mut weight_bg = 0.0;
    let mut sum_bg = 0.0;
    let mut best_var = -1.0;
    let mut best_bin = 0usize;

    for (t, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += t as f64 * count as f64;

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let var = weight_bg * weight_fg * (mean_bg - mean_fg) * (mean_bg - mean_fg);
        if var > best_var {
            best_var = var;
            best_bin = t;
        }
    }

    // Split at the upper edge of the best background bin
    min + (best_bin as f64 + 1.0) / OTSU_BINS as f64 * (max - min)
}
