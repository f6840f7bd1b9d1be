//! Wiener-style reconstruction filter for k-t BLAST
//!
//! Per voxel, the filter is the ratio of the prior's signal energy to the
//! total energy of all R alias copies superimposed there plus noise:
//!
//! f = |prior|² / (Σ_r shift(|prior|², offset_r) + ψ)
//!
//! A voxel's true signal is estimated to occupy that fraction of the energy
//! observed at its aliased location. Entries lie in [0, 1]; the pipeline
//! rescales by R at application time.

use num_complex::Complex64;

use crate::volume::roll3;

/// Denominators at or below this are treated as zero energy
const DENOM_EPS: f64 = 1e-20;

/// Build the per-voxel k-t BLAST filter from prior x-f data.
///
/// # Arguments
/// * `prior_xf` - calibration/training data in x-f space (read-only)
/// * `dims` - (n0, n1, nt) of the prior grid; the filter is computed at the
///   prior's resolution
/// * `offsets` - the R alias circular-shift triples
/// * `psi` - noise variance, already sanitized to a real nonnegative value
///
/// # Returns
/// Real filter array, same shape as `prior_xf`. Zero-energy voxels get a
/// zero filter entry rather than 0/0.
pub fn ktblast_filter(
    prior_xf: &[Complex64],
    dims: (usize, usize, usize),
    offsets: &[(usize, usize, usize)],
    psi: f64,
) -> Vec<f64> {
    let energy: Vec<f64> = prior_xf.iter().map(|c| c.norm_sqr()).collect();

    let mut denom = vec![psi; energy.len()];
    for &(s0, s1, s2) in offsets {
        let shifted = roll3(&energy, dims, (s0 as isize, s1 as isize, s2 as isize));
        for (d, s) in denom.iter_mut().zip(shifted.iter()) {
            *d += s;
        }
    }

    energy
        .iter()
        .zip(denom.iter())
        .map(|(&e, &d)| if d > DENOM_EPS { e / d } else { 0.0 })
        .collect()
}

/// Hanning window of length n (matches `numpy.hanning`).
///
/// Used to apodize calibration data along the phase-encode or temporal
/// frequency axis before the filter energy is computed.
pub fn hanning(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_prior(dims: (usize, usize, usize)) -> Vec<Complex64> {
        vec![Complex64::new(1.0, 0.0); dims.0 * dims.1 * dims.2]
    }

    #[test]
    fn test_uniform_prior_splits_energy_evenly() {
        // With equal energy at every alias location the filter is 1/R
        let dims = (4, 4, 4);
        let offsets = [(0, 0, 0), (2, 0, 2)];
        let filter = ktblast_filter(&uniform_prior(dims), dims, &offsets, 0.0);
        for (i, &f) in filter.iter().enumerate() {
            assert!((f - 0.5).abs() < 1e-12, "entry {} = {}", i, f);
        }
    }

    #[test]
    fn test_zero_prior_gives_zero_filter() {
        let dims = (4, 4, 2);
        let prior = vec![Complex64::new(0.0, 0.0); 32];
        let filter = ktblast_filter(&prior, dims, &[(0, 0, 0)], 0.0);
        assert!(filter.iter().all(|&f| f == 0.0), "no NaN from 0/0");
    }

    #[test]
    fn test_disjoint_support_passes_true_signal() {
        // Prior confined to one alias coset: filter is 1 on the support,
        // 0 at the alias positions
        let dims = (4, 1, 2);
        let mut prior = vec![Complex64::new(0.0, 0.0); 8];
        prior[0] = Complex64::new(3.0, 0.0); // (0, 0, 0)
        let offsets = [(0, 0, 0), (2, 0, 1)];
        let filter = ktblast_filter(&prior, dims, &offsets, 0.0);

        assert!((filter[0] - 1.0).abs() < 1e-12, "on-support entry");
        assert!(filter.iter().skip(1).all(|&f| f == 0.0), "off-support entries");
    }

    #[test]
    fn test_noise_monotonicity() {
        let dims = (3, 2, 4);
        let prior: Vec<Complex64> = (0..24)
            .map(|i| Complex64::new(0.1 + (i as f64) * 0.07, -(i as f64) * 0.02))
            .collect();
        let offsets = [(0, 0, 0), (1, 1, 2)];

        let f0 = ktblast_filter(&prior, dims, &offsets, 0.0);
        let f1 = ktblast_filter(&prior, dims, &offsets, 0.5);
        let f2 = ktblast_filter(&prior, dims, &offsets, 5.0);

        for i in 0..24 {
            assert!(f1[i] <= f0[i] + 1e-15, "psi 0.5 at {}", i);
            assert!(f2[i] <= f1[i] + 1e-15, "psi 5.0 at {}", i);
            assert!((0.0..=1.0).contains(&f0[i]), "range at {}", i);
        }
    }

    #[test]
    fn test_hanning_endpoints() {
        let w = hanning(5);
        assert!(w[0].abs() < 1e-12 && w[4].abs() < 1e-12, "zero endpoints");
        assert!((w[2] - 1.0).abs() < 1e-12, "unit center");
        assert_eq!(hanning(1), vec![1.0]);
    }
}
