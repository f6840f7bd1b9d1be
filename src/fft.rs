//! Spectral transforms between k-t and x-f space using rustfft
//!
//! k-t space is the raw acquisition domain: spatial frequency (k) sampled
//! across time (t). x-f space is spatial position (x) against temporal
//! frequency (f), the domain where aliasing analysis and filtering happen.
//!
//! Conventions match NumPy's FFT: forward transforms are unnormalized,
//! inverse transforms divide by the axis length, `fftshift` rolls by n/2 and
//! `ifftshift` by -(n/2). Volumes are flat Fortran-order buffers with
//! canonical dimensions (n0, n1, nt), time last.

use num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};

use crate::error::KtError;
use crate::volume::{idx3, move_time_axis_last, normalize_axis, restore_time_axis, roll3};

/// In-place forward 2D FFT over the two spatial axes of a (n0, n1, nt) volume
pub fn fft2(data: &mut [Complex64], n0: usize, n1: usize, nt: usize) {
    spatial_fft(data, n0, n1, nt, FftDirection::Forward);
}

/// In-place inverse 2D FFT over the spatial axes (normalized by 1/(n0*n1))
pub fn ifft2(data: &mut [Complex64], n0: usize, n1: usize, nt: usize) {
    spatial_fft(data, n0, n1, nt, FftDirection::Inverse);
    let scale = 1.0 / (n0 as f64 * n1 as f64);
    for val in data.iter_mut() {
        *val *= scale;
    }
}

/// In-place forward 1D FFT along the time axis
pub fn fft_t(data: &mut [Complex64], n0: usize, n1: usize, nt: usize) {
    temporal_fft(data, n0, n1, nt, FftDirection::Forward);
}

/// In-place inverse 1D FFT along the time axis (normalized by 1/nt)
pub fn ifft_t(data: &mut [Complex64], n0: usize, n1: usize, nt: usize) {
    temporal_fft(data, n0, n1, nt, FftDirection::Inverse);
    let scale = 1.0 / nt as f64;
    for val in data.iter_mut() {
        *val *= scale;
    }
}

fn spatial_fft(data: &mut [Complex64], n0: usize, n1: usize, nt: usize, dir: FftDirection) {
    let mut planner = FftPlanner::new();
    let fft_0 = planner.plan_fft(n0, dir);
    let fft_1 = planner.plan_fft(n1, dir);

    let mut scratch =
        vec![Complex64::new(0.0, 0.0); fft_0.get_inplace_scratch_len().max(fft_1.get_inplace_scratch_len())];
    let mut buffer = vec![Complex64::new(0.0, 0.0); n1];

    // Axis 0 is contiguous in Fortran order
    for k in 0..nt {
        for j in 0..n1 {
            let start = idx3(0, j, k, n0, n1);
            fft_0.process_with_scratch(&mut data[start..start + n0], &mut scratch);
        }
    }

    // Axis 1: gather strided columns
    for k in 0..nt {
        for i in 0..n0 {
            for j in 0..n1 {
                buffer[j] = data[idx3(i, j, k, n0, n1)];
            }
            fft_1.process_with_scratch(&mut buffer, &mut scratch);
            for j in 0..n1 {
                data[idx3(i, j, k, n0, n1)] = buffer[j];
            }
        }
    }
}

fn temporal_fft(data: &mut [Complex64], n0: usize, n1: usize, nt: usize, dir: FftDirection) {
    let mut planner = FftPlanner::new();
    let fft_time = planner.plan_fft(nt, dir);

    let mut scratch = vec![Complex64::new(0.0, 0.0); fft_time.get_inplace_scratch_len()];
    let mut buffer = vec![Complex64::new(0.0, 0.0); nt];

    for j in 0..n1 {
        for i in 0..n0 {
            for k in 0..nt {
                buffer[k] = data[idx3(i, j, k, n0, n1)];
            }
            fft_time.process_with_scratch(&mut buffer, &mut scratch);
            for k in 0..nt {
                data[idx3(i, j, k, n0, n1)] = buffer[k];
            }
        }
    }
}

/// Roll zero frequency to the array center along both spatial axes
pub fn fftshift_spatial(data: &[Complex64], dims: (usize, usize, usize)) -> Vec<Complex64> {
    roll3(data, dims, ((dims.0 / 2) as isize, (dims.1 / 2) as isize, 0))
}

/// Inverse of `fftshift_spatial`
pub fn ifftshift_spatial(data: &[Complex64], dims: (usize, usize, usize)) -> Vec<Complex64> {
    roll3(data, dims, (-((dims.0 / 2) as isize), -((dims.1 / 2) as isize), 0))
}

/// Roll zero frequency to the array center along the time axis
pub fn fftshift_temporal(data: &[Complex64], dims: (usize, usize, usize)) -> Vec<Complex64> {
    roll3(data, dims, (0, 0, (dims.2 / 2) as isize))
}

/// Inverse of `fftshift_temporal`
pub fn ifftshift_temporal(data: &[Complex64], dims: (usize, usize, usize)) -> Vec<Complex64> {
    roll3(data, dims, (0, 0, -((dims.2 / 2) as isize)))
}

/// Transform k-t data into x-f space.
///
/// Applies the inverse 2D spatial transform followed by the forward temporal
/// transform. With `shift` set, frequency axes are zero-frequency-centered
/// before and after each stage; without it the transform assumes the center
/// of k-space sampling maps to array index (0, 0, 0), which is the form the
/// sampling-lattice PSF computation requires.
///
/// # Arguments
/// * `kt` - k-t space data, Fortran order, time axis last
/// * `dims` - (n0, n1, nt)
/// * `shift` - center the frequency axes (use `false` only for PSF work)
///
/// # Returns
/// x-f space data, same shape
pub fn kt2xf(kt: &[Complex64], dims: (usize, usize, usize), shift: bool) -> Vec<Complex64> {
    let (n0, n1, nt) = dims;
    let mut xf = if shift {
        ifftshift_spatial(kt, dims)
    } else {
        kt.to_vec()
    };
    ifft2(&mut xf, n0, n1, nt);
    if shift {
        xf = fftshift_spatial(&xf, dims);
    }
    fft_t(&mut xf, n0, n1, nt);
    if shift {
        xf = ifftshift_temporal(&xf, dims);
    }
    xf
}

/// Transform x-f data back to k-t space. Exact inverse of [`kt2xf`].
pub fn xf2kt(xf: &[Complex64], dims: (usize, usize, usize), shift: bool) -> Vec<Complex64> {
    let (n0, n1, nt) = dims;
    let mut kt = if shift {
        fftshift_temporal(xf, dims)
    } else {
        xf.to_vec()
    };
    ifft_t(&mut kt, n0, n1, nt);
    if shift {
        kt = ifftshift_spatial(&kt, dims);
    }
    fft2(&mut kt, n0, n1, nt);
    if shift {
        kt = fftshift_spatial(&kt, dims);
    }
    kt
}

/// Transform k-t data to centered x-f space with a caller-chosen time axis.
///
/// Convenience wrapper around [`kt2xf`] that canonicalizes the time axis to
/// the last position and restores the caller's order afterwards.
pub fn to_xf(
    kt: &[Complex64],
    dims: (usize, usize, usize),
    time_axis: isize,
) -> Result<Vec<Complex64>, KtError> {
    let axis = normalize_axis(time_axis)?;
    check_len(kt.len(), dims)?;
    let (canon, cdims) = move_time_axis_last(kt, dims, axis);
    let xf = kt2xf(&canon, cdims, true);
    let (out, _) = restore_time_axis(&xf, cdims, axis);
    Ok(out)
}

/// Exact inverse of [`to_xf`].
pub fn from_xf(
    xf: &[Complex64],
    dims: (usize, usize, usize),
    time_axis: isize,
) -> Result<Vec<Complex64>, KtError> {
    let axis = normalize_axis(time_axis)?;
    check_len(xf.len(), dims)?;
    let (canon, cdims) = move_time_axis_last(xf, dims, axis);
    let kt = xf2kt(&canon, cdims, true);
    let (out, _) = restore_time_axis(&kt, cdims, axis);
    Ok(out)
}

fn check_len(len: usize, dims: (usize, usize, usize)) -> Result<(), KtError> {
    let expected = dims.0 * dims.1 * dims.2;
    if len != expected {
        return Err(KtError::BufferSize {
            got: len,
            expected,
            n0: dims.0,
            n1: dims.1,
            nt: dims.2,
        });
    }
    Ok(())
}

/// Transform centered x-f data to image/time (x-t) space.
///
/// Only the temporal axis is inverted; the spatial axes are already in
/// image space. This is the final stage of both reconstruction pipelines.
pub fn xf2xt(xf: &[Complex64], dims: (usize, usize, usize)) -> Vec<Complex64> {
    let (n0, n1, nt) = dims;
    let mut xt = fftshift_temporal(xf, dims);
    ifft_t(&mut xt, n0, n1, nt);
    xt
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_volume(dims: (usize, usize, usize), seed: u64) -> Vec<Complex64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..dims.0 * dims.1 * dims.2)
            .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect()
    }

    fn max_abs_diff(a: &[Complex64], b: &[Complex64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_fft_ifft_roundtrip() {
        let dims = (4, 6, 5);
        let data = random_volume(dims, 1);

        let mut work = data.clone();
        fft2(&mut work, dims.0, dims.1, dims.2);
        ifft2(&mut work, dims.0, dims.1, dims.2);
        assert!(max_abs_diff(&work, &data) < 1e-12, "spatial roundtrip");

        let mut work = data.clone();
        fft_t(&mut work, dims.0, dims.1, dims.2);
        ifft_t(&mut work, dims.0, dims.1, dims.2);
        assert!(max_abs_diff(&work, &data) < 1e-12, "temporal roundtrip");
    }

    #[test]
    fn test_fft2_delta_is_flat() {
        // A delta at the origin transforms to a constant spectrum
        let dims = (4, 4, 1);
        let mut data = vec![Complex64::new(0.0, 0.0); 16];
        data[0] = Complex64::new(1.0, 0.0);
        fft2(&mut data, 4, 4, 1);
        for (i, val) in data.iter().enumerate() {
            assert!(
                (val - Complex64::new(1.0, 0.0)).norm() < 1e-12,
                "flat spectrum at {}",
                i
            );
        }
    }

    #[test]
    fn test_shift_inverse_odd_lengths() {
        // fftshift/ifftshift must invert each other even for odd axes
        let dims = (5, 3, 7);
        let data = random_volume(dims, 2);

        let back = ifftshift_spatial(&fftshift_spatial(&data, dims), dims);
        assert!(max_abs_diff(&back, &data) < 1e-15, "spatial shifts");

        let back = ifftshift_temporal(&fftshift_temporal(&data, dims), dims);
        assert!(max_abs_diff(&back, &data) < 1e-15, "temporal shifts");
    }

    #[test]
    fn test_kt2xf_roundtrip_centered() {
        let dims = (6, 4, 8);
        let kt = random_volume(dims, 3);
        let back = xf2kt(&kt2xf(&kt, dims, true), dims, true);
        assert!(max_abs_diff(&back, &kt) < 1e-10, "centered roundtrip");
    }

    #[test]
    fn test_kt2xf_roundtrip_uncentered() {
        let dims = (5, 7, 3);
        let kt = random_volume(dims, 4);
        let back = xf2kt(&kt2xf(&kt, dims, false), dims, false);
        assert!(max_abs_diff(&back, &kt) < 1e-10, "uncentered roundtrip");
    }

    #[test]
    fn test_to_xf_roundtrip_any_time_axis() {
        let dims = (4, 6, 5);
        let kt = random_volume(dims, 6);
        for axis in [-3isize, -2, -1, 0, 1, 2] {
            let back = from_xf(&to_xf(&kt, dims, axis).unwrap(), dims, axis).unwrap();
            assert!(
                max_abs_diff(&back, &kt) < 1e-10,
                "roundtrip with time axis {}",
                axis
            );
        }
        assert!(to_xf(&kt, dims, 3).is_err(), "axis out of range");
        assert!(to_xf(&kt[..10], dims, -1).is_err(), "length mismatch");
    }

    #[test]
    fn test_xf2xt_matches_spatial_inverse() {
        // xf2xt of the centered x-f data must equal the centered spatial
        // inverse transform of the original k-t data
        let dims = (4, 4, 6);
        let kt = random_volume(dims, 5);

        let xt = xf2xt(&kt2xf(&kt, dims, true), dims);

        let mut expected = ifftshift_spatial(&kt, dims);
        ifft2(&mut expected, dims.0, dims.1, dims.2);
        expected = fftshift_spatial(&expected, dims);

        assert!(max_abs_diff(&xt, &expected) < 1e-10, "x-t consistency");
    }
}
