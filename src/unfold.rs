//! UNFOLD reconstruction
//!
//! Training-free counterpart to k-t BLAST: assumes the object's temporal
//! spectrum is spatially band-limited to the central half of the field of
//! view, so everything outside that support window in x-f space is aliasing
//! and can be zeroed.
//!
//! Reference:
//! Tsao, Jeffrey. "On the UNFOLD method." MRM 47.1 (2002): 202-207.

use num_complex::Complex64;

use crate::error::KtError;
use crate::fft::{kt2xf, xf2xt};
use crate::ktblast::validate_dims;
use crate::volume::{idx3, move_time_axis_last, normalize_axis, restore_time_axis};

/// Reconstruct image/time data from undersampled k-t data via UNFOLD.
///
/// # Arguments
/// * `kspace` - undersampled k-t data; unacquired locations must be exactly
///   0+0i. Fortran order with dimensions `dims` in the caller's axis order.
/// * `dims` - physical dimensions of the buffer
/// * `time_axis` - which axis holds time (negative counts from the end)
///
/// # Returns
/// Reconstructed x-t (image/time) data in the caller's axis order.
pub fn unfold(
    kspace: &[Complex64],
    dims: (usize, usize, usize),
    time_axis: isize,
) -> Result<Vec<Complex64>, KtError> {
    let time_axis = normalize_axis(time_axis)?;
    validate_dims(dims, time_axis, kspace.len())?;

    let (kspace, cdims) = move_time_axis_last(kspace, dims, time_axis);
    let (n0, n1, nt) = cdims;
    let (q0, q1) = (n0 / 4, n1 / 4);
    let dc = nt / 2;

    let xf_u = kt2xf(&kspace, cdims, true);

    // Zero everything outside the central support window (a quarter margin
    // excluded on each side), at every temporal frequency
    let mut xf = vec![Complex64::new(0.0, 0.0); xf_u.len()];
    for k in 0..nt {
        for j in q1..n1 - q1 {
            for i in q0..n0 - q0 {
                xf[idx3(i, j, k, n0, n1)] = xf_u[idx3(i, j, k, n0, n1)];
            }
        }
    }

    // Fixed correction from the reference demo implementation: zero the
    // temporal-frequency plane at index 0 of the centered spectrum and put
    // back the unmasked center (zero-frequency) plane. Empirically required;
    // kept exactly as found.
    for j in 0..n1 {
        for i in 0..n0 {
            xf[idx3(i, j, 0, n0, n1)] = Complex64::new(0.0, 0.0);
            xf[idx3(i, j, dc, n0, n1)] = xf_u[idx3(i, j, dc, n0, n1)];
        }
    }

    let xt = xf2xt(&xf, cdims);
    let (recon, _) = restore_time_axis(&xt, cdims, time_axis);
    Ok(recon)
}
