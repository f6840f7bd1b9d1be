//! Flat-buffer helpers for (spatial, spatial, time) volumes.
//!
//! Arrays are stored in Fortran (column-major) order: index = i + j*n0 + k*n0*n1.
//! The canonical axis order puts time last; `move_time_axis_last` /
//! `restore_time_axis` convert between a caller's layout and the canonical one.

use crate::error::KtError;

/// Index into a 3D array stored in Fortran order (column-major)
#[inline(always)]
pub fn idx3(i: usize, j: usize, k: usize, n0: usize, n1: usize) -> usize {
    i + j * n0 + k * n0 * n1
}

/// Resolve a possibly-negative axis index (numpy semantics) against 3 dimensions
pub fn normalize_axis(axis: isize) -> Result<usize, KtError> {
    match axis {
        0..=2 => Ok(axis as usize),
        -3..=-1 => Ok((axis + 3) as usize),
        _ => Err(KtError::InvalidTimeAxis { axis }),
    }
}

/// Permute the axes of a flat Fortran-order volume.
///
/// `perm[k]` names the source axis that becomes output axis `k`.
/// Returns the permuted buffer and its dimensions.
pub fn permute3<T: Copy>(
    data: &[T],
    dims: (usize, usize, usize),
    perm: [usize; 3],
) -> (Vec<T>, (usize, usize, usize)) {
    let d = [dims.0, dims.1, dims.2];
    let nd = (d[perm[0]], d[perm[1]], d[perm[2]]);

    let mut out = Vec::with_capacity(data.len());
    for c in 0..nd.2 {
        for b in 0..nd.1 {
            for a in 0..nd.0 {
                let mut src = [0usize; 3];
                src[perm[0]] = a;
                src[perm[1]] = b;
                src[perm[2]] = c;
                out.push(data[idx3(src[0], src[1], src[2], dims.0, dims.1)]);
            }
        }
    }
    (out, nd)
}

/// Move the designated time axis to the last position, preserving the
/// relative order of the spatial axes (numpy `moveaxis` semantics).
pub fn move_time_axis_last<T: Copy>(
    data: &[T],
    dims: (usize, usize, usize),
    time_axis: usize,
) -> (Vec<T>, (usize, usize, usize)) {
    let perm = match time_axis {
        0 => [1, 2, 0],
        1 => [0, 2, 1],
        _ => [0, 1, 2],
    };
    permute3(data, dims, perm)
}

/// Undo `move_time_axis_last`, restoring the caller's axis order.
pub fn restore_time_axis<T: Copy>(
    data: &[T],
    dims: (usize, usize, usize),
    time_axis: usize,
) -> (Vec<T>, (usize, usize, usize)) {
    let perm = match time_axis {
        0 => [2, 0, 1],
        1 => [0, 2, 1],
        _ => [0, 1, 2],
    };
    permute3(data, dims, perm)
}

/// Circularly shift a volume along each axis (numpy `np.roll` semantics:
/// `out[i] = in[(i - shift) mod n]`).
pub fn roll3<T: Copy>(
    data: &[T],
    dims: (usize, usize, usize),
    shifts: (isize, isize, isize),
) -> Vec<T> {
    let (n0, n1, nt) = dims;
    let wrap = |i: usize, s: isize, n: usize| -> usize {
        (i as isize - s).rem_euclid(n as isize) as usize
    };

    let mut out = Vec::with_capacity(data.len());
    for k in 0..nt {
        let sk = wrap(k, shifts.2, nt);
        for j in 0..n1 {
            let sj = wrap(j, shifts.1, n1);
            for i in 0..n0 {
                out.push(data[idx3(wrap(i, shifts.0, n0), sj, sk, n0, n1)]);
            }
        }
    }
    out
}
