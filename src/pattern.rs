//! Lattice undersampling pattern helpers
//!
//! Generates the sheared (ky, t) sampling lattices used by k-t acquisitions:
//! one phase-encode line per R is acquired each frame, with the acquired
//! line shifting through time so that the alias copies separate in x-f space.

use crate::volume::idx3;

/// Build the basic R x R sampling tile over (ky, t).
///
/// Entry (ky, t) is acquired when `ky == lattice_shift * t (mod r)`: exactly
/// one phase-encode sample per frame, sheared by `lattice_shift` lines per
/// frame.
///
/// # Returns
/// R x R boolean tile in Fortran order (ky fastest)
pub fn undersampling_pattern(r: usize, lattice_shift: usize) -> Vec<bool> {
    let mut tile = vec![false; r * r];
    for t in 0..r {
        let ky = (lattice_shift * t) % r;
        tile[ky + t * r] = true;
    }
    tile
}

/// Replicate an R x R (ky, t) tile over a full (n0, n1, nt) k-t grid.
///
/// The lattice lives on the (axis 0, time) plane; axis 1 (the frequency-encode
/// direction) is always fully sampled.
pub fn tile_pattern(tile: &[bool], r: usize, dims: (usize, usize, usize)) -> Vec<bool> {
    let (n0, n1, nt) = dims;
    let mut pattern = vec![false; n0 * n1 * nt];
    for k in 0..nt {
        for i in 0..n0 {
            if tile[(i % r) + (k % r) * r] {
                for j in 0..n1 {
                    pattern[idx3(i, j, k, n0, n1)] = true;
                }
            }
        }
    }
    pattern
}
