//! ktblast: k-t BLAST and UNFOLD reconstruction for undersampled dynamic MRI
//!
//! Reconstructs full-resolution image-time series from lattice-undersampled
//! k-t acquisitions. Undersampling a periodic lattice folds R spectral
//! copies of the true signal on top of each other in x-f space; the two
//! pipelines here separate them again:
//!
//! - k-t BLAST builds a per-voxel Wiener-style filter from a calibration
//!   (training) estimate and noise statistics
//! - UNFOLD needs no training data and instead zeroes everything outside a
//!   central spatial support window
//!
//! Data are flat Fortran-order `Complex64` buffers over (spatial, spatial,
//! time) with a caller-chosen time axis; unacquired k-t locations must hold
//! exactly 0+0i. Everything is pure, synchronous computation over the
//! caller's arrays.
//!
//! # Modules
//! - `fft`: k-t <-> x-f spectral transforms (rustfft)
//! - `volume`: axis canonicalization and circular shifts
//! - `pattern`: sheared-lattice sampling pattern helpers
//! - `psf`: sampling-lattice PSF and alias-offset location
//! - `filter`: Wiener-style filter construction
//! - `ktblast`: training-data reconstruction pipeline
//! - `unfold`: training-free spectral-mask reconstruction

pub mod error;
pub mod fft;
pub mod filter;
pub mod ktblast;
pub mod pattern;
pub mod psf;
pub mod unfold;
pub mod volume;

pub use crate::error::KtError;
pub use crate::fft::{from_xf, kt2xf, to_xf, xf2kt, xf2xt};
pub use crate::filter::ktblast_filter;
pub use crate::ktblast::{ktblast, KtBlastConfig};
pub use crate::pattern::{tile_pattern, undersampling_pattern};
pub use crate::psf::{locate_aliases, psf, AliasDetection, PsfCentering};
pub use crate::unfold::unfold;
