use ndarray::ArrayView2;

use crate::accumulate::AccumulatorBuffers;
use crate::asymmetry::{unweighted_asymmetry, weighted_asymmetry, RadialAsymmetry};
use crate::error::RadialStatsError;
use crate::index::RadialIndexMap;
use crate::profile::{rad_prof_with_index, rad_sq_prof, RadialProfileTotals};

/// Owner of the radial-index map and accumulator-buffer caches, and the
/// entry point for every radial-statistics operation.
///
/// # Description
///
/// A `RadialEngine` replaces the process-wide mutable globals of the
/// original C core with an explicit value type: construct one per thread
/// (or guard a shared one behind a lock), and its caches grow monotonically
/// across calls of increasing radius without ever reallocating per call.
/// Nothing about `RadialEngine` is `Sync`-shareable without external
/// synchronisation, since every method that can grow a cache takes `&mut self`.
///
/// Dropping a `RadialEngine` releases its caches like any other owned
/// `Vec`-backed value; [`RadialEngine::free_caches`] exists for callers that
/// want to release the caches deterministically without dropping the
/// engine itself (e.g. to reclaim memory between widely-spaced, very large
/// radius calls).
#[derive(Debug, Default)]
pub struct RadialEngine {
    index: RadialIndexMap,
    accum: AccumulatorBuffers,
}

impl RadialEngine {
    /// Construct a new engine with empty caches.
    pub fn new() -> Self {
        Self {
            index: RadialIndexMap::new(),
            accum: AccumulatorBuffers::new(),
        }
    }

    /// Release the radial-index map and accumulator buffers, returning the
    /// engine to its freshly-constructed state.
    pub fn free_caches(&mut self) {
        self.index.free();
        self.accum.free();
    }

    /// Populate a radial profile binned by squared distance. See
    /// [`crate::profile`] for the algorithm.
    ///
    /// Does not touch the radial-index map and so never allocates it;
    /// callable through a shared `&RadialEngine`.
    pub fn rad_sq_prof(
        &self,
        image: ArrayView2<f32>,
        mask: Option<ArrayView2<bool>>,
        center: (i64, i64),
        rad: usize,
        mean: &mut [f64],
        var: &mut [f64],
        n_pts: &mut [i32],
    ) -> Result<RadialProfileTotals, RadialStatsError> {
        rad_sq_prof(image, mask, center.0, center.1, rad, mean, var, n_pts)
    }

    /// Populate a radial profile binned by Mirage radial index, growing the
    /// radial-index map as needed. See [`crate::profile`] for the
    /// algorithm.
    pub fn rad_prof(
        &mut self,
        image: ArrayView2<f32>,
        mask: Option<ArrayView2<bool>>,
        center: (i64, i64),
        rad: usize,
        mean: &mut [f64],
        var: &mut [f64],
        n_pts: &mut [i32],
    ) -> Result<RadialProfileTotals, RadialStatsError> {
        rad_prof_with_index(
            &mut self.index,
            image,
            mask,
            center.0,
            center.1,
            rad,
            mean,
            var,
            n_pts,
        )
    }

    /// Compute the unweighted radial asymmetry about `center`.
    ///
    /// # Description
    ///
    /// Delegates to [`RadialEngine::rad_prof`] using the engine's internal
    /// accumulator buffers, then sums `variance[b] * count[b]` over every
    /// bin. The result is proportional to the total within-annulus squared
    /// scatter and is zero iff every annulus is internally constant, in
    /// particular zero for a perfectly radially-symmetric image centered
    /// on the true center.
    ///
    /// # Arguments
    ///
    /// * `image`: The CCD image, row-major `(row, col)`.
    /// * `mask`: Optional bad-pixel mask, same shape as `image`. `true`
    ///   means "ignore this pixel".
    /// * `center`: The `(i, j)` pixel center. May lie outside the image.
    /// * `rad`: The working radius.
    ///
    /// # Returns
    ///
    /// * `Ok(RadialAsymmetry)`: `asymm = 0.0` with `tot_pts = 0` if the
    ///   sweep visited no unmasked in-bounds pixels; otherwise the
    ///   asymmetry scalar and totals.
    /// * `Err(RadialStatsError)`: See [`crate::error::RadialStatsError`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::Array2;
    /// use radprof::RadialEngine;
    ///
    /// let image = Array2::from_elem((5, 5), 10.0f32);
    /// let mut engine = RadialEngine::new();
    /// let result = engine.rad_asymm(image.view(), None, (2, 2), 2).unwrap();
    ///
    /// assert_eq!(result.asymm, 0.0);
    /// ```
    pub fn rad_asymm(
        &mut self,
        image: ArrayView2<f32>,
        mask: Option<ArrayView2<bool>>,
        center: (i64, i64),
        rad: usize,
    ) -> Result<RadialAsymmetry, RadialStatsError> {
        let required = rad.saturating_add(2);
        self.accum.ensure_capacity(required)?;
        let totals = {
            let (mean, var, n_pts) = self.accum.slices_mut(required);
            rad_prof_with_index(
                &mut self.index,
                image,
                mask,
                center.0,
                center.1,
                rad,
                mean,
                var,
                n_pts,
            )?
        };

        if totals.tot_pts == 0 {
            return Ok(RadialAsymmetry {
                asymm: 0.0,
                tot_counts: 0.0,
                tot_pts: 0,
            });
        }

        let (_, var, n_pts) = self.accum.slices_mut(required);
        let asymm = unweighted_asymmetry(var, n_pts, required);
        Ok(RadialAsymmetry {
            asymm,
            tot_counts: totals.tot_counts,
            tot_pts: totals.tot_pts,
        })
    }

    /// Compute the pixel-noise-weighted radial asymmetry about `center`.
    ///
    /// # Description
    ///
    /// Delegates to [`RadialEngine::rad_prof`] as [`RadialEngine::rad_asymm`]
    /// does, then ratios each bin's variance by its expected noise given
    /// CCD gain, read noise and bias, so bins dominated by photon shot
    /// noise and bins dominated by read noise contribute comparably to the
    /// sum. `bias` is silently floored to the smallest bin mean before use
    /// (see [`crate::asymmetry`]).
    ///
    /// # Arguments
    ///
    /// * `image`, `mask`, `center`, `rad`: As in [`RadialEngine::rad_asymm`].
    /// * `bias`: The CCD bias, in ADU.
    /// * `read_noise`: The CCD read noise, in electrons.
    /// * `ccd_gain`: The CCD gain, in electrons per ADU.
    ///
    /// # Returns
    ///
    /// * `Ok(RadialAsymmetry)`: As in [`RadialEngine::rad_asymm`].
    /// * `Err(RadialStatsError)`: See [`crate::error::RadialStatsError`].
    pub fn rad_asymm_weighted(
        &mut self,
        image: ArrayView2<f32>,
        mask: Option<ArrayView2<bool>>,
        center: (i64, i64),
        rad: usize,
        bias: f64,
        read_noise: f64,
        ccd_gain: f64,
    ) -> Result<RadialAsymmetry, RadialStatsError> {
        let required = rad.saturating_add(2);
        self.accum.ensure_capacity(required)?;
        let totals = {
            let (mean, var, n_pts) = self.accum.slices_mut(required);
            rad_prof_with_index(
                &mut self.index,
                image,
                mask,
                center.0,
                center.1,
                rad,
                mean,
                var,
                n_pts,
            )?
        };

        if totals.tot_pts == 0 {
            return Ok(RadialAsymmetry {
                asymm: 0.0,
                tot_counts: 0.0,
                tot_pts: 0,
            });
        }

        let (mean, var, n_pts) = self.accum.slices_mut(required);
        let asymm = weighted_asymmetry(mean, var, n_pts, required, bias, read_noise, ccd_gain);
        Ok(RadialAsymmetry {
            asymm,
            tot_counts: totals.tot_counts,
            tot_pts: totals.tot_pts,
        })
    }

    /// Return a fresh copy of the radial-index table, growing the cached
    /// map to at least `n_elt` entries first. Prefer the free function
    /// [`crate::rad_ind_by_rad_sq`] for one-off queries that do not need
    /// the cache.
    pub fn rad_ind_by_rad_sq(&mut self, n_elt: usize) -> Result<Vec<i32>, RadialStatsError> {
        self.index.snapshot(n_elt)
    }

    /// Compute the inverse radial-index table directly. Does not read or
    /// grow the cached forward map.
    pub fn rad_sq_by_rad_ind(&self, n_elt: usize) -> Vec<i32> {
        crate::index::rad_sq_by_rad_ind(n_elt)
    }
}
