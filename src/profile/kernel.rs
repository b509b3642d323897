use ndarray::ArrayView2;

use crate::error::RadialStatsError;
use crate::index::RadialIndexMap;

/// The scalar totals returned alongside a populated radial profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialProfileTotals {
    /// Sum of every unmasked, in-bounds, in-radius pixel value visited.
    pub tot_counts: f64,
    /// Count of every unmasked, in-bounds, in-radius pixel visited.
    pub tot_pts: i64,
}

fn check_output_lengths(
    mean: &[f64],
    var: &[f64],
    n_pts: &[i32],
    required: usize,
) -> Result<(), RadialStatsError> {
    let got = mean.len().min(var.len()).min(n_pts.len());
    if mean.len() != var.len() || var.len() != n_pts.len() || got < required {
        return Err(RadialStatsError::OutputTooSmall { required, got });
    }
    Ok(())
}

fn check_mask_shape(
    image: ArrayView2<f32>,
    mask: Option<ArrayView2<bool>>,
) -> Result<(), RadialStatsError> {
    if let Some(m) = mask {
        if m.dim() != image.dim() {
            return Err(RadialStatsError::MismatchedMaskShape {
                image_shape: image.dim(),
                mask_shape: m.dim(),
            });
        }
    }
    Ok(())
}

fn zero_outputs(mean: &mut [f64], var: &mut [f64], n_pts: &mut [i32]) {
    mean.iter_mut().for_each(|v| *v = 0.0);
    var.iter_mut().for_each(|v| *v = 0.0);
    n_pts.iter_mut().for_each(|v| *v = 0);
}

/// One-pass finalisation of the populated bins: `mean <- mean/count`,
/// `variance <- var/count - mean^2`, clamped to zero to absorb
/// floating-point cancellation noise on constant bins.
fn normalize(mean: &mut [f64], var: &mut [f64], n_pts: &[i32], des_out_len: usize) {
    for b in 0..des_out_len {
        let c = n_pts[b];
        if c != 0 {
            let cf = c as f64;
            let m = mean[b] / cf;
            let mut v = var[b] / cf - m * m;
            if v < 0.0 {
                v = 0.0;
            }
            mean[b] = m;
            var[b] = v;
        }
    }
}

/// Sweep the axis-aligned box of half-width `rad` around `(i_ctr, j_ctr)`,
/// clipped to the image, skipping masked pixels and any pixel `bin_for`
/// maps to `None`, and accumulating raw sums into `mean`/`var`/`n_pts` for
/// the caller to normalize afterwards.
fn sweep_box(
    image: ArrayView2<f32>,
    mask: Option<ArrayView2<bool>>,
    i_ctr: i64,
    j_ctr: i64,
    rad: usize,
    mean: &mut [f64],
    var: &mut [f64],
    n_pts: &mut [i32],
    mut bin_for: impl FnMut(i64) -> Result<Option<usize>, RadialStatsError>,
) -> Result<RadialProfileTotals, RadialStatsError> {
    let (in_len_i, in_len_j) = image.dim();
    let rad_i64 = rad as i64;
    let i_lo = (i_ctr - rad_i64).max(0);
    let i_hi = (i_ctr + rad_i64).min(in_len_i as i64 - 1);
    let j_lo = (j_ctr - rad_i64).max(0);
    let j_hi = (j_ctr + rad_i64).min(in_len_j as i64 - 1);

    let mut tot_counts = 0.0_f64;
    let mut tot_pts: i64 = 0;

    if i_lo <= i_hi && j_lo <= j_hi {
        for ii in i_lo..=i_hi {
            for jj in j_lo..=j_hi {
                if let Some(m) = mask {
                    if m[[ii as usize, jj as usize]] {
                        continue;
                    }
                }
                let di = ii - i_ctr;
                let dj = jj - j_ctr;
                let d_sq = di * di + dj * dj;
                let bin = match bin_for(d_sq)? {
                    Some(b) => b,
                    None => continue,
                };
                let d = image[[ii as usize, jj as usize]] as f64;
                mean[bin] += d;
                var[bin] += d * d;
                n_pts[bin] += 1;
                tot_counts += d;
                tot_pts += 1;
            }
        }
    }

    Ok(RadialProfileTotals { tot_counts, tot_pts })
}

/// Populate a radial profile binned directly by squared distance.
///
/// # Description
///
/// Sweeps the axis-aligned box of half-width `rad` around `(i_ctr, j_ctr)`,
/// clipped to the image, and bins every unmasked visited pixel by its exact
/// squared distance `d_sq` from the center: bin `b = d_sq`, skipping pixels
/// whose squared distance would fall past the output. This does not use the
/// radial-index map and so cannot trigger its allocation.
///
/// # Arguments
///
/// * `image`: The CCD image, row-major `(row, col)`.
/// * `mask`: Optional bad-pixel mask, same shape as `image`. `true` means
///   "ignore this pixel".
/// * `i_ctr`, `j_ctr`: The pixel center. May lie outside the image.
/// * `rad`: The working radius. The output buffers must each hold at least
///   `rad*rad + 1` entries.
/// * `mean`, `var`, `n_pts`: Output buffers, populated in place.
///
/// # Returns
///
/// * `Ok(RadialProfileTotals)`: The total pixel count and total pixel-value
///   sum over every visited, unmasked pixel.
/// * `Err(RadialStatsError::OutputTooSmall)`: If the output buffers are not
///   all the same length, or shorter than `rad*rad + 1`.
/// * `Err(RadialStatsError::MismatchedMaskShape)`: If `mask` is present and
///   does not match `image`'s shape.
pub(crate) fn rad_sq_prof(
    image: ArrayView2<f32>,
    mask: Option<ArrayView2<bool>>,
    i_ctr: i64,
    j_ctr: i64,
    rad: usize,
    mean: &mut [f64],
    var: &mut [f64],
    n_pts: &mut [i32],
) -> Result<RadialProfileTotals, RadialStatsError> {
    check_mask_shape(image, mask)?;
    let required = rad.saturating_mul(rad).saturating_add(1);
    check_output_lengths(mean, var, n_pts, required)?;
    zero_outputs(mean, var, n_pts);

    let totals = sweep_box(image, mask, i_ctr, j_ctr, rad, mean, var, n_pts, |d_sq| {
        if d_sq >= required as i64 {
            Ok(None)
        } else {
            Ok(Some(d_sq as usize))
        }
    })?;

    normalize(mean, var, n_pts, required);
    Ok(totals)
}

/// Populate a radial profile binned by Mirage radial index, growing the
/// radial-index map as needed.
///
/// # Description
///
/// Sweeps the axis-aligned box of half-width `rad` around `(i_ctr, j_ctr)`,
/// clipped to the image, skipping any unmasked pixel whose squared distance
/// exceeds `rad*rad`, and bins the rest through the radial-index map
/// (see [`crate::index`]).
///
/// # Arguments
///
/// * `index`: The radial-index map to grow and read through.
/// * `image`: The CCD image, row-major `(row, col)`.
/// * `mask`: Optional bad-pixel mask, same shape as `image`.
/// * `i_ctr`, `j_ctr`: The pixel center. May lie outside the image.
/// * `rad`: The working radius. The output buffers must each hold at least
///   `rad + 2` entries.
/// * `mean`, `var`, `n_pts`: Output buffers, populated in place.
///
/// # Returns
///
/// * `Ok(RadialProfileTotals)`: The total pixel count and total pixel-value
///   sum over every visited, unmasked pixel.
/// * `Err(RadialStatsError::OutputTooSmall)`: If the output buffers are not
///   all the same length, or shorter than `rad + 2`.
/// * `Err(RadialStatsError::MismatchedMaskShape)`: If `mask` is present and
///   does not match `image`'s shape.
/// * `Err(RadialStatsError::AllocationFailure)`: If growing the radial-index
///   map failed.
/// * `Err(RadialStatsError::InternalInvariant)`: If the radial-index map
///   produced a bin past the populated output range; this signals a bug in
///   the map, not a caller error.
pub(crate) fn rad_prof_with_index(
    index: &mut RadialIndexMap,
    image: ArrayView2<f32>,
    mask: Option<ArrayView2<bool>>,
    i_ctr: i64,
    j_ctr: i64,
    rad: usize,
    mean: &mut [f64],
    var: &mut [f64],
    n_pts: &mut [i32],
) -> Result<RadialProfileTotals, RadialStatsError> {
    check_mask_shape(image, mask)?;
    let required = rad.saturating_add(2);
    check_output_lengths(mean, var, n_pts, required)?;
    zero_outputs(mean, var, n_pts);

    index.ensure_capacity(rad)?;
    let table = index.as_slice();
    let rad_sq = (rad as i64).saturating_mul(rad as i64);

    let totals = sweep_box(image, mask, i_ctr, j_ctr, rad, mean, var, n_pts, |d_sq| {
        if d_sq > rad_sq {
            return Ok(None);
        }
        let bin = table[d_sq as usize];
        if bin as usize >= required {
            return Err(RadialStatsError::InternalInvariant {
                bin,
                bound: required as i32,
            });
        }
        Ok(Some(bin as usize))
    })?;

    normalize(mean, var, n_pts, required);
    Ok(totals)
}
