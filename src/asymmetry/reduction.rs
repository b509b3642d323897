/// Scalar asymmetry result returned by [`crate::RadialEngine::rad_asymm`] and
/// [`crate::RadialEngine::rad_asymm_weighted`], bundled with the radial
/// profile's scalar totals so the caller does not need a second call to get
/// them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialAsymmetry {
    /// The asymmetry scalar. Zero iff every bin with `count > 1` (or, for
    /// the unweighted form, every bin at all) is internally constant.
    pub asymm: f64,
    /// Sum of every unmasked, in-bounds, in-radius pixel value visited.
    pub tot_counts: f64,
    /// Count of every unmasked, in-bounds, in-radius pixel visited.
    pub tot_pts: i64,
}

/// Sum the within-bin variance, weighted by bin population: proportional to
/// the total within-annulus squared scatter, minimised when the annuli are
/// radially homogeneous.
pub(crate) fn unweighted_asymmetry(var: &[f64], n_pts: &[i32], len: usize) -> f64 {
    (0..len).map(|b| var[b] * n_pts[b] as f64).sum()
}

/// Sum the within-bin variance ratioed by expected per-bin noise, so bins
/// dominated by photon shot noise and bins dominated by read noise
/// contribute comparably to the minimiser's objective.
///
/// Bins with `count <= 1` contribute nothing: a single sample carries no
/// variance estimate to weight. The bias is silently floored to the
/// smallest populated-or-empty bin mean first, since a caller-supplied bias
/// larger than every bin mean would otherwise drive `mean - bias` negative
/// and produce a nonsensical noise estimate.
pub(crate) fn weighted_asymmetry(
    mean: &[f64],
    var: &[f64],
    n_pts: &[i32],
    len: usize,
    bias: f64,
    read_noise: f64,
    ccd_gain: f64,
) -> f64 {
    let eff_bias = mean[..len].iter().fold(bias, |acc, &m| acc.min(m));
    let read_noise_term = (read_noise / ccd_gain).powi(2);

    (0..len)
        .filter(|&b| n_pts[b] > 1)
        .map(|b| {
            let count = n_pts[b] as f64;
            let pix_noise_sq = read_noise_term + (mean[b] - eff_bias) / ccd_gain;
            let weight = pix_noise_sq * (2.0 * (count - 1.0)).sqrt() / count;
            var[b] / weight
        })
        .sum()
}
