use crate::error::RadialStatsError;

/// A lazily-grown table mapping squared pixel distance to a "Mirage"
/// radial-index bin.
///
/// # Description
///
/// The table implements the Mirage radial-index convention: the three
/// pixels nearest the center (squared distances `0`, `1`, `2`) each get
/// their own bin, and every radial index `n > 1` thereafter corresponds to
/// squared distance `(n - 1)^2`. The table is grown monotonically and never
/// shrinks except via an explicit reset, so the cost of the `sqrt` behind
/// the formula is paid at most once per squared-distance value for the
/// lifetime of the map.
#[derive(Debug, Default)]
pub(crate) struct RadialIndexMap {
    table: Vec<i32>,
}

impl RadialIndexMap {
    pub fn new() -> Self {
        Self { table: Vec::new() }
    }

    /// Grow the table, if needed, to cover every squared distance up to
    /// `rad^2` for the given working radius.
    pub fn ensure_capacity(&mut self, rad: usize) -> Result<(), RadialStatsError> {
        let needed = rad.saturating_mul(rad).saturating_add(1).max(3);
        self.ensure_len(needed)
    }

    fn ensure_len(&mut self, target: usize) -> Result<(), RadialStatsError> {
        if self.table.len() >= target {
            return Ok(());
        }
        let additional = target - self.table.len();
        self.table
            .try_reserve(additional)
            .map_err(|_| RadialStatsError::AllocationFailure { requested: target })?;
        for k in self.table.len()..target {
            self.table.push(rad_ind_for_rad_sq(k));
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.table
    }

    /// Return a fresh copy of the table, first growing it to at least
    /// `n_elt` entries.
    pub fn snapshot(&mut self, n_elt: usize) -> Result<Vec<i32>, RadialStatsError> {
        self.ensure_len(n_elt)?;
        Ok(self.table[..n_elt].to_vec())
    }

    /// Release the cached table, returning the map to its freshly-built
    /// state.
    pub fn free(&mut self) {
        self.table = Vec::new();
    }
}

fn rad_ind_for_rad_sq(k: usize) -> i32 {
    match k {
        0 => 0,
        1 => 1,
        2 => 2,
        _ => ((k as f64).sqrt() + 1.5).floor() as i32,
    }
}

/// Compute the radial-index bin for each squared distance `0..n_elt`.
///
/// # Description
///
/// This function computes the Mirage-convention radial-index table
/// directly, without reading or growing any cache: `radIndByRadSq[0] = 0`,
/// `radIndByRadSq[1] = 1`, `radIndByRadSq[2] = 2`, and
/// `radIndByRadSq[k] = floor(sqrt(k) + 1.5)` for `k >= 3`. Prefer
/// [`crate::RadialEngine::rad_ind_by_rad_sq`] when calling repeatedly with
/// growing radii, since the engine caches the table across calls.
///
/// # Arguments
///
/// * `n_elt`: The number of entries to compute.
///
/// # Returns
///
/// * `Vec<i32>`: The radial-index table, length `n_elt`.
///
/// # Examples
///
/// ```
/// use radprof::rad_ind_by_rad_sq;
///
/// let table = rad_ind_by_rad_sq(10);
///
/// assert_eq!(table, vec![0, 1, 2, 3, 3, 3, 3, 4, 4, 4]);
/// ```
pub fn rad_ind_by_rad_sq(n_elt: usize) -> Vec<i32> {
    (0..n_elt).map(rad_ind_for_rad_sq).collect()
}

/// Compute the squared distance represented by each radial index `0..n_elt`.
///
/// # Description
///
/// This is the inverse of [`rad_ind_by_rad_sq`]: index `n` maps to squared
/// distance `n` for `n < 3`, and to `(n - 1)^2` for `n >= 3`. It is computed
/// directly and does not depend on any cached forward map.
///
/// # Arguments
///
/// * `n_elt`: The number of entries to compute.
///
/// # Returns
///
/// * `Vec<i32>`: The inverse radial-index table, length `n_elt`.
///
/// # Examples
///
/// ```
/// use radprof::rad_sq_by_rad_ind;
///
/// let table = rad_sq_by_rad_ind(6);
///
/// assert_eq!(table, vec![0, 1, 2, 4, 9, 16]);
/// ```
pub fn rad_sq_by_rad_ind(n_elt: usize) -> Vec<i32> {
    (0..n_elt)
        .map(|n| if n < 3 { n as i32 } else { ((n - 1) * (n - 1)) as i32 })
        .collect()
}
