use crate::error::RadialStatsError;

/// Scratch `(mean, var, count)` buffers backing the asymmetry reductions,
/// grown on demand and reused across calls so a burst of calls from a
/// centroid minimiser does not reallocate per call.
#[derive(Debug, Default)]
pub(crate) struct AccumulatorBuffers {
    mean: Vec<f64>,
    var: Vec<f64>,
    count: Vec<i32>,
}

impl AccumulatorBuffers {
    pub fn new() -> Self {
        Self {
            mean: Vec::new(),
            var: Vec::new(),
            count: Vec::new(),
        }
    }

    /// Grow all three buffers to at least `len` entries. On allocation
    /// failure, all three are released together.
    pub fn ensure_capacity(&mut self, len: usize) -> Result<(), RadialStatsError> {
        if self.mean.len() >= len {
            return Ok(());
        }
        let additional = len - self.mean.len();
        let reserved = self.mean.try_reserve(additional).is_ok()
            && self.var.try_reserve(additional).is_ok()
            && self.count.try_reserve(additional).is_ok();
        if !reserved {
            self.free();
            return Err(RadialStatsError::AllocationFailure { requested: len });
        }
        self.mean.resize(len, 0.0);
        self.var.resize(len, 0.0);
        self.count.resize(len, 0);
        Ok(())
    }

    /// Borrow the leading `len` entries of each buffer as the profile
    /// kernel's output buffers.
    pub fn slices_mut(&mut self, len: usize) -> (&mut [f64], &mut [f64], &mut [i32]) {
        (&mut self.mean[..len], &mut self.var[..len], &mut self.count[..len])
    }

    pub fn free(&mut self) {
        self.mean = Vec::new();
        self.var = Vec::new();
        self.count = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_capacity_grows_all_three_together() {
        let mut buf = AccumulatorBuffers::new();
        buf.ensure_capacity(5).unwrap();
        let (mean, var, count) = buf.slices_mut(5);
        assert_eq!(mean.len(), 5);
        assert_eq!(var.len(), 5);
        assert_eq!(count.len(), 5);
        assert!(mean.iter().all(|&v| v == 0.0));
        assert!(count.iter().all(|&v| v == 0));
    }

    #[test]
    fn ensure_capacity_never_shrinks() {
        let mut buf = AccumulatorBuffers::new();
        buf.ensure_capacity(10).unwrap();
        buf.ensure_capacity(3).unwrap();
        let (mean, _, _) = buf.slices_mut(10);
        assert_eq!(mean.len(), 10);
    }

    #[test]
    fn free_releases_buffers() {
        let mut buf = AccumulatorBuffers::new();
        buf.ensure_capacity(10).unwrap();
        buf.free();
        assert_eq!(buf.mean.len(), 0);
        assert_eq!(buf.var.len(), 0);
        assert_eq!(buf.count.len(), 0);
    }
}
