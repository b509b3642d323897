pub mod radial_stats;
pub use radial_stats::RadialStatsError;
