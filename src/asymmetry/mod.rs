pub mod reduction;

pub(crate) use reduction::{unweighted_asymmetry, weighted_asymmetry};
pub use reduction::RadialAsymmetry;
