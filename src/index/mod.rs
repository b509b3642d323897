pub mod radial_index_map;

pub(crate) use radial_index_map::RadialIndexMap;
pub use radial_index_map::{rad_ind_by_rad_sq, rad_sq_by_rad_ind};
