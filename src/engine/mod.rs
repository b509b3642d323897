pub mod radial_engine;

pub use radial_engine::RadialEngine;
