use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RadialStatsError {
    OutputTooSmall {
        required: usize,
        got: usize,
    },
    MismatchedMaskShape {
        image_shape: (usize, usize),
        mask_shape: (usize, usize),
    },
    AllocationFailure {
        requested: usize,
    },
    InternalInvariant {
        bin: i32,
        bound: i32,
    },
}

impl fmt::Display for RadialStatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadialStatsError::OutputTooSmall { required, got } => {
                write!(
                    f,
                    "Output buffer too small, needed at least {} entries but got {}.",
                    required, got
                )
            }
            RadialStatsError::MismatchedMaskShape {
                image_shape,
                mask_shape,
            } => {
                write!(
                    f,
                    "Mismatched mask shape, image is {:?} but mask is {:?}.",
                    image_shape, mask_shape
                )
            }
            RadialStatsError::AllocationFailure { requested } => {
                write!(
                    f,
                    "Allocation failure growing an internal cache to {} entries.",
                    requested
                )
            }
            RadialStatsError::InternalInvariant { bin, bound } => {
                write!(
                    f,
                    "Internal invariant violated, radial index bin {} is not less than the populated bound {}.",
                    bin, bound
                )
            }
        }
    }
}

impl error::Error for RadialStatsError {}
