//! Solver configuration options.

use bitflags::bitflags;

/// Ridge weight applied to the identity term when building the low-rank
/// preconditioner inverse. Fixed constant; not derived from the spectrum.
pub const DEFAULT_RIDGE: f64 = 0.01;

bitflags! {
    /// Which precondition checks run before the explicit-preconditioner
    /// solver starts iterating.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Validation: u32 {
        const SQUARE            = 0b0001;
        const NOT_SINGULAR      = 0b0010;
        const SYMMETRIC         = 0b0100;
        const POSITIVE_DEFINITE = 0b1000;
    }
}

impl Default for Validation {
    /// Shape and singularity checks only. CG runs on non-SPD systems at the
    /// caller's risk, so the symmetry and definiteness checks stay opt-in.
    fn default() -> Self {
        Validation::SQUARE | Validation::NOT_SINGULAR
    }
}
