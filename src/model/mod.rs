//! Data model for zone risk scoring.
//!
//! [`ZoneRecord`] is the validated input for one geographic zone and
//! [`ZoneScore`] is the immutable output of one scoring run. Scores refer to
//! their source record by [`ZoneId`] only.

mod score;
mod zone;

pub use score::{RiskCategory, ZoneScore};
pub use zone::{Geometry, ZoneId, ZoneRecord};

/// Well-known factor names used by the presets and the derived density.
pub mod factors {
    /// Derived as `population / area_km2` unless given explicitly.
    pub const POPULATION_DENSITY: &str = "population_density";
    pub const BIRD_DENSITY: &str = "bird_density";
    pub const WATER_PROXIMITY: &str = "water_proximity";
    /// Higher capacity means lower risk; presets invert it.
    pub const HEALTHCARE_CAPACITY: &str = "healthcare_capacity";
    pub const VULNERABILITY_INDEX: &str = "vulnerability_index";

    /// All well-known factors in their canonical column order.
    pub const ALL: [&str; 5] = [
        POPULATION_DENSITY,
        BIRD_DENSITY,
        WATER_PROXIMITY,
        HEALTHCARE_CAPACITY,
        VULNERABILITY_INDEX,
    ];
}
