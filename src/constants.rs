//! # Constants and type definitions for orrery
//!
//! Centralizes the **physical constants**, **conversion factors**, and common
//! type aliases used throughout the crate, together with the tunable sampling
//! parameters of the visibility pipeline.

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00 TT)
pub const J2000_JD: f64 = 2451545.0;

/// Mean obliquity of the ecliptic at J2000, degrees (IAU 2006 value truncated
/// to the precision used by the photometric pipeline)
pub const OBLIQUITY_J2000_DEG: f64 = 23.4392911;

/// Sentinel apparent magnitude meaning "unknown / effectively invisible"
pub const MAG_UNKNOWN: f64 = 99.0;

/// IAU default slope parameter G for asteroids lacking a measured value
pub const DEFAULT_SLOPE: f64 = 0.15;

/// Solar altitude defining astronomical twilight, degrees
pub const TWILIGHT_ALT_DEG: f64 = -18.0;

/// Number of solar-altitude samples used to bracket the night window
pub const NIGHT_GRID_SAMPLES: usize = 200;

/// Number of instants sampled across the night for each candidate body
pub const NIGHT_SAMPLE_COUNT: usize = 20;

/// Angle in degrees
pub type Degree = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Julian Date (days)
pub type JD = f64;
