//! Observing-site representation.
//!
//! A much lighter cousin of a full MPC observatory registry: the visibility
//! pipeline only needs geodetic coordinates to evaluate topocentric altitudes,
//! so the site is a plain value type constructed from CLI arguments.

use crate::constants::{Degree, Meter};

/// Geodetic location of the observer.
///
/// Units
/// -----------------
/// * `longitude`: degrees, east positive.
/// * `latitude`: degrees, north positive.
/// * `elevation`: meters above sea level. Recorded for the site but not yet
///   folded into the altitude model, which ignores horizon dip the same way
///   it ignores refraction and diurnal parallax.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    pub longitude: Degree,
    pub latitude: Degree,
    pub elevation: Meter,
}

impl Observer {
    pub fn new(latitude: Degree, longitude: Degree, elevation: Meter) -> Self {
        Observer {
            longitude,
            latitude,
            elevation,
        }
    }
}
