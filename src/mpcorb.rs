//! MPCORB fixed-width record parsing.
//!
//! The Minor Planet Center distributes osculating elements for the whole
//! asteroid catalog as a fixed-width text file (`MPCORB.DAT`). This module
//! holds the typed record and the column extraction; downloading lives in
//! [`crate::download`] and persistence in [`crate::store`].
//!
//! Column layout (0-based byte offsets, MPC Export Format):
//!
//! ```text
//! 0..7     designation (packed number or provisional designation)
//! 8..13    H, absolute magnitude
//! 14..19   G, slope parameter
//! 20..25   epoch (packed 5-char form)
//! 26..35   M, mean anomaly (deg)
//! 37..46   ω, argument of perihelion (deg)
//! 48..57   Ω, longitude of ascending node (deg)
//! 59..68   i, inclination (deg)
//! 70..79   e, eccentricity
//! 80..91   n, mean motion (deg/day)
//! 92..103  a, semimajor axis (AU)
//! ```

use crate::constants::DEFAULT_SLOPE;

/// Minimum line length for a plausible orbit record.
const MIN_RECORD_LEN: usize = 104;

/// Maximum stored length of a designation.
const MAX_DESIGNATION_LEN: usize = 32;

/// Maximum stored length of a packed epoch.
const MAX_EPOCH_LEN: usize = 16;

/// One asteroid's osculating orbit at a reference epoch, as parsed from an
/// MPCORB record. Angles are degrees, the semimajor axis is in AU and the
/// mean motion in degrees per day.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    /// Official minor-planet number, absent for unnumbered bodies.
    pub number: Option<i64>,
    /// Unique identifier; the upsert key.
    pub designation: String,
    /// Packed 5-char epoch, decoded on demand by [`crate::epoch::unpack_epoch`].
    pub epoch: String,
    pub mean_anomaly: f64,
    pub perihelion_arg: f64,
    pub ascending_node: f64,
    pub inclination: f64,
    pub eccentricity: f64,
    pub mean_motion: f64,
    pub semimajor_axis: f64,
    /// Absolute magnitude H; unknown for some bodies.
    pub absolute_magnitude: Option<f64>,
    /// Slope parameter G, defaulting to the IAU standard 0.15.
    pub slope_parameter: f64,
}

fn field(line: &str, range: std::ops::Range<usize>) -> Option<&str> {
    line.get(range).map(str::trim)
}

fn parse_f64(line: &str, range: std::ops::Range<usize>) -> Option<f64> {
    let s = field(line, range)?;
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

fn parse_i64(line: &str, range: std::ops::Range<usize>) -> Option<i64> {
    let s = field(line, range)?;
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// Parse one line of MPCORB.DAT.
///
/// Return
/// ----------
/// * `Some(ElementRecord)` for a valid orbit record, `None` for short lines,
///   header/separator lines, and records where any of the six orbital
///   elements or the mean motion/semimajor axis fails to parse. Missing H or
///   G are tolerated (H stays unknown, G takes the 0.15 default).
pub fn parse_mpcorb_line(line: &str) -> Option<ElementRecord> {
    if line.len() < MIN_RECORD_LEN {
        return None;
    }

    let designation = field(line, 0..7)?;
    if designation.is_empty() || designation.starts_with("--------") {
        return None;
    }

    // Columns 5-7 hold the trailing digits of the number for numbered bodies.
    let number = parse_i64(line, 4..7);

    let absolute_magnitude = parse_f64(line, 8..13);
    let slope_parameter = parse_f64(line, 14..19).unwrap_or(DEFAULT_SLOPE);
    let epoch = field(line, 20..25)?;

    let mean_anomaly = parse_f64(line, 26..35)?;
    let perihelion_arg = parse_f64(line, 37..46)?;
    let ascending_node = parse_f64(line, 48..57)?;
    let inclination = parse_f64(line, 59..68)?;
    let eccentricity = parse_f64(line, 70..79)?;
    let mean_motion = parse_f64(line, 80..91)?;
    let semimajor_axis = parse_f64(line, 92..103)?;

    Some(ElementRecord {
        number,
        designation: designation.chars().take(MAX_DESIGNATION_LEN).collect(),
        epoch: epoch.chars().take(MAX_EPOCH_LEN).collect(),
        mean_anomaly,
        perihelion_arg,
        ascending_node,
        inclination,
        eccentricity,
        mean_motion,
        semimajor_axis,
        absolute_magnitude,
        slope_parameter,
    })
}

/// True for lines that look like orbit records (used by the ingestion
/// pre-pass to estimate the total without parsing every field).
pub fn looks_like_record(line: &str) -> bool {
    line.len() >= MIN_RECORD_LEN && !line.trim_start().starts_with("--------")
}
