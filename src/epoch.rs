//! MPC packed-epoch codec.
//!
//! MPCORB records carry their reference epoch as a 5-character packed string:
//! a 2-digit year, one half-month letter (24-letter alphabet skipping `I`,
//! `A` = Jan 1–15, `B` = Jan 16–31, …, `Y` = Dec 16–31) and two day-encoding
//! characters (a digit or `A`–`V` for days 10–31, plus a tenths-of-day digit).
//!
//! Decoding never fails: ingestion must not abort on a single bad record, so
//! any malformed input collapses to the J2000.0 epoch. The outcome is tagged
//! with [`DecodedEpoch`] so callers can still distinguish a real decode from
//! the fallback.

use hifitime::{Epoch, TimeScale};

use crate::constants::{J2000_JD, JDTOMJD, JD, MJD};
use crate::errors::OrreryError;

/// Half-month letters in calendar order, `I` skipped per MPC convention.
const HALF_MONTHS: &str = "ABCDEFGHJKLMNOPQRSTUVWXY";

/// Result of a packed-epoch decode.
///
/// `Defaulted` carries the J2000.0 Julian Date and marks that the input could
/// not be interpreted — a known accuracy compromise, never an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodedEpoch {
    Parsed(JD),
    Defaulted(JD),
}

impl DecodedEpoch {
    pub fn jd(&self) -> JD {
        match self {
            DecodedEpoch::Parsed(jd) | DecodedEpoch::Defaulted(jd) => *jd,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, DecodedEpoch::Defaulted(_))
    }
}

/// Decode a packed 5-character MPC epoch into a Julian Date (TT).
///
/// Arguments
/// -----------------
/// * `packed`: the epoch field as read from an MPCORB record.
///
/// Return
/// ----------
/// * [`DecodedEpoch::Parsed`] with the Julian Date on success,
///   [`DecodedEpoch::Defaulted`] with JD 2451545.0 for any malformed input
///   (wrong length, unknown half-month letter, non-numeric year, or a
///   day/offset combination that is not a valid calendar date).
pub fn unpack_epoch(packed: &str) -> DecodedEpoch {
    match try_unpack(packed.trim()) {
        Some(jd) => DecodedEpoch::Parsed(jd),
        None => DecodedEpoch::Defaulted(J2000_JD),
    }
}

fn try_unpack(packed: &str) -> Option<JD> {
    if packed.len() < 5 || !packed.is_ascii() {
        return None;
    }

    let yy: u32 = packed.get(0..2)?.parse().ok()?;
    let year = if yy < 50 { 2000 + yy } else { 1900 + yy } as i32;

    let half = packed.chars().nth(2)?;
    let half_idx = HALF_MONTHS.find(half)?;
    let month = (half_idx / 2 + 1) as u8;
    let day_offset = (half_idx % 2) as u32 * 15;

    let day_char = packed.chars().nth(3)?;
    let day = if day_char.is_ascii_alphabetic() {
        day_char.to_ascii_uppercase() as u32 - 'A' as u32 + 10
    } else {
        day_char.to_digit(10).unwrap_or(0)
    };

    let frac_char = packed.chars().nth(4)?;
    let frac = frac_char.to_digit(10).map(|d| d as f64 / 10.0).unwrap_or(0.0);

    let day = day + day_offset;
    if day == 0 || day > 31 {
        return None;
    }

    let epoch = Epoch::maybe_from_gregorian(year, month, day as u8, 0, 0, 0, 0, TimeScale::TT)
        .ok()?;
    Some(epoch.to_mjd_tt_days() + JDTOMJD + frac)
}

/// Parse a calendar date in `YYYY-MM-DD` form into the MJD of its 0h UTC.
pub fn parse_date_mjd(date: &str) -> Result<MJD, OrreryError> {
    let invalid = || OrreryError::InvalidDate(date.to_string());

    let mut parts = date.trim().splitn(3, '-');
    let year: i32 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let month: u8 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let day: u8 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;

    let epoch = Epoch::maybe_from_gregorian(year, month, day, 0, 0, 0, 0, TimeScale::UTC)
        .map_err(|_| invalid())?;
    Ok(epoch.to_mjd_utc_days())
}

#[cfg(test)]
mod epoch_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn jd_of(year: i32, month: u8, day: u8) -> f64 {
        Epoch::maybe_from_gregorian(year, month, day, 0, 0, 0, 0, TimeScale::TT)
            .unwrap()
            .to_mjd_tt_days()
            + JDTOMJD
    }

    #[test]
    fn test_valid_epochs() {
        // 2022, half-month A (Jan 1-15), day 2, no fraction.
        let decoded = unpack_epoch("22A20");
        assert!(!decoded.is_defaulted());
        assert_abs_diff_eq!(decoded.jd(), jd_of(2022, 1, 2), epsilon = 1e-9);

        // Second half-month letter adds a 15-day offset.
        let decoded = unpack_epoch("22B20");
        assert_abs_diff_eq!(decoded.jd(), jd_of(2022, 1, 17), epsilon = 1e-9);

        // Letter day encoding: 'G' = 16, half-month X = Dec 1-15.
        let decoded = unpack_epoch("98XG0");
        assert_abs_diff_eq!(decoded.jd(), jd_of(1998, 12, 16), epsilon = 1e-9);

        // Trailing digit is tenths of a day.
        let decoded = unpack_epoch("22A25");
        assert_abs_diff_eq!(decoded.jd(), jd_of(2022, 1, 2) + 0.5, epsilon = 1e-9);

        // Two-digit years >= 50 map to the 1900s.
        let decoded = unpack_epoch("76A20");
        assert_abs_diff_eq!(decoded.jd(), jd_of(1976, 1, 2), epsilon = 1e-9);
    }

    #[test]
    fn test_year_window_boundary() {
        assert_abs_diff_eq!(unpack_epoch("49A20").jd(), jd_of(2049, 1, 2), epsilon = 1e-9);
        assert_abs_diff_eq!(unpack_epoch("50A20").jd(), jd_of(1950, 1, 2), epsilon = 1e-9);
    }

    #[test]
    fn test_malformed_inputs_default_to_j2000() {
        // Non-numeric year field.
        let decoded = unpack_epoch("K22A2");
        assert!(decoded.is_defaulted());
        assert_eq!(decoded.jd(), 2451545.0);

        // Too short.
        assert_eq!(unpack_epoch("22A").jd(), 2451545.0);
        assert_eq!(unpack_epoch("").jd(), 2451545.0);

        // 'I' is not a half-month letter, 'Z' is past December.
        assert_eq!(unpack_epoch("22I20").jd(), 2451545.0);
        assert_eq!(unpack_epoch("22Z20").jd(), 2451545.0);

        // Day char neither digit nor letter yields day 0, not a date.
        assert_eq!(unpack_epoch("22A-0").jd(), 2451545.0);

        // Day + half-month offset past the end of the month.
        assert_eq!(unpack_epoch("22BV0").jd(), 2451545.0);

        assert!(unpack_epoch("22I20").is_defaulted());
    }

    #[test]
    fn test_parse_date_mjd() {
        // 2023-02-08 is MJD 59983.
        assert_abs_diff_eq!(parse_date_mjd("2023-02-08").unwrap(), 59983.0, epsilon = 1e-9);
        assert!(parse_date_mjd("2023-13-01").is_err());
        assert!(parse_date_mjd("not-a-date").is_err());
        assert!(parse_date_mjd("2023-02").is_err());
    }
}
