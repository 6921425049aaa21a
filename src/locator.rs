//! Maidenhead grid locators.
//!
//! A locator is read in character pairs: field (`A`..=`R`, 20° lon × 10° lat),
//! square (`0`..=`9`, 2° × 1°) and an optional subsquare (`A`..=`X`,
//! 5' × 2.5'). Decoding lands on the center of the smallest box given;
//! an extended-square digit pair after the subsquare is accepted but
//! does not refine the position.

use crate::errors::AppError;
use crate::model::{GeoPoint, HomeLocation};

const FIELD_LON_DEG: f64 = 20.0;
const FIELD_LAT_DEG: f64 = 10.0;
const SQUARE_LON_DEG: f64 = 2.0;
const SQUARE_LAT_DEG: f64 = 1.0;
const SUBSQUARE_LON_DEG: f64 = 5.0 / 60.0;
const SUBSQUARE_LAT_DEG: f64 = 2.5 / 60.0;

/// A decoded locator: the box center and the normalized locator text.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPoint {
    pub point: GeoPoint,
    pub grid: String,
}

/// Decode a 4-, 6- or 8-character locator to the center of its box.
///
/// Input is trimmed and upper-cased. Anything shorter than 4 characters,
/// of odd length, or outside the locator alphabet yields `None`.
pub fn decode(locator: &str) -> Option<GridPoint> {
    let g = locator.trim().to_ascii_uppercase();
    let b = g.as_bytes();
    if !matches!(b.len(), 4 | 6 | 8) {
        return None;
    }
    if b.len() == 8 {
        digit(b[6])?;
        digit(b[7])?;
    }

    let mut lon = letter(b[0], b'R')? * FIELD_LON_DEG - 180.0;
    let mut lat = letter(b[1], b'R')? * FIELD_LAT_DEG - 90.0;
    lon += digit(b[2])? * SQUARE_LON_DEG;
    lat += digit(b[3])? * SQUARE_LAT_DEG;

    if b.len() >= 6 {
        lon += letter(b[4], b'X')? * SUBSQUARE_LON_DEG;
        lat += letter(b[5], b'X')? * SUBSQUARE_LAT_DEG;
        lon += SUBSQUARE_LON_DEG / 2.0;
        lat += SUBSQUARE_LAT_DEG / 2.0;
    } else {
        lon += SQUARE_LON_DEG / 2.0;
        lat += SQUARE_LAT_DEG / 2.0;
    }

    Some(GridPoint { point: GeoPoint { lat, lon }, grid: g })
}

/// Closed outline of the 4-character cell holding `locator`:
/// SW, NW, NE, SE, SW.
pub fn cell_bounds(locator: &str) -> Option<[GeoPoint; 5]> {
    let prefix: String = locator.trim().chars().take(4).collect();
    let center = decode(&prefix)?.point;
    let sw_lat = center.lat - SQUARE_LAT_DEG / 2.0;
    let sw_lon = center.lon - SQUARE_LON_DEG / 2.0;
    let ne_lat = sw_lat + SQUARE_LAT_DEG;
    let ne_lon = sw_lon + SQUARE_LON_DEG;
    let sw = GeoPoint::new(sw_lat, sw_lon);
    Some([
        sw,
        GeoPoint::new(ne_lat, sw_lon),
        GeoPoint::new(ne_lat, ne_lon),
        GeoPoint::new(sw_lat, ne_lon),
        sw,
    ])
}

/// Locator of the box containing `p`, with 2, 4 or 6 characters.
pub fn encode(p: GeoPoint, precision: usize) -> Option<String> {
    if !matches!(precision, 2 | 4 | 6) || !p.lat.is_finite() || !p.lon.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&p.lat) || !(-180.0..=180.0).contains(&p.lon) {
        return None;
    }
    // The north pole and antimeridian belong to the last box.
    let lon = (p.lon + 180.0).min(360.0 - 1e-9);
    let lat = (p.lat + 90.0).min(180.0 - 1e-9);

    let mut s = String::with_capacity(precision);
    let f_lon = (lon / FIELD_LON_DEG).floor();
    let f_lat = (lat / FIELD_LAT_DEG).floor();
    s.push((b'A' + f_lon as u8) as char);
    s.push((b'A' + f_lat as u8) as char);
    if precision == 2 {
        return Some(s);
    }

    let r_lon = lon - f_lon * FIELD_LON_DEG;
    let r_lat = lat - f_lat * FIELD_LAT_DEG;
    let sq_lon = (r_lon / SQUARE_LON_DEG).floor().min(9.0);
    let sq_lat = (r_lat / SQUARE_LAT_DEG).floor().min(9.0);
    s.push((b'0' + sq_lon as u8) as char);
    s.push((b'0' + sq_lat as u8) as char);
    if precision == 4 {
        return Some(s);
    }

    let r_lon = r_lon - sq_lon * SQUARE_LON_DEG;
    let r_lat = r_lat - sq_lat * SQUARE_LAT_DEG;
    let ss_lon = (r_lon / SUBSQUARE_LON_DEG).floor().min(23.0);
    let ss_lat = (r_lat / SUBSQUARE_LAT_DEG).floor().min(23.0);
    s.push((b'A' + ss_lon as u8) as char);
    s.push((b'A' + ss_lat as u8) as char);
    Some(s)
}

#[inline]
fn letter(c: u8, last: u8) -> Option<f64> {
    (b'A'..=last).contains(&c).then(|| (c - b'A') as f64)
}

#[inline]
fn digit(c: u8) -> Option<f64> {
    c.is_ascii_digit().then(|| (c - b'0') as f64)
}

impl HomeLocation {
    pub fn from_locator(locator: &str) -> Result<Self, AppError> {
        let gp = decode(locator).ok_or_else(|| AppError::InvalidLocator(locator.trim().to_string()))?;
        Ok(HomeLocation { point: gp.point, grid: gp.grid })
    }

    pub fn describe(&self) -> String {
        format!("Set to {} ({:.2}, {:.2})", self.grid, self.point.lat, self.point.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn too_short_is_rejected() {
        assert!(decode("").is_none());
        assert!(decode("AB").is_none());
        assert!(decode("  FN2 ").is_none());
    }

    #[test]
    fn malformed_is_rejected() {
        assert!(decode("FNX0").is_none());
        assert!(decode("ZZ00").is_none());
        assert!(decode("FN20A").is_none());
        assert!(decode("FN20AZ").is_none());
        assert!(decode("FN20AAX1").is_none());
    }

    #[test]
    fn four_char_center() {
        // F=5: 5*20-180+2*2+1 = -75; N=13: 13*10-90+0+0.5 = 40.5
        let gp = decode("FN20").unwrap();
        assert!(close(gp.point.lon, -75.0));
        assert!(close(gp.point.lat, 40.5));
        assert_eq!(gp.grid, "FN20");
    }

    #[test]
    fn six_char_center() {
        // FN31pr: lon -80+6+15*5/60+2.5/60, lat 40+1+17*2.5/60+1.25/60
        let gp = decode(" fn31pr ").unwrap();
        assert!(close(gp.point.lon, -74.0 + 75.0 / 60.0 + 2.5 / 60.0));
        assert!(close(gp.point.lat, 41.0 + 42.5 / 60.0 + 1.25 / 60.0));
        assert_eq!(gp.grid, "FN31PR");
    }

    #[test]
    fn extended_square_keeps_subsquare_center() {
        let six = decode("FN31PR").unwrap();
        let eight = decode("FN31PR42").unwrap();
        assert_eq!(six.point, eight.point);
        assert_eq!(eight.grid, "FN31PR42");
    }

    #[test]
    fn bounds_are_closed_ring_around_four_char_cell() {
        let b = cell_bounds("FN20xy").unwrap();
        assert_eq!(b[0], b[4]);
        assert!(close(b[0].lat, 40.0) && close(b[0].lon, -76.0));
        assert!(close(b[1].lat, 41.0) && close(b[1].lon, -76.0));
        assert!(close(b[2].lat, 41.0) && close(b[2].lon, -74.0));
        assert!(close(b[3].lat, 40.0) && close(b[3].lon, -74.0));
        assert!(cell_bounds("F").is_none());
    }

    #[test]
    fn encode_known_points() {
        assert_eq!(encode(GeoPoint::new(40.5, -75.0), 4).as_deref(), Some("FN20"));
        assert_eq!(encode(GeoPoint::new(40.5, -75.0), 2).as_deref(), Some("FN"));
        assert_eq!(encode(GeoPoint::new(90.0, 180.0), 4).as_deref(), Some("RR99"));
        assert!(encode(GeoPoint::new(91.0, 0.0), 4).is_none());
        assert!(encode(GeoPoint::new(0.0, 0.0), 3).is_none());
    }

    #[test]
    fn home_location_echoes_normalized_grid() {
        let home = HomeLocation::from_locator(" fn20 ").unwrap();
        assert_eq!(home.grid, "FN20");
        assert_eq!(home.describe(), "Set to FN20 (40.50, -75.00)");
        assert!(matches!(HomeLocation::from_locator("XY"), Err(AppError::InvalidLocator(_))));
    }

    fn grid4() -> impl Strategy<Value = String> {
        (0u8..18, 0u8..18, 0u8..10, 0u8..10).prop_map(|(a, b, c, d)| {
            format!("{}{}{}{}", (b'A' + a) as char, (b'A' + b) as char, c, d)
        })
    }

    proptest! {
        #[test]
        fn four_char_round_trip_stays_in_cell(g in grid4()) {
            let gp = decode(&g).unwrap();
            let bounds = cell_bounds(&g).unwrap();
            prop_assert!(gp.point.lat > bounds[0].lat && gp.point.lat < bounds[1].lat);
            prop_assert!(gp.point.lon > bounds[0].lon && gp.point.lon < bounds[2].lon);
            prop_assert_eq!(encode(gp.point, 4).unwrap(), g);
        }

        #[test]
        fn six_char_round_trip(g in grid4(), x in 0u8..24, y in 0u8..24) {
            let loc = format!("{}{}{}", g, (b'A' + x) as char, (b'A' + y) as char);
            let gp = decode(&loc).unwrap();
            prop_assert_eq!(encode(gp.point, 6).unwrap(), loc);
        }
    }
}
