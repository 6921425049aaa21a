use crate::locator;
use crate::model::{AggregateRecord, GeoPoint, TAG_LAT, TAG_LON};
use log::trace;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum LocationSource {
    /// Center of the decoded locator, which may carry 6 characters.
    GridCenter(String),
    LatLon,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSource::GridCenter(g) => write!(f, "Grid Center ({})", g),
            LocationSource::LatLon => f.write_str("LAT/LON"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPosition {
    pub point: GeoPoint,
    pub source: LocationSource,
}

/// Where to plot an aggregate: its `GRIDSQUARE` when that decodes,
/// otherwise explicit `LAT`/`LON` when both parse to non-zero degrees.
pub fn resolve(agg: &AggregateRecord) -> Option<ResolvedPosition> {
    if let Some(gp) = agg.fields.gridsquare().and_then(locator::decode) {
        return Some(ResolvedPosition {
            point: gp.point,
            source: LocationSource::GridCenter(gp.grid),
        });
    }

    // A coordinate of exactly 0 counts as missing, same as an absent field.
    let lat = agg.fields.get(TAG_LAT).and_then(|v| parse_coordinate(v, 90.0)).filter(|v| *v != 0.0);
    let lon = agg.fields.get(TAG_LON).and_then(|v| parse_coordinate(v, 180.0)).filter(|v| *v != 0.0);
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(ResolvedPosition {
            point: GeoPoint { lat, lon },
            source: LocationSource::LatLon,
        }),
        _ => {
            trace!("no position for {:?}", agg.fields.call());
            None
        }
    }
}

/// Decimal degrees, or the ADIF `XDDD MM.MMM` form (`N040 30.000`).
fn parse_coordinate(s: &str, limit: f64) -> Option<f64> {
    let s = s.trim();
    let v = match s.as_bytes().first()? {
        b'N' | b'S' | b'E' | b'W' => {
            let sign = if matches!(s.as_bytes()[0], b'S' | b'W') { -1.0 } else { 1.0 };
            let (deg, min) = s[1..].trim().split_once(' ')?;
            let deg = deg.parse::<f64>().ok()?;
            let min = min.trim().parse::<f64>().ok()?;
            if !(0.0..60.0).contains(&min) {
                return None;
            }
            sign * (deg + min / 60.0)
        }
        _ => s.parse::<f64>().ok()?,
    };
    (v.is_finite() && v.abs() <= limit).then_some(v)
}
