use std::collections::BTreeMap;

pub const TAG_CALL: &str = "CALL";
pub const TAG_BAND: &str = "BAND";
pub const TAG_MODE: &str = "MODE";
pub const TAG_GRIDSQUARE: &str = "GRIDSQUARE";
pub const TAG_QSO_DATE: &str = "QSO_DATE";
pub const TAG_TIME_ON: &str = "TIME_ON";
pub const TAG_LAT: &str = "LAT";
pub const TAG_LON: &str = "LON";

pub const NO_CALL: &str = "NOCALL";
pub const NO_BAND: &str = "N/A";
pub const NO_GRID: &str = "NOGRID";
pub const NO_MODE: &str = "N/A";

/// One decoded log entry: upper-cased tag -> trimmed value.
///
/// A repeated tag inside the same entry keeps the last value seen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(tag.into(), value.into());
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields.get(tag).map(String::as_str)
    }

    /// Like [`get`](Self::get), but an empty value counts as absent.
    pub fn value(&self, tag: &str) -> Option<&str> {
        self.get(tag).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn call(&self) -> Option<&str> { self.value(TAG_CALL) }
    pub fn band(&self) -> Option<&str> { self.value(TAG_BAND) }
    pub fn mode(&self) -> Option<&str> { self.value(TAG_MODE) }
    pub fn gridsquare(&self) -> Option<&str> { self.value(TAG_GRIDSQUARE) }

    /// `QSO_DATE` followed by `TIME_ON`, missing parts contributing nothing.
    ///
    /// Ordering these strings is only chronological when both fields are
    /// fixed-width and zero-padded (YYYYMMDD, HHMM or HHMMSS).
    pub fn timestamp_key(&self) -> String {
        let mut s = String::with_capacity(14);
        s.push_str(self.get(TAG_QSO_DATE).unwrap_or(""));
        s.push_str(self.get(TAG_TIME_ON).unwrap_or(""));
        s
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut r = RawRecord::new();
        for (k, v) in iter {
            r.insert(k, v);
        }
        r
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Identity of an aggregate: call, band and 4-character grid prefix,
/// each replaced by its placeholder when absent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub call: String,
    pub band: String,
    pub grid4: String,
}

impl GroupKey {
    pub fn for_record(r: &RawRecord) -> Self {
        let grid4 = r
            .gridsquare()
            .filter(|g| g.chars().count() >= 4)
            .map(|g| g.chars().take(4).collect())
            .unwrap_or_else(|| NO_GRID.to_string());
        Self {
            call: r.call().unwrap_or(NO_CALL).to_string(),
            band: r.band().unwrap_or(NO_BAND).to_string(),
            grid4,
        }
    }
}

/// Repeated contacts folded into one entry. `fields` are those of the
/// first contact seen for the group.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateRecord {
    pub fields: RawRecord,
    pub count: usize,
    pub first_contact: RawRecord,
    pub last_contact: RawRecord,
}

impl AggregateRecord {
    pub fn new(first: RawRecord) -> Self {
        Self {
            fields: first.clone(),
            count: 1,
            first_contact: first.clone(),
            last_contact: first,
        }
    }

    pub fn key(&self) -> GroupKey {
        GroupKey::for_record(&self.fields)
    }
}

/// User-chosen reference station. Replaced wholesale, never edited in place.
#[derive(Clone, Debug, PartialEq)]
pub struct HomeLocation {
    pub point: GeoPoint,
    pub grid: String,
}
