use crate::errors::AppError;
use crate::model::{RawRecord, TAG_QSO_DATE, TAG_TIME_ON};
use crate::pipeline::MappedContact;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Other(format!("unknown output format {:?}", other))),
        }
    }
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// One output line per mapped contact.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactRow {
    pub call: String,
    pub band: String,
    pub mode: String,
    pub grid: String,
    pub count: usize,
    pub first_contact: String,
    pub last_contact: String,
    pub lat: f64,
    pub lon: f64,
    pub source: String,
    pub distance_km: Option<f64>,
    pub bearing_deg: Option<f64>,
}

impl ContactRow {
    pub fn from_contact(c: &MappedContact, tz: Option<Tz>) -> Self {
        let f = &c.aggregate.fields;
        Self {
            call: f.call().unwrap_or("N/A").to_string(),
            band: f.band().unwrap_or("N/A").to_string(),
            mode: f.mode().unwrap_or("N/A").to_string(),
            grid: f.gridsquare().unwrap_or_default().to_string(),
            count: c.aggregate.count,
            first_contact: format_contact_time(&c.aggregate.first_contact, tz),
            last_contact: format_contact_time(&c.aggregate.last_contact, tz),
            lat: round(c.point.lat, 4),
            lon: round(c.point.lon, 4),
            source: c.source.to_string(),
            distance_km: c.geometry.map(|g| g.distance_km.round()),
            bearing_deg: c.geometry.map(|g| g.bearing_deg.round()),
        }
    }
}

#[inline]
fn round(v: f64, places: i32) -> f64 {
    let m = 10f64.powi(places);
    (v * m).round() / m
}

/// `QSO_DATE`/`TIME_ON` (UTC) as `%Y-%m-%d %H:%M:%S`, shifted into `tz`
/// when given. Unparseable values come back as the raw concatenation.
pub fn format_contact_time(r: &RawRecord, tz: Option<Tz>) -> String {
    const OUT_FMT: &str = "%Y-%m-%d %H:%M:%S";

    let date = r.get(TAG_QSO_DATE).unwrap_or("");
    let time = r.get(TAG_TIME_ON).unwrap_or("");
    let parsed = (date.len() == 8)
        .then(|| NaiveDate::parse_from_str(date, "%Y%m%d").ok())
        .flatten()
        .and_then(|d| {
            let t = match time.len() {
                4 => NaiveTime::parse_from_str(time, "%H%M").ok()?,
                6 => NaiveTime::parse_from_str(time, "%H%M%S").ok()?,
                0 => NaiveTime::from_hms_opt(0, 0, 0)?,
                _ => return None,
            };
            Some(NaiveDateTime::new(d, t))
        });

    match (parsed, tz) {
        (Some(ndt), Some(tz)) => tz.from_utc_datetime(&ndt).format(OUT_FMT).to_string(),
        (Some(ndt), None) => Utc.from_utc_datetime(&ndt).format(OUT_FMT).to_string(),
        (None, _) => r.timestamp_key(),
    }
}

pub fn write_contacts(
    contacts: &[MappedContact],
    out_path: &Path,
    format: OutputFormat,
    tz: Option<Tz>,
) -> Result<(), AppError> {
    let file = File::create(out_path)
        .map_err(|e| AppError::IO(format!("open out {}: {}", out_path.display(), e)))?;
    let rows: Vec<ContactRow> = contacts.iter().map(|c| ContactRow::from_contact(c, tz)).collect();
    match format {
        OutputFormat::Csv => write_csv(&rows, file)?,
        OutputFormat::Json => write_json(&rows, BufWriter::new(file))?,
    }
    info!("wrote {} rows to {}", rows.len(), out_path.display());
    Ok(())
}

pub fn write_csv<W: Write>(rows: &[ContactRow], out: W) -> Result<(), AppError> {
    // Header is written even when there are no rows.
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record([
        "call", "band", "mode", "grid", "count", "first_contact", "last_contact",
        "lat", "lon", "source", "distance_km", "bearing_deg",
    ])?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| AppError::IO(format!("csv flush: {}", e)))?;
    Ok(())
}

pub fn write_json<W: Write>(rows: &[ContactRow], mut out: W) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
