use crate::adif;
use crate::aggregate::aggregate;
use crate::errors::AppError;
use crate::filter::{ALL, FilterConfig};
use crate::geodesy::{bearing_deg, distance_km};
use crate::locator;
use crate::model::{AggregateRecord, GeoPoint, HomeLocation, RawRecord};
use crate::resolve::{LocationSource, resolve};
use log::{debug, info};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Result of one file load. A reload builds a fresh value; nothing is merged.
#[derive(Clone, Debug, Default)]
pub struct LoadedLog {
    pub records: Vec<RawRecord>,
    pub aggregates: Vec<AggregateRecord>,
}

impl LoadedLog {
    pub fn from_text(text: &str) -> Self {
        let records = adif::parse_adif(text);
        let aggregates = aggregate(&records);
        info!("loaded {} QSOs into {} stations", records.len(), aggregates.len());
        Self { records, aggregates }
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let records = adif::parse_adif_file(path)?;
        let aggregates = aggregate(&records);
        info!("{}: {} QSOs, {} stations", path.display(), records.len(), aggregates.len());
        Ok(Self { records, aggregates })
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    /// `ALL` followed by the distinct bands, sorted.
    pub fn band_options(&self) -> Vec<String> {
        options(self.aggregates.iter().filter_map(|a| a.fields.band()))
    }

    /// `ALL` followed by the distinct modes, sorted.
    pub fn mode_options(&self) -> Vec<String> {
        options(self.aggregates.iter().filter_map(|a| a.fields.mode()))
    }

    /// Resolve every aggregate passing `filter`, with geometry against
    /// `home` when one is set.
    pub fn map_view(&self, filter: &FilterConfig, home: Option<&HomeLocation>) -> MapView {
        let mut contacts = Vec::new();
        let mut overlays = Vec::new();
        let mut seen_cells = HashSet::new();

        for agg in self.aggregates.iter().filter(|a| filter.accept(a)) {
            let Some(pos) = resolve(agg) else {
                debug!("unmapped: {:?}", agg.fields.call());
                continue;
            };
            let geometry = home.map(|h| PathGeometry {
                distance_km: distance_km(h.point, pos.point),
                bearing_deg: bearing_deg(h.point, pos.point),
            });

            if let Some(g) = agg.fields.gridsquare().filter(|g| g.chars().count() >= 4) {
                let cell: String = g.chars().take(4).collect();
                if seen_cells.insert(cell.clone()) {
                    if let Some(bounds) = locator::cell_bounds(&cell) {
                        overlays.push(GridOverlay { grid: cell, bounds });
                    }
                }
            }

            contacts.push(MappedContact {
                aggregate: agg.clone(),
                point: pos.point,
                source: pos.source,
                geometry,
            });
        }

        MapView { total_count: self.total_count(), contacts, overlays }
    }
}

fn options<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct: BTreeSet<&str> = values.collect();
    std::iter::once(ALL)
        .chain(distinct.into_iter().filter(|v| *v != ALL))
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathGeometry {
    pub distance_km: f64,
    pub bearing_deg: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MappedContact {
    pub aggregate: AggregateRecord,
    pub point: GeoPoint,
    pub source: LocationSource,
    pub geometry: Option<PathGeometry>,
}

/// Outline of a 4-character cell that holds at least one mapped contact.
#[derive(Clone, Debug, PartialEq)]
pub struct GridOverlay {
    pub grid: String,
    pub bounds: [GeoPoint; 5],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapView {
    pub total_count: usize,
    pub contacts: Vec<MappedContact>,
    pub overlays: Vec<GridOverlay>,
}

impl MapView {
    pub fn mapped_count(&self) -> usize {
        self.contacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "<CALL:4>W1AW <BAND:3>20M <MODE:3>FT8 <GRIDSQUARE:6>FN31PR <QSO_DATE:8>20240101 <TIME_ON:4>1200 <EOR>\n\
        <CALL:4>W1AW <BAND:3>20M <MODE:2>CW <GRIDSQUARE:4>FN31 <QSO_DATE:8>20240301 <TIME_ON:4>0900 <EOR>\n\
        <CALL:5>G4ABC <BAND:3>40M <MODE:3>SSB <LAT:11>N051 30.000 <LON:11>W000 07.000 <QSO_DATE:8>20240102 <TIME_ON:4>1000 <EOR>\n\
        <CALL:5>VK2XX <BAND:3>20M <MODE:3>FT8 <QSO_DATE:8>20240103 <TIME_ON:4>1000 <EOR>\n";

    #[test]
    fn counts_and_options() {
        let log = LoadedLog::from_text(LOG);
        assert_eq!(log.total_count(), 4);
        assert_eq!(log.aggregates.len(), 3);
        assert_eq!(log.band_options(), ["ALL", "20M", "40M"]);
        assert_eq!(log.mode_options(), ["ALL", "FT8", "SSB"]);
    }

    #[test]
    fn view_without_home_has_no_geometry() {
        let view = LoadedLog::from_text(LOG).map_view(&FilterConfig::default(), None);
        assert_eq!(view.total_count, 4);
        assert_eq!(view.mapped_count(), 2);
        assert!(view.contacts.iter().all(|c| c.geometry.is_none()));
        assert_eq!(view.contacts[0].source, LocationSource::GridCenter("FN31PR".into()));
        assert_eq!(view.contacts[0].aggregate.count, 2);
        assert_eq!(view.contacts[1].source, LocationSource::LatLon);
        assert_eq!(view.overlays.len(), 1);
        assert_eq!(view.overlays[0].grid, "FN31");
    }

    #[test]
    fn view_with_home_and_filter() {
        let home = HomeLocation::from_locator("FN31").unwrap();
        let filter = FilterConfig::new(&["20M".to_string()], &[], None).unwrap();
        let view = LoadedLog::from_text(LOG).map_view(&filter, Some(&home));
        assert_eq!(view.mapped_count(), 1);
        let geo = view.contacts[0].geometry.unwrap();
        assert!(geo.distance_km < 100.0);
        assert!((0.0..360.0).contains(&geo.bearing_deg));
    }

    #[test]
    fn all_sentinel_leads_options() {
        let log = LoadedLog::from_text("<CALL:2>A1 <BAND:4>160M <EOR><CALL:2>B1 <BAND:3>10M <EOR>");
        assert_eq!(log.band_options(), ["ALL", "10M", "160M"]);
    }

    #[test]
    fn empty_input() {
        let log = LoadedLog::from_text("");
        assert_eq!(log.total_count(), 0);
        assert_eq!(log.band_options(), ["ALL"]);
        assert_eq!(log.map_view(&FilterConfig::default(), None), MapView::default());
    }
}
