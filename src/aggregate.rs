use crate::model::{AggregateRecord, GroupKey, RawRecord};
use log::{debug, trace};
use std::collections::HashMap;

/// Fold contacts sharing (call, band, 4-char grid) into one record each.
///
/// Groups come out in order of first appearance. The first contact seen
/// stays `first_contact` for good; `last_contact` moves forward whenever a
/// later `QSO_DATE`+`TIME_ON` string sorts strictly greater.
pub fn aggregate(records: &[RawRecord]) -> Vec<AggregateRecord> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut out: Vec<AggregateRecord> = Vec::new();

    for rec in records {
        let key = GroupKey::for_record(rec);
        match index.get(&key) {
            Some(&slot) => {
                let agg = &mut out[slot];
                agg.count += 1;
                if rec.timestamp_key() > agg.last_contact.timestamp_key() {
                    trace!(
                        "{}/{}/{}: last contact -> {}",
                        key.call,
                        key.band,
                        key.grid4,
                        rec.timestamp_key()
                    );
                    agg.last_contact = rec.clone();
                }
            }
            None => {
                trace!("new group {}/{}/{}", key.call, key.band, key.grid4);
                index.insert(key, out.len());
                out.push(AggregateRecord::new(rec.clone()));
            }
        }
    }

    debug!("aggregated {} records into {} groups", records.len(), out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qso(call: &str, band: &str, grid: &str, date: &str, time: &str) -> RawRecord {
        [("CALL", call), ("BAND", band), ("GRIDSQUARE", grid), ("QSO_DATE", date), ("TIME_ON", time)]
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .collect()
    }

    #[test]
    fn later_contact_becomes_last_first_stays() {
        let a = qso("W1AW", "20M", "FN20", "20240101", "1200");
        let b = qso("W1AW", "20M", "FN20", "20240102", "0800");
        let out = aggregate(&[a.clone(), b.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].count, 2);
        assert_eq!(out[0].first_contact, a);
        assert_eq!(out[0].last_contact, b);
        assert_eq!(out[0].fields, a);
    }

    #[test]
    fn first_seen_wins_even_when_earlier_arrives_later() {
        let a = qso("W1AW", "20M", "FN20", "20240105", "1200");
        let b = qso("W1AW", "20M", "FN20", "20231231", "2359");
        let out = aggregate(&[a.clone(), b]);
        assert_eq!(out[0].first_contact, a);
        assert_eq!(out[0].last_contact, a);
    }

    #[test]
    fn equal_timestamp_does_not_replace_last() {
        let a = qso("W1AW", "20M", "FN20", "20240101", "1200");
        let mut b = a.clone();
        b.insert("MODE", "CW");
        let out = aggregate(&[a.clone(), b]);
        assert_eq!(out[0].last_contact, a);
    }

    #[test]
    fn grid_key_uses_four_char_prefix() {
        let recs = [
            qso("W1AW", "20M", "FN20AB", "20240101", "1200"),
            qso("W1AW", "20M", "FN20XY", "20240101", "1300"),
            qso("W1AW", "20M", "FN20", "20240101", "1400"),
        ];
        let out = aggregate(&recs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].count, 3);
        assert_eq!(out[0].fields.gridsquare(), Some("FN20AB"));
    }

    #[test]
    fn missing_fields_group_under_placeholders() {
        let recs = [
            qso("", "", "", "20240101", "1200"),
            qso("", "", "FN", "20240101", "1300"),
            qso("", "40M", "", "20240101", "1300"),
        ];
        let out = aggregate(&recs);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].count, 2);
        let key = out[0].key();
        assert_eq!((key.call.as_str(), key.band.as_str(), key.grid4.as_str()), ("NOCALL", "N/A", "NOGRID"));
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let recs = [
            qso("K1ABC", "40M", "FN42", "20240103", "0000"),
            qso("W1AW", "20M", "FN31", "20240101", "0000"),
            qso("K1ABC", "40M", "FN42", "20240104", "0000"),
            qso("AA1A", "20M", "", "20240102", "0000"),
        ];
        let calls: Vec<_> = aggregate(&recs).iter().map(|a| a.fields.call().unwrap().to_string()).collect();
        assert_eq!(calls, ["K1ABC", "W1AW", "AA1A"]);
    }

    #[test]
    fn reload_is_idempotent() {
        let recs = [
            qso("K1ABC", "40M", "FN42", "20240103", "0000"),
            qso("K1ABC", "40M", "FN42", "20240104", "0000"),
        ];
        assert_eq!(aggregate(&recs), aggregate(&recs));
    }
}
