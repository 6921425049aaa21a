use crate::errors::AppError;
use crate::model::RawRecord;
use log::{trace, warn};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const EOR: &str = "<EOR>";
const EOH: &str = "<EOH>";

pub fn parse_adif_file(path: &Path) -> Result<Vec<RawRecord>, AppError> {
    let f = File::open(path).map_err(|e| AppError::IO(format!("open {}: {}", path.display(), e)))?;
    parse_adif_reader(BufReader::new(f))
}

pub fn parse_adif_reader<R: Read>(mut reader: R) -> Result<Vec<RawRecord>, AppError> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| AppError::IO(format!("read: {}", e)))?;
    // Logs from older loggers are often Latin-1; never fail on encoding.
    let text = String::from_utf8_lossy(&buf);
    Ok(parse_adif(&text))
}

/// Split ADIF text into records and extract `<TAG:LEN>VALUE` fields.
///
/// The whole input is upper-cased first. Segments are cut at `<EOR>`; a
/// segment containing `<EOH>` is the header and is dropped, as is any
/// segment that yields no fields. Never fails.
pub fn parse_adif(text: &str) -> Vec<RawRecord> {
    let upper = text.to_uppercase();
    let mut out = Vec::new();

    for (idx, segment) in upper.split(EOR).enumerate() {
        if segment.trim().is_empty() {
            continue;
        }
        if segment.contains(EOH) {
            trace!("segment {}: header, discarded", idx);
            continue;
        }
        let rec = parse_fields(segment);
        if rec.is_empty() {
            trace!("segment {}: no fields, dropped", idx);
            continue;
        }
        trace!("segment {}: {} fields", idx, rec.len());
        out.push(rec);
    }

    if out.is_empty() && !text.trim().is_empty() {
        warn!("parser produced 0 records; enable --log trace to see per-segment decisions");
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    SeekingTag,
    ReadingTag { start: usize },
    ReadingLength { tag: (usize, usize), digits: usize },
    ReadingValue { tag: (usize, usize), declared: usize, start: usize },
}

/// Single pass over one segment. Each byte is looked at once; a bad tag
/// falls back to seeking, restarting on the current byte when it is `<`.
fn parse_fields(segment: &str) -> RawRecord {
    let bytes = segment.as_bytes();
    let mut rec = RawRecord::new();
    let mut state = State::SeekingTag;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        state = match state {
            State::SeekingTag => {
                if b == b'<' { State::ReadingTag { start: i + 1 } } else { State::SeekingTag }
            }
            State::ReadingTag { start } => match b {
                b'A'..=b'Z' | b'0'..=b'9' | b'_' => State::ReadingTag { start },
                b':' if i > start => State::ReadingLength { tag: (start, i), digits: 0 },
                _ => {
                    trace!("skipping malformed tag at byte {}", start - 1);
                    restart(b, i)
                }
            },
            State::ReadingLength { tag, digits } => match b {
                b'0'..=b'9' => State::ReadingLength { tag, digits: digits + 1 },
                b'>' if digits > 0 => {
                    let declared = segment[i - digits..i].parse::<usize>().unwrap_or(usize::MAX);
                    State::ReadingValue { tag, declared, start: i + 1 }
                }
                _ => {
                    trace!("skipping malformed length for tag {}", &segment[tag.0..tag.1]);
                    restart(b, i)
                }
            },
            State::ReadingValue { tag, declared, start } => {
                if b == b'<' {
                    emit(&mut rec, segment, tag, declared, start, i);
                    State::ReadingTag { start: i + 1 }
                } else {
                    State::ReadingValue { tag, declared, start }
                }
            }
        };
        i += 1;
    }

    if let State::ReadingValue { tag, declared, start } = state {
        emit(&mut rec, segment, tag, declared, start, bytes.len());
    }
    rec
}

#[inline]
fn restart(b: u8, i: usize) -> State {
    if b == b'<' { State::ReadingTag { start: i + 1 } } else { State::SeekingTag }
}

#[inline]
fn emit(rec: &mut RawRecord, segment: &str, tag: (usize, usize), declared: usize, start: usize, end: usize) {
    let name = &segment[tag.0..tag.1];
    if end == start {
        trace!("tag {} has no value, skipped", name);
        return;
    }
    let raw = &segment[start..end];
    if raw.len() != declared {
        trace!("tag {} declares {} bytes, found {}", name, declared, raw.len());
    }
    rec.insert(name, raw.trim());
}
