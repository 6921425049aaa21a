use crate::errors::AppError;
use crate::model::{AggregateRecord, NO_BAND, NO_MODE};
use regex::{Regex, RegexBuilder};

/// Sentinel meaning "no restriction" in band/mode selections.
pub const ALL: &str = "ALL";

#[derive(Clone, Debug, Default)]
pub struct FilterConfig {
    pub bands: Vec<String>,
    pub modes: Vec<String>,
    pub call: Option<Regex>,
}

impl FilterConfig {
    pub fn new(bands: &[String], modes: &[String], call_pattern: Option<&str>) -> Result<Self, AppError> {
        let call = call_pattern
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .transpose()
            .map_err(|e| AppError::Parse(format!("call pattern: {}", e)))?;
        Ok(Self { bands: selection(bands), modes: selection(modes), call })
    }

    /// Band and mode compare against the value or `N/A` when missing.
    pub fn accept(&self, a: &AggregateRecord) -> bool {
        if !self.bands.is_empty() {
            let band = a.fields.band().unwrap_or(NO_BAND);
            if !self.bands.iter().any(|q| q == band) { return false; }
        }
        if !self.modes.is_empty() {
            let mode = a.fields.mode().unwrap_or(NO_MODE);
            if !self.modes.iter().any(|q| q == mode) { return false; }
        }
        if let Some(re) = &self.call {
            match a.fields.call() {
                Some(c) if re.is_match(c) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Upper-cased selection; any `ALL` entry clears it.
fn selection(values: &[String]) -> Vec<String> {
    let v: Vec<String> = values.iter().map(|s| s.trim().to_uppercase()).filter(|s| !s.is_empty()).collect();
    if v.iter().any(|s| s == ALL) { Vec::new() } else { v }
}
