//! Half-open date ranges (`[start, end)`) used for stays and restrictions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DATE_FORMAT};

/// A validated stay: `start` is the check-in day, `end` the check-out day.
///
/// The end date is excluded, so a stay ending on day X never conflicts with
/// one starting on day X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStay")]
pub struct StayRange {
    start: Date,
    end: Date,
}

#[derive(Deserialize)]
struct RawStay {
    start: Date,
    end: Date,
}

impl TryFrom<RawStay> for StayRange {
    type Error = CoreError;

    fn try_from(raw: RawStay) -> Result<Self, Self::Error> {
        StayRange::new(raw.start, raw.end)
    }
}

impl StayRange {
    /// Build a range, rejecting `start >= end`.
    pub fn new(start: Date, end: Date) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::Validation(format!(
                "End date {} must be after start date {}",
                end.format(DATE_FORMAT),
                start.format(DATE_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Self::new(parse_date("start", start)?, parse_date("end", end)?)
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Number of nights covered by the stay.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether two half-open ranges share at least one night.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Overlap test for `[rs, re)` against `[start, end)`.
pub fn overlaps(rs: Date, re: Date, start: Date, end: Date) -> bool {
    rs < end && re > start
}

/// Parse one `YYYY-MM-DD` date, naming the offending field on failure.
pub fn parse_date(field: &str, value: &str) -> Result<Date, CoreError> {
    Date::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CoreError::Validation(format!(
            "Invalid {field} date '{value}'. Expected format YYYY-MM-DD"
        ))
    })
}
