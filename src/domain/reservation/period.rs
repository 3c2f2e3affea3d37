//! Half-open date range `[start, end)` used for stays and restrictions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// Date layout accepted in forms and query strings.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_LAYOUT)
        .map_err(|_| DomainError::Validation(format!("invalid date '{}'", value)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_LAYOUT).to_string()
}

/// A stay occupies every night from `start` up to, but not including, `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl StayPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::Validation(
                "departure must be after arrival".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        self.start < other.end && other.start < self.end
    }
}
