//! Calendar dates in the fixed `YYYY-MM-DD` form.
//!
//! A [`DayDate`] only comes into existence through [`DayDate::parse`] (or
//! arithmetic on an existing value), so holding one means the text was
//! valid. Parsing never errors: bad input is `None` and the caller decides
//! what that means.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const DATE_TEXT_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayDate(NaiveDate);

impl DayDate {
    /// Parse exactly `YYYY-MM-DD`. Anything else, including impossible
    /// calendar dates, yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != DATE_TEXT_LEN || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let digits_ok = bytes
            .iter()
            .enumerate()
            .all(|(idx, byte)| idx == 4 || idx == 7 || byte.is_ascii_digit());
        if !digits_ok {
            return None;
        }

        let year: i32 = text[0..4].parse().ok()?;
        let month: u32 = text[5..7].parse().ok()?;
        let day: u32 = text[8..10].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse for callers that need an error rather than an absence.
    pub fn parse_required(text: &str) -> Result<Self> {
        Self::parse(text).ok_or_else(|| Error::InvalidDate(text.to_string()))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Canonical text form, zero padded.
    pub fn format(&self) -> String {
        self.to_string()
    }

    pub fn year_segment(&self) -> String {
        format!("{:04}", self.year())
    }

    pub fn month_segment(&self) -> String {
        month_segment(self.month())
    }

    pub fn day_segment(&self) -> String {
        format!("{:02}", self.day())
    }

    /// The calendar day before this one.
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The (year, month) key this date belongs to.
    pub fn month_key(&self) -> (i32, u32) {
        (self.year(), self.month())
    }
}

/// Two-digit month directory segment.
pub fn month_segment(month: u32) -> String {
    format!("{month:02}")
}

impl fmt::Display for DayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year(),
            self.month(),
            self.day()
        )
    }
}

impl Serialize for DayDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        DayDate::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{text}'")))
    }
}
