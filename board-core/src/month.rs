use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{Datelike, Days, Months, NaiveDate};

/// A calendar month, written `yyyyMM` in routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    first_day: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| anyhow!("Invalid month {}-{}", year, month))?;
        Ok(Self { first_day })
    }

    /// Parse a `yyyyMM` key such as `202403`
    pub fn parse(key: &str) -> Result<Self> {
        if key.len() != 6 || !key.chars().all(|c| c.is_ascii_digit()) {
            return Err(anyhow!("Month key must be yyyyMM, got '{}'", key));
        }
        let year: i32 = key[..4].parse()?;
        let month: u32 = key[4..].parse()?;
        Self::new(year, month)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day + Months::new(1) - Days::new(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day()
    }

    pub fn previous(&self) -> Self {
        Self {
            first_day: self.first_day - Months::new(1),
        }
    }

    /// This month followed by the `count - 1` months before it, newest first
    pub fn recent(self, count: usize) -> Vec<MonthKey> {
        std::iter::successors(Some(self), |month| Some(month.previous()))
            .take(count)
            .collect()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year(), self.month())
    }
}
