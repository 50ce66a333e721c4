use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Duration,
};

/// Dates are stored and accepted as zero padded `YYYY-MM-DD` strings
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Length of the trailing window used by the precipitation and tobs routes
pub const TRAILING_WINDOW_DAYS: i64 = 365;

pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(DATE_FORMAT)
}

/// Inclusive span between the earliest and the latest observation date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    first: Date,
    last: Date,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDate {
    #[error("start date {start} is outside the available data, use a yyyy-mm-dd date between {first} and {last}")]
    Start {
        start: String,
        first: String,
        last: String,
    },
    #[error("end date {end} is outside the available data, use a yyyy-mm-dd date between {first} and {last}")]
    End {
        end: String,
        first: String,
        last: String,
    },
    #[error("start date {start} and end date {end} are outside the available data, use yyyy-mm-dd dates between {first} and {last}")]
    Both {
        start: String,
        end: String,
        first: String,
        last: String,
    },
}

impl DateRange {
    pub fn new(first: Date, last: Date) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    /// Builds the range from the stored MIN(date)/MAX(date) strings
    pub fn parse(first: &str, last: &str) -> Result<Self, time::error::Parse> {
        Ok(Self::new(
            Date::parse(first, DATE_FORMAT)?,
            Date::parse(last, DATE_FORMAT)?,
        ))
    }

    pub fn first(&self) -> Date {
        self.first
    }

    pub fn last(&self) -> Date {
        self.last
    }

    /// First day of the trailing-year window ending at the latest observation
    pub fn trailing_year_start(&self) -> Date {
        self.last
            .checked_sub(Duration::days(TRAILING_WINDOW_DAYS))
            .unwrap_or(Date::MIN)
    }

    /// Every calendar day from the first through the last date, formatted as
    /// stored. Enumeration stops at the day after `last`.
    pub fn valid_dates(&self) -> Result<Vec<String>, time::error::Format> {
        let stop = self.last.next_day();
        let mut dates = Vec::new();
        let mut current = Some(self.first);
        while let Some(day) = current {
            if Some(day) == stop {
                break;
            }
            dates.push(format_date(day)?);
            current = day.next_day();
        }
        Ok(dates)
    }

    /// Checks the requested bound(s), returning which side failed, if any.
    /// Membership is tested against the enumerated dates without parsing,
    /// so anything not spelled exactly as `YYYY-MM-DD` is rejected.
    pub fn check(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Option<InvalidDate>, time::error::Format> {
        let dates = self.valid_dates()?;
        let is_valid = |candidate: &str| dates.iter().any(|date| date == candidate);
        let first = format_date(self.first)?;
        let last = format_date(self.last)?;
        let start_valid = is_valid(start);

        let violation = match end {
            None if start_valid => None,
            None => Some(InvalidDate::Start {
                start: start.to_owned(),
                first,
                last,
            }),
            Some(end) => match (start_valid, is_valid(end)) {
                (true, true) => None,
                (false, true) => Some(InvalidDate::Start {
                    start: start.to_owned(),
                    first,
                    last,
                }),
                (false, false) => Some(InvalidDate::Both {
                    start: start.to_owned(),
                    end: end.to_owned(),
                    first,
                    last,
                }),
                (true, false) => Some(InvalidDate::End {
                    end: end.to_owned(),
                    first,
                    last,
                }),
            },
        };
        Ok(violation)
    }
}
