//! Expiry calendar.
//!
//! Symbols may list their expiries explicitly. When they don't, weekly and
//! monthly expiries are generated from today's date: indices get weekly
//! Thursday expiries plus the monthly ones, stocks only the monthly
//! (last Thursday of the month).

use crate::error::{ChainError, ChainResult};
use crate::types::InstrumentType;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub use config::EXPIRY_FORMAT;

const WEEKLY_COUNT: usize = 4;
const MONTHLY_COUNT: usize = 3;
const EXPIRY_WEEKDAY: Weekday = Weekday::Thu;

/// Whole days from `today` until `expiry` (negative once it has passed).
pub fn days_to_expiry(symbol: &str, expiry: &str, today: NaiveDate) -> ChainResult<i64> {
    let date = parse_expiry(symbol, expiry)?;
    Ok((date - today).num_days())
}

pub fn parse_expiry(symbol: &str, expiry: &str) -> ChainResult<NaiveDate> {
    NaiveDate::parse_from_str(expiry, EXPIRY_FORMAT).map_err(|_| ChainError::InvalidExpiry {
        symbol: symbol.to_string(),
        expiry: expiry.to_string(),
    })
}

/// Generates expiry dates from the calendar.
pub struct ExpiryGenerator;

impl ExpiryGenerator {
    /// Default expiry list for an instrument type, nearest first.
    pub fn for_instrument(instrument_type: InstrumentType, today: NaiveDate) -> Vec<String> {
        let mut dates = Self::monthly(today, EXPIRY_WEEKDAY, MONTHLY_COUNT);
        if instrument_type == InstrumentType::Index {
            dates.extend(Self::weekly(today, EXPIRY_WEEKDAY, WEEKLY_COUNT));
        }

        dates.sort();
        dates.dedup();

        dates
            .into_iter()
            .map(|d| d.format(EXPIRY_FORMAT).to_string())
            .collect()
    }

    /// The next `count` occurrences of `weekday`, today included.
    pub fn weekly(today: NaiveDate, weekday: Weekday, count: usize) -> Vec<NaiveDate> {
        let offset = (weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64
            + 7)
            % 7;
        let first = today + Duration::days(offset);

        (0..count as i64)
            .map(|week| first + Duration::weeks(week))
            .collect()
    }

    /// The last `weekday` of each month, starting with the current month
    /// if that date has not passed yet.
    pub fn monthly(today: NaiveDate, weekday: Weekday, count: usize) -> Vec<NaiveDate> {
        let mut expiries = Vec::with_capacity(count);
        let mut year = today.year();
        let mut month = today.month();

        while expiries.len() < count {
            if let Some(date) = Self::last_weekday_of_month(year, month, weekday) {
                if date >= today {
                    expiries.push(date);
                }
            }

            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }

        expiries
    }

    /// Find the last given weekday of a month.
    pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
        let first_of_next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let last_day = first_of_next.pred_opt()?;

        let back = (last_day.weekday().num_days_from_monday() + 7
            - weekday.num_days_from_monday())
            % 7;
        Some(last_day - Duration::days(back as i64))
    }
}
