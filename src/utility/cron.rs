
use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;


// long enough to reach the next february 29th
const MAX_MINUTES_AHEAD: usize = (4 * 366 + 1) * 24 * 60;

const MONTH_NAMES: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun",
    "jul", "aug", "sep", "oct", "nov", "dec",
];
const WEEKDAY_NAMES: &[&str] = &["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

#[derive(Debug, Error, PartialEq)]
pub enum CronError {
    #[error("expected 5 or 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid {field} value `{token}`")]
    InvalidToken { field: &'static str, token: String },

    #[error("{field} value {value} is outside {min}-{max}")]
    OutOfRange { field: &'static str, value: u32, min: u32, max: u32 },
}

struct FieldBounds {
    name: &'static str,
    min: u32,
    max: u32,
    // names[i] stands for min + i
    names: &'static [&'static str],
}

const SECOND: FieldBounds = FieldBounds { name: "second", min: 0, max: 59, names: &[] };
const MINUTE: FieldBounds = FieldBounds { name: "minute", min: 0, max: 59, names: &[] };
const HOUR: FieldBounds = FieldBounds { name: "hour", min: 0, max: 23, names: &[] };
const DAY_OF_MONTH: FieldBounds = FieldBounds { name: "day of month", min: 1, max: 31, names: &[] };
const MONTH: FieldBounds = FieldBounds { name: "month", min: 1, max: 12, names: MONTH_NAMES };
const DAY_OF_WEEK: FieldBounds = FieldBounds { name: "day of week", min: 0, max: 7, names: WEEKDAY_NAMES };

#[derive(Clone, Debug)]
struct Field {
    any: bool,
    allowed: Vec<bool>,
}

impl Field {

    fn only(value: u32, bounds: &FieldBounds) -> Field {
        let mut allowed = vec![false; bounds.max as usize + 1];
        allowed[value as usize] = true;
        Field { any: false, allowed }
    }

    fn parse(raw: &str, bounds: &FieldBounds) -> Result<Field, CronError> {
        let invalid = |token: &str| CronError::InvalidToken { field: bounds.name, token: token.to_string() };

        if raw == "*" {
            return Ok(Field { any: true, allowed: vec![true; bounds.max as usize + 1] });
        }

        let mut allowed = vec![false; bounds.max as usize + 1];
        for part in raw.split(',') {
            let (range, step) = match part.split_once('/') {
                Some((range, step)) => match step.parse::<usize>() {
                    Ok(step) if step > 0 => (range, Some(step)),
                    _ => return Err(invalid(part)),
                },
                None => (part, None),
            };

            let (low, high) = if range == "*" {
                (bounds.min, bounds.max)
            } else if let Some((low, high)) = range.split_once('-') {
                (Field::value(low, bounds)?, Field::value(high, bounds)?)
            } else {
                // `5/15` runs from 5 to the end of the range
                let value = Field::value(range, bounds)?;
                match step {
                    Some(_) => (value, bounds.max),
                    None    => (value, value),
                }
            };
            if low > high {
                return Err(invalid(part));
            }

            for value in (low..=high).step_by(step.unwrap_or(1)) {
                allowed[value as usize] = true;
            }
        }

        Ok(Field { any: false, allowed })
    }

    fn value(token: &str, bounds: &FieldBounds) -> Result<u32, CronError> {
        let lower = token.to_lowercase();
        if let Some(index) = bounds.names.iter().position(|name| lower == *name) {
            return Ok(bounds.min + index as u32);
        }
        let value = token.parse::<u32>()
            .map_err(|_| CronError::InvalidToken { field: bounds.name, token: token.to_string() })?;
        if value < bounds.min || value > bounds.max {
            return Err(CronError::OutOfRange { field: bounds.name, value, min: bounds.min, max: bounds.max });
        }
        Ok(value)
    }

    fn contains(&self, value: u32) -> bool {
        self.allowed.get(value as usize).copied().unwrap_or(false)
    }

}

/// A parsed cron expression with an optional leading seconds field.
#[derive(Clone, Debug)]
pub struct CronExpr {
    source: String,
    second: Field,
    minute: Field,
    hour: Field,
    day_of_month: Field,
    month: Field,
    day_of_week: Field,
}

impl CronExpr {

    pub fn parse(expression: &str) -> Result<CronExpr, CronError> {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        let (second, rest) = match parts.len() {
            5 => (Field::only(0, &SECOND), &parts[..]),
            6 => (Field::parse(parts[0], &SECOND)?, &parts[1..]),
            count => return Err(CronError::FieldCount(count)),
        };

        let mut day_of_week = Field::parse(rest[4], &DAY_OF_WEEK)?;
        if day_of_week.contains(7) {
            day_of_week.allowed[0] = true;
        }

        Ok(CronExpr {
            source: parts.join(" "),
            second,
            minute: Field::parse(rest[0], &MINUTE)?,
            hour: Field::parse(rest[1], &HOUR)?,
            day_of_month: Field::parse(rest[2], &DAY_OF_MONTH)?,
            month: Field::parse(rest[3], &MONTH)?,
            day_of_week,
        })
    }

    fn matches_minute<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> bool {
        if !self.minute.contains(time.minute())
            || !self.hour.contains(time.hour())
            || !self.month.contains(time.month()) {
            return false;
        }

        // when both day fields are restricted either one may match
        let day_of_month = self.day_of_month.contains(time.day());
        let day_of_week = self.day_of_week.contains(time.weekday().num_days_from_sunday());
        match (self.day_of_month.any, self.day_of_week.any) {
            (true, true)   => true,
            (true, false)  => day_of_week,
            (false, true)  => day_of_month,
            (false, false) => day_of_month || day_of_week,
        }
    }

    /// First firing strictly after `after`, `None` if nothing fires within four years.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let mut time = after.clone().with_nanosecond(0)? + Duration::seconds(1);
        for _ in 0..MAX_MINUTES_AHEAD {
            if self.matches_minute(&time) {
                if let Some(second) = (time.second()..60).find(|second| self.second.contains(*second)) {
                    return time.with_second(second);
                }
            }
            time = time.with_second(0)? + Duration::minutes(1);
        }
        None
    }

}

impl FromStr for CronExpr {
    type Err = CronError;

    fn from_str(expression: &str) -> Result<CronExpr, CronError> {
        CronExpr::parse(expression)
    }
}

impl fmt::Display for CronExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
