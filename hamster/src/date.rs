use chrono::offset::TimeZone;
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use std::error;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidInput(String),
    NonExistingLocalTime(NaiveDateTime),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidInput(s) => write!(
                f,
                "Invalid input '{s}', use 'HH:MM', 'YYYY-MM-DD' or 'YYYY-MM-DDTHH:MM'"
            ),
            Error::NonExistingLocalTime(dt) => {
                write!(f, "{dt} does not exist in the local time zone")
            }
        }
    }
}

impl error::Error for Error {}

/// Parses one of these into a local date and time:
/// `08:00` implicitly indicating today's date
/// `2023-05-26` implicitly indicating 08:00 on that date
/// `2023-05-26T09:00` for an exact specification
///
/// # Errors
/// Returns an error if the input matches none of the formats
pub fn str_to_date_time(s: &str) -> Result<DateTime<Local>, Error> {
    lazy_static! {
        static ref DATE_EXPR: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
        static ref TIME_EXPR: Regex = Regex::new(r"^\d{1,2}:\d{2}$").unwrap();
        static ref DATE_TIME_EXPR: Regex =
            Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{1,2}:\d{2}$").unwrap();
    }
    let s = s.trim();
    let invalid = |_| Error::InvalidInput(s.to_string());

    let naive = if DATE_EXPR.is_match(s) {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(invalid)?
            .and_time(NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default())
    } else if TIME_EXPR.is_match(s) {
        let nt = NaiveTime::parse_from_str(s, "%H:%M").map_err(invalid)?;
        Local::now().date_naive().and_time(nt)
    } else if DATE_TIME_EXPR.is_match(s) {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").map_err(invalid)?
    } else {
        return Err(Error::InvalidInput(s.to_string()));
    };
    to_local(naive)
}

/// Local midnight of the current day
#[must_use]
pub fn start_of_today() -> DateTime<Local> {
    let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
    // Midnight may be skipped by a DST change, fall back to the current time
    to_local(midnight).unwrap_or_else(|_| Local::now())
}

fn to_local(naive: NaiveDateTime) -> Result<DateTime<Local>, Error> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => Err(Error::NonExistingLocalTime(naive)),
    }
}

/// Formats a number of seconds as `HH:MM`
#[must_use]
pub fn seconds_to_hour_and_min(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours:02}:{minutes:02}")
}
