use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Body of the POST to `time_entries.json`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct NewTimeEntry {
    pub time_entry: TimeEntry,
}

/// A time entry to be submitted to Redmine. Sent once, never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub issue_id: u64,
    pub hours: f64,
    pub activity_id: u64,
    pub comments: String,
    /// Serialized as `YYYY-MM-DD`
    pub spent_on: NaiveDate,
}

impl TimeEntry {
    /// Creates a time entry spent today, with `hours` rounded to two decimals
    #[must_use]
    pub fn new(issue_id: u64, hours: f64, activity_id: u64, comments: &str) -> Self {
        TimeEntry {
            issue_id,
            hours: round_hours(hours),
            activity_id,
            comments: comments.to_string(),
            spent_on: Local::now().date_naive(),
        }
    }
}

/// Rounds to two decimals, which is the precision Redmine displays
#[must_use]
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spent_on_is_today_as_iso_date() {
        let entry = TimeEntry::new(7, 1.5, 3, "Hacking");
        let value = serde_json::to_value(NewTimeEntry { time_entry: entry }).unwrap();

        let today = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(
            value,
            json!({"time_entry": {
                "issue_id": 7,
                "hours": 1.5,
                "activity_id": 3,
                "comments": "Hacking",
                "spent_on": today,
            }})
        );
    }

    #[test]
    fn hours_are_rounded() {
        assert!((round_hours(0.025) - 0.03).abs() < f64::EPSILON);
        assert!((round_hours(1.234_56) - 1.23).abs() < f64::EPSILON);
        assert!((TimeEntry::new(1, 2.0 / 3.0, 1, "").hours - 0.67).abs() < f64::EPSILON);
    }
}
