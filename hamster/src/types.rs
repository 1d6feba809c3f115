use std::fmt::{self, Formatter};

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::error::HamsterError;

/// A tracked activity, known in Hamster as a "fact".
///
/// A fact without an end time is the one currently being tracked. A fact may be linked to
/// a Redmine issue, in which case a time entry is registered when it is stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fact {
    /// Unique identifier, auto-assigned by the database
    pub id: Option<i64>,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub start_time: DateTime<Local>,
    /// `None` while the fact is being tracked
    pub end_time: Option<DateTime<Local>>,
    pub redmine_issue_id: Option<u64>,
    pub redmine_activity_id: Option<u64>,
}

impl Fact {
    /// Creates a fact from the Hamster notation `name@category, description`, with
    /// the tags separated by white space or commas, i.e. `#meeting, planning`.
    ///
    /// # Errors
    /// Returns an error if there is no activity name
    pub fn parse(input: &str, tags: &str, start_time: DateTime<Local>) -> Result<Self, HamsterError> {
        let (activity, description) = match input.split_once(',') {
            Some((activity, description)) => (activity, non_empty(description)),
            None => (input, None),
        };
        let (name, category) = match activity.split_once('@') {
            Some((name, category)) => (name.trim(), non_empty(category)),
            None => (activity.trim(), None),
        };
        if name.is_empty() {
            return Err(HamsterError::EmptyActivityName);
        }

        Ok(Fact {
            id: None,
            name: name.to_string(),
            category,
            description,
            tags: parse_tags(tags),
            start_time,
            end_time: None,
            redmine_issue_id: None,
            redmine_activity_id: None,
        })
    }

    /// Links this fact with a Redmine issue and time entry activity
    #[must_use]
    pub fn with_redmine(mut self, issue_id: u64, activity_id: u64) -> Self {
        self.redmine_issue_id = Some(issue_id);
        self.redmine_activity_id = Some(activity_id);
        self
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Gets the duration of this fact if it has been stopped
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Time spent so far, up to `now` for the running fact
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Local>) -> Duration {
        self.end_time.unwrap_or(now) - self.start_time
    }

    /// Duration in hours, if the fact has been stopped
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hours(&self) -> Option<f64> {
        self.duration()
            .map(|duration| duration.num_seconds() as f64 / 3600.0)
    }

    /// The tag shown next to a fact linked to Redmine, i.e. `[#42]`
    #[must_use]
    pub fn redmine_tag(&self) -> Option<String> {
        self.redmine_issue_id.map(|id| format!("[#{id}]"))
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(tag) = self.redmine_tag() {
            write!(f, " {tag}")?;
        }
        if let Some(category) = &self.category {
            write!(f, " - {category}")?;
        }
        Ok(())
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(|c: char| c == ',' || c.is_whitespace())
        .map(|tag| tag.trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}
