use serde::{Deserialize, Serialize};

/// Holds the response of `enumerations/time_entry_activities.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct TimeEntryActivities {
    pub time_entry_activities: Vec<ActivityType>,
}

/// A Redmine time entry activity, i.e. "Development" or "Design"
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ActivityType {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Id of the first activity named `name`, in the order supplied by the server
#[must_use]
pub fn find_id_by_name(activities: &[ActivityType], name: &str) -> Option<u64> {
    activities
        .iter()
        .find(|activity| activity.name == name)
        .map(|activity| activity.id)
}
