// hamster/tests/test_helpers/fixtures.rs

use hamster::config::RedmineSettings;
use serde_json::json;

pub const TEST_API_KEY: &str = "0123456789abcdef";
pub const TEST_ISSUE_ID: u64 = 7;
pub const TEST_ISSUE_SUBJECT: &str = "Fix bug";
pub const TEST_ACTIVITY_ID: u64 = 3;
pub const TEST_ACTIVITY_NAME: &str = "Development";

pub fn redmine_settings(url: &str, integration_enabled: bool) -> RedmineSettings {
    RedmineSettings {
        integration_enabled,
        url: url.to_string(),
        api_key: TEST_API_KEY.to_string(),
    }
}

/// Body of `GET /issues.json?assigned_to_id=me`
pub fn assigned_issues_body() -> String {
    json!({
        "issues": [
            { "id": TEST_ISSUE_ID, "subject": TEST_ISSUE_SUBJECT },
            { "id": 8, "subject": "Write documentation" }
        ],
        "total_count": 2,
        "offset": 0,
        "limit": 25
    })
    .to_string()
}

/// Body of `GET /enumerations/time_entry_activities.json`
pub fn activities_body() -> String {
    json!({
        "time_entry_activities": [
            { "id": 2, "name": "Design", "is_default": false },
            { "id": TEST_ACTIVITY_ID, "name": TEST_ACTIVITY_NAME, "is_default": true }
        ]
    })
    .to_string()
}
