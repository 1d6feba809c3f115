use serde::{Deserialize, Serialize};

/// Holds the response of `issues.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct IssuesPage {
    pub issues: Vec<Issue>,
    pub total_count: Option<u32>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

/// Holds the response of `issues/{id}.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct SingleIssue {
    pub issue: Issue,
}

/// Represents a Redmine issue. Only the fields needed for time tracking are retained.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Issue {
    /// Numeric id, unique within a Redmine server
    pub id: u64,
    pub subject: String,
}

/// Id of the first issue having `subject`, in the order supplied by the server
#[must_use]
pub fn find_id_by_subject(issues: &[Issue], subject: &str) -> Option<u64> {
    issues
        .iter()
        .find(|issue| issue.subject == subject)
        .map(|issue| issue.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues() -> Vec<Issue> {
        vec![
            Issue { id: 7, subject: "Fix bug".to_string() },
            Issue { id: 8, subject: "Write docs".to_string() },
            Issue { id: 9, subject: "Fix bug".to_string() },
        ]
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(find_id_by_subject(&issues(), "Fix bug"), Some(7));
        assert_eq!(find_id_by_subject(&issues(), "Write docs"), Some(8));
    }

    #[test]
    fn unknown_subject_is_none() {
        assert_eq!(find_id_by_subject(&issues(), "fix bug"), None);
        assert_eq!(find_id_by_subject(&[], "Fix bug"), None);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let page: IssuesPage = serde_json::from_str(
            r#"{"issues":[{"id":7,"subject":"Fix bug","project":{"id":1,"name":"Hamster"}}],
                "total_count":1,"offset":0,"limit":25}"#,
        )
        .unwrap();
        assert_eq!(page.issues[0], Issue { id: 7, subject: "Fix bug".to_string() });
    }
}
