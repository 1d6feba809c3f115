//! The seam between the tracking session and the Redmine server.
use std::sync::Arc;

use async_trait::async_trait;
use redmine::models::activity::{self, ActivityType};
use redmine::models::issue::{self, Issue};
use redmine::{Redmine, RedmineError};

use crate::config::RedmineSettings;
use crate::error::HamsterError;

/// Redmine operations needed by the tracking session
#[async_trait]
pub trait RedmineApi: Send + Sync {
    async fn check_connection(&self) -> Result<bool, RedmineError>;
    async fn list_assigned_issues(&self) -> Result<Vec<Issue>, RedmineError>;
    async fn get_issue(&self, issue_id: &str) -> Result<Issue, RedmineError>;
    async fn list_activities(&self) -> Result<Vec<ActivityType>, RedmineError>;
    async fn add_time_entry(
        &self,
        issue_id: u64,
        hours: f64,
        activity_id: u64,
        comments: &str,
    ) -> Result<bool, RedmineError>;

    async fn find_activity_id_by_name(&self, name: &str) -> Result<Option<u64>, RedmineError> {
        let activities = self.list_activities().await?;
        Ok(activity::find_id_by_name(&activities, name))
    }

    async fn find_issue_id_by_subject(&self, subject: &str) -> Result<Option<u64>, RedmineError> {
        let issues = self.list_assigned_issues().await?;
        Ok(issue::find_id_by_subject(&issues, subject))
    }
}

#[async_trait]
impl RedmineApi for Redmine {
    async fn check_connection(&self) -> Result<bool, RedmineError> {
        Redmine::check_connection(self).await
    }

    async fn list_assigned_issues(&self) -> Result<Vec<Issue>, RedmineError> {
        Redmine::list_assigned_issues(self).await
    }

    async fn get_issue(&self, issue_id: &str) -> Result<Issue, RedmineError> {
        Redmine::get_issue(self, issue_id).await
    }

    async fn list_activities(&self) -> Result<Vec<ActivityType>, RedmineError> {
        Redmine::list_activities(self).await
    }

    async fn add_time_entry(
        &self,
        issue_id: u64,
        hours: f64,
        activity_id: u64,
        comments: &str,
    ) -> Result<bool, RedmineError> {
        Redmine::add_time_entry(self, issue_id, hours, activity_id, comments).await
    }
}

/// Creates a Redmine client from the settings in effect for a single operation
pub trait RedmineConnector: Send + Sync {
    #[allow(clippy::missing_errors_doc)]
    fn connect(&self, settings: &RedmineSettings) -> Result<Arc<dyn RedmineApi>, HamsterError>;
}

/// Connects to the Redmine server over HTTP
#[derive(Default)]
pub struct HttpRedmineConnector;

impl RedmineConnector for HttpRedmineConnector {
    fn connect(&self, settings: &RedmineSettings) -> Result<Arc<dyn RedmineApi>, HamsterError> {
        let configuration = settings.client_configuration();
        if !configuration.has_valid_api_key() {
            return Err(HamsterError::ApiKeyNotConfigured);
        }
        let client = Redmine::from(&configuration)?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: &str) -> RedmineSettings {
        RedmineSettings {
            integration_enabled: true,
            url: "https://redmine.example.com/".to_string(),
            api_key: api_key.to_string(),
        }
    }

    #[test]
    fn placeholder_api_key_is_rejected() {
        let connector = HttpRedmineConnector;
        assert!(matches!(
            connector.connect(&RedmineSettings::default()),
            Err(HamsterError::ApiKeyNotConfigured)
        ));
        assert!(matches!(
            connector.connect(&settings("  ")),
            Err(HamsterError::ApiKeyNotConfigured)
        ));
    }

    #[test]
    fn real_api_key_connects() {
        assert!(HttpRedmineConnector.connect(&settings("8a1b0c")).is_ok());
    }

    #[test]
    fn invalid_url_is_reported() {
        let mut settings = settings("8a1b0c");
        settings.url = "ftp://redmine.example.com/".to_string();
        assert!(matches!(
            HttpRedmineConnector.connect(&settings),
            Err(HamsterError::Redmine(_))
        ));
    }
}
