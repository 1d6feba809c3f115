use crate::config::{ConfigurationProvider, RedmineSettings};
use crate::error::HamsterError;
use crate::repository::fact_repository::FactRepository;
use crate::service::redmine_api::{RedmineApi, RedmineConnector};
use crate::types::Fact;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use redmine::models::activity::ActivityType;
use redmine::models::issue::Issue;
use redmine::models::time_entry::round_hours;
use std::sync::Arc;

/// Facts shorter than this (roughly a minute) are never registered in Redmine
pub const MIN_REPORTABLE_HOURS: f64 = 0.016;

/// How the user wants the new fact linked to Redmine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedmineSelection {
    /// An issue picked from the list of issues assigned to the user
    Issue {
        subject: String,
        activity: Option<String>,
    },
    /// An issue id typed in by the user, which must be validated first
    IssueId {
        id: String,
        activity: Option<String>,
    },
}

/// Everything needed to start tracking a new fact
#[derive(Debug, Clone, Default)]
pub struct StartRequest {
    /// `name@category, description`
    pub fact: String,
    pub tags: String,
    /// Defaults to now
    pub start_time: Option<DateTime<Local>>,
    pub redmine: Option<RedmineSelection>,
}

/// What happened in Redmine when a fact was stopped
#[derive(Debug)]
pub enum Submission {
    /// The Redmine integration is switched off
    Disabled,
    /// The fact is not linked to a Redmine issue
    NotLinked,
    /// Not enough time spent to be worth registering
    TooShort { hours: f64 },
    Submitted {
        issue_id: u64,
        activity_id: u64,
        hours: f64,
    },
    /// The time entry could not be registered. The fact is stopped nevertheless.
    Failed(HamsterError),
}

/// Result of stopping the running fact
#[derive(Debug)]
pub struct StopOutcome {
    pub fact: Fact,
    pub submission: Submission,
}

/// Tracks facts and registers time entries in Redmine.
///
/// The session is either idle or tracking a single fact, which is recorded as the open fact
/// in the repository. The Redmine settings are fetched anew for every operation.
pub struct TrackingSession {
    configuration: Arc<dyn ConfigurationProvider>,
    fact_repository: Arc<dyn FactRepository>,
    connector: Arc<dyn RedmineConnector>,
}

impl TrackingSession {
    pub fn new(
        configuration: Arc<dyn ConfigurationProvider>,
        fact_repository: Arc<dyn FactRepository>,
        connector: Arc<dyn RedmineConnector>,
    ) -> Self {
        Self {
            configuration,
            fact_repository,
            connector,
        }
    }

    /// Starts tracking a new fact, linking it to Redmine if requested and enabled.
    ///
    /// # Errors
    /// The session stays idle if the fact could not be linked as requested, for instance
    /// because the issue id is invalid or no Redmine activity was given.
    pub async fn start_tracking(&self, request: StartRequest) -> Result<Fact, HamsterError> {
        let start_time = request.start_time.unwrap_or_else(Local::now);
        let mut fact = Fact::parse(&request.fact, &request.tags, start_time)?;

        if self.fact_repository.find_active_fact()?.is_some() {
            return Err(HamsterError::ActiveFactExists);
        }

        let settings = self.configuration.redmine_settings()?;
        match request.redmine {
            Some(selection) if settings.integration_enabled => {
                let api = self.connector.connect(&settings)?;
                let (issue_id, activity_id) = Self::resolve_selection(api.as_ref(), selection).await?;
                fact = fact.with_redmine(issue_id, activity_id);
            }
            Some(selection) => {
                debug!("Redmine integration disabled, ignoring {:?}", selection);
            }
            None => {}
        }

        let id = self.fact_repository.add_fact(&fact)?;
        info!("Started tracking '{}' with id {}", fact, id);
        Ok(Fact { id: Some(id), ..fact })
    }

    /// Resolves the issue and activity ids of the selection
    async fn resolve_selection(
        api: &dyn RedmineApi,
        selection: RedmineSelection,
    ) -> Result<(u64, u64), HamsterError> {
        match selection {
            RedmineSelection::Issue { subject, activity } => {
                let activity = required_activity(activity)?;
                let issue_id = api
                    .find_issue_id_by_subject(&subject)
                    .await?
                    .ok_or(HamsterError::UnknownIssue(subject))?;
                let activity_id = Self::resolve_activity(api, activity).await?;
                Ok((issue_id, activity_id))
            }
            RedmineSelection::IssueId { id, activity } => {
                let issue = match api.get_issue(&id).await {
                    Ok(issue) => issue,
                    Err(err) if err.is_connection_error() => {
                        debug!("Issue '{id}' rejected: {err}");
                        return Err(HamsterError::InvalidIssueId(id));
                    }
                    Err(err) => return Err(err.into()),
                };
                let activity = required_activity(activity)?;
                let activity_id = Self::resolve_activity(api, activity).await?;
                Ok((issue.id, activity_id))
            }
        }
    }

    async fn resolve_activity(api: &dyn RedmineApi, name: String) -> Result<u64, HamsterError> {
        api.find_activity_id_by_name(&name)
            .await?
            .ok_or(HamsterError::UnknownActivity(name))
    }

    /// Stops the running fact at `end_time`, defaulting to now, and registers the time
    /// spent in Redmine when the fact is linked to an issue.
    ///
    /// A failure to talk to Redmine does not undo the stop, it is reported in the
    /// returned `StopOutcome`.
    ///
    /// # Errors
    /// Returns `HamsterError::NoActiveFact` if nothing is being tracked
    pub async fn stop_tracking(
        &self,
        end_time: Option<DateTime<Local>>,
    ) -> Result<StopOutcome, HamsterError> {
        let end_time = end_time.unwrap_or_else(Local::now);
        let fact = self.fact_repository.stop_tracking(end_time)?;
        info!("Stopped tracking '{}'", fact);

        let submission = self.submit(&fact).await;
        if let Submission::Failed(err) = &submission {
            warn!("Unable to register the time spent on '{}' in Redmine: {err}", fact);
        }
        Ok(StopOutcome { fact, submission })
    }

    async fn submit(&self, fact: &Fact) -> Submission {
        let settings = match self.configuration.redmine_settings() {
            Ok(settings) => settings,
            Err(err) => return Submission::Failed(err),
        };
        if !settings.integration_enabled {
            return Submission::Disabled;
        }
        let (Some(issue_id), Some(activity_id)) = (fact.redmine_issue_id, fact.redmine_activity_id)
        else {
            return Submission::NotLinked;
        };
        let hours = fact.hours().unwrap_or_default();
        if hours < MIN_REPORTABLE_HOURS {
            debug!("Only {hours} hours spent on '{}', not registered", fact.name);
            return Submission::TooShort { hours };
        }

        let hours = round_hours(hours);
        let result = match self.connector.connect(&settings) {
            Ok(api) => api
                .add_time_entry(issue_id, hours, activity_id, &fact.name)
                .await
                .map_err(HamsterError::from),
            Err(err) => Err(err),
        };
        match result {
            Ok(_) => {
                info!("Registered {hours} hours on Redmine issue #{issue_id}");
                Submission::Submitted {
                    issue_id,
                    activity_id,
                    hours,
                }
            }
            Err(err) => Submission::Failed(err),
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn current_fact(&self) -> Result<Option<Fact>, HamsterError> {
        self.fact_repository.find_active_fact()
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn todays_facts(&self) -> Result<Vec<Fact>, HamsterError> {
        self.fact_repository.get_todays_facts()
    }

    /// Issues assigned to the user, to choose from when starting a fact
    #[allow(clippy::missing_errors_doc)]
    pub async fn assigned_issues(&self) -> Result<Vec<Issue>, HamsterError> {
        let api = self.enabled_api()?;
        Ok(api.list_assigned_issues().await?)
    }

    /// The Redmine time entry activities, to choose from when starting a fact
    #[allow(clippy::missing_errors_doc)]
    pub async fn activities(&self) -> Result<Vec<ActivityType>, HamsterError> {
        let api = self.enabled_api()?;
        Ok(api.list_activities().await?)
    }

    /// Whether the configured Redmine server accepts the configured API key
    #[allow(clippy::missing_errors_doc)]
    pub async fn check_connection(&self) -> Result<bool, HamsterError> {
        let settings: RedmineSettings = self.configuration.redmine_settings()?;
        let api = self.connector.connect(&settings)?;
        Ok(api.check_connection().await?)
    }

    fn enabled_api(&self) -> Result<Arc<dyn RedmineApi>, HamsterError> {
        let settings = self.configuration.redmine_settings()?;
        if !settings.integration_enabled {
            return Err(HamsterError::RedmineIntegrationDisabled);
        }
        self.connector.connect(&settings)
    }
}

fn required_activity(activity: Option<String>) -> Result<String, HamsterError> {
    activity
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or(HamsterError::MissingRedmineActivity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfiguration;
    use crate::repository::database_manager::{DatabaseConfig, DatabaseManager};
    use async_trait::async_trait;
    use chrono::Duration;
    use mockall::{mock, predicate::*};
    use redmine::{RedmineError, StatusCode};

    mock! {
        pub RedmineApiImpl {}

        #[async_trait]
        impl RedmineApi for RedmineApiImpl {
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
        }
    }

    /// Hands out the same mock for every operation
    struct MockConnector(Arc<MockRedmineApiImpl>);

    impl RedmineConnector for MockConnector {
        fn connect(&self, _settings: &RedmineSettings) -> Result<Arc<dyn RedmineApi>, HamsterError> {
            Ok(self.0.clone())
        }
    }

    fn not_found() -> RedmineError {
        RedmineError::Connection {
            code: StatusCode::NOT_FOUND,
            reason: "Not Found".to_string(),
        }
    }

    fn settings(enabled: bool) -> RedmineSettings {
        RedmineSettings {
            integration_enabled: enabled,
            url: "http://localhost".to_string(),
            api_key: "abc".to_string(),
        }
    }

    fn issues() -> Vec<Issue> {
        vec![Issue {
            id: 7,
            subject: "Fix bug".to_string(),
        }]
    }

    fn activities() -> Vec<ActivityType> {
        vec![ActivityType {
            id: 3,
            name: "Development".to_string(),
            is_default: false,
        }]
    }

    fn create_session(enabled: bool, api: MockRedmineApiImpl) -> TrackingSession {
        let repository = DatabaseManager::new(&DatabaseConfig::SqliteInMemory)
            .unwrap()
            .create_fact_repository();
        TrackingSession::new(
            Arc::new(StaticConfiguration::new(settings(enabled))),
            repository,
            Arc::new(MockConnector(Arc::new(api))),
        )
    }

    fn start_request(redmine: Option<RedmineSelection>, ago: Duration) -> StartRequest {
        StartRequest {
            fact: "bug hunting@work".to_string(),
            tags: String::new(),
            start_time: Some(Local::now() - ago),
            redmine,
        }
    }

    fn fix_bug_selection() -> Option<RedmineSelection> {
        Some(RedmineSelection::Issue {
            subject: "Fix bug".to_string(),
            activity: Some("Development".to_string()),
        })
    }

    #[tokio::test]
    async fn selected_issue_is_submitted_on_stop() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_list_assigned_issues()
            .times(1)
            .returning(|| Ok(issues()));
        api.expect_list_activities()
            .times(1)
            .returning(|| Ok(activities()));
        api.expect_add_time_entry()
            .with(
                eq(7),
                function(|hours: &f64| (hours - 0.03).abs() < 1e-9),
                eq(3),
                eq("bug hunting"),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        let session = create_session(true, api);
        let start = session
            .start_tracking(start_request(fix_bug_selection(), Duration::seconds(90)))
            .await?;
        assert_eq!(start.redmine_issue_id, Some(7));
        assert_eq!(start.redmine_activity_id, Some(3));

        let outcome = session
            .stop_tracking(Some(start.start_time + Duration::seconds(90)))
            .await?;
        match outcome.submission {
            Submission::Submitted {
                issue_id,
                activity_id,
                hours,
            } => {
                assert_eq!((issue_id, activity_id), (7, 3));
                assert!((hours - 0.03).abs() < 1e-9);
            }
            other => panic!("Expected a submission, got {other:?}"),
        }
        assert!(session.current_fact()?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn short_facts_are_not_submitted() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_list_assigned_issues().returning(|| Ok(issues()));
        api.expect_list_activities().returning(|| Ok(activities()));
        api.expect_add_time_entry().times(0);

        let session = create_session(true, api);
        let start = session
            .start_tracking(start_request(fix_bug_selection(), Duration::seconds(30)))
            .await?;
        let outcome = session
            .stop_tracking(Some(start.start_time + Duration::seconds(30)))
            .await?;

        assert!(matches!(outcome.submission, Submission::TooShort { .. }));
        assert!(!outcome.fact.is_active());
        Ok(())
    }

    /// Tracks a fact linked to issue 7 for `seconds` and stops it
    async fn track_for(seconds: i64, api: MockRedmineApiImpl) -> Result<StopOutcome, HamsterError> {
        let session = create_session(true, api);
        let start = session
            .start_tracking(start_request(fix_bug_selection(), Duration::seconds(seconds)))
            .await?;
        session
            .stop_tracking(Some(start.start_time + Duration::seconds(seconds)))
            .await
    }

    #[tokio::test]
    async fn just_below_threshold_is_not_submitted() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_list_assigned_issues().returning(|| Ok(issues()));
        api.expect_list_activities().returning(|| Ok(activities()));
        api.expect_add_time_entry().times(0);

        // 57 seconds is 0.0158 hours
        let outcome = track_for(57, api).await?;
        match outcome.submission {
            Submission::TooShort { hours } => assert!(hours < MIN_REPORTABLE_HOURS),
            other => panic!("Expected nothing to be submitted, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn at_threshold_is_submitted() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_list_assigned_issues().returning(|| Ok(issues()));
        api.expect_list_activities().returning(|| Ok(activities()));
        api.expect_add_time_entry()
            .with(
                eq(7),
                function(|hours: &f64| (hours - 0.02).abs() < 1e-9),
                eq(3),
                eq("bug hunting"),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        // 58 seconds is 0.0161 hours
        let outcome = track_for(58, api).await?;
        assert!(matches!(
            outcome.submission,
            Submission::Submitted { hours, .. } if (hours - 0.02).abs() < 1e-9
        ));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_issue_id_keeps_session_idle() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_get_issue()
            .with(eq("abc"))
            .times(1)
            .returning(|_| Err(not_found()));
        api.expect_add_time_entry().times(0);

        let session = create_session(true, api);
        let selection = Some(RedmineSelection::IssueId {
            id: "abc".to_string(),
            activity: Some("Development".to_string()),
        });
        let result = session
            .start_tracking(start_request(selection, Duration::zero()))
            .await;

        assert!(matches!(result, Err(HamsterError::InvalidIssueId(id)) if id == "abc"));
        assert!(session.current_fact()?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn arbitrary_issue_id_uses_id_from_server() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_get_issue()
            .with(eq("42"))
            .times(1)
            .returning(|_| {
                Ok(Issue {
                    id: 42,
                    subject: "Not assigned to me".to_string(),
                })
            });
        api.expect_list_activities().returning(|| Ok(activities()));

        let session = create_session(true, api);
        let selection = Some(RedmineSelection::IssueId {
            id: "42".to_string(),
            activity: Some("Development".to_string()),
        });
        let fact = session
            .start_tracking(start_request(selection, Duration::zero()))
            .await?;
        assert_eq!(fact.redmine_issue_id, Some(42));
        assert_eq!(fact.redmine_activity_id, Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn missing_activity_is_rejected() -> Result<(), HamsterError> {
        let api = MockRedmineApiImpl::new();
        let session = create_session(true, api);
        let selection = Some(RedmineSelection::Issue {
            subject: "Fix bug".to_string(),
            activity: Some("  ".to_string()),
        });

        let result = session
            .start_tracking(start_request(selection, Duration::zero()))
            .await;
        assert!(matches!(result, Err(HamsterError::MissingRedmineActivity)));
        assert!(session.current_fact()?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_subject_is_rejected() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_list_assigned_issues().returning(|| Ok(issues()));

        let session = create_session(true, api);
        let selection = Some(RedmineSelection::Issue {
            subject: "Write docs".to_string(),
            activity: Some("Development".to_string()),
        });
        let result = session
            .start_tracking(start_request(selection, Duration::zero()))
            .await;
        assert!(matches!(result, Err(HamsterError::UnknownIssue(s)) if s == "Write docs"));
        Ok(())
    }

    #[tokio::test]
    async fn disabled_integration_ignores_selection() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_list_assigned_issues().times(0);
        api.expect_add_time_entry().times(0);

        let session = create_session(false, api);
        let fact = session
            .start_tracking(start_request(fix_bug_selection(), Duration::hours(2)))
            .await?;
        assert!(fact.redmine_issue_id.is_none());

        let outcome = session.stop_tracking(None).await?;
        assert!(matches!(outcome.submission, Submission::Disabled));
        Ok(())
    }

    #[tokio::test]
    async fn unlinked_fact_is_not_submitted() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_add_time_entry().times(0);

        let session = create_session(true, api);
        session
            .start_tracking(start_request(None, Duration::hours(1)))
            .await?;
        let outcome = session.stop_tracking(None).await?;
        assert!(matches!(outcome.submission, Submission::NotLinked));
        Ok(())
    }

    #[tokio::test]
    async fn failed_submission_still_stops() -> Result<(), HamsterError> {
        let mut api = MockRedmineApiImpl::new();
        api.expect_list_assigned_issues().returning(|| Ok(issues()));
        api.expect_list_activities().returning(|| Ok(activities()));
        api.expect_add_time_entry()
            .times(1)
            .returning(|_, _, _, _| Err(RedmineError::Action("Hours is invalid".to_string())));

        let session = create_session(true, api);
        session
            .start_tracking(start_request(fix_bug_selection(), Duration::hours(1)))
            .await?;
        let outcome = session.stop_tracking(None).await?;

        assert!(matches!(
            outcome.submission,
            Submission::Failed(HamsterError::Redmine(RedmineError::Action(_)))
        ));
        assert!(outcome.fact.end_time.is_some());
        assert!(session.current_fact()?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn second_start_is_rejected() -> Result<(), HamsterError> {
        let session = create_session(false, MockRedmineApiImpl::new());
        session
            .start_tracking(start_request(None, Duration::zero()))
            .await?;
        let result = session
            .start_tracking(start_request(None, Duration::zero()))
            .await;
        assert!(matches!(result, Err(HamsterError::ActiveFactExists)));
        assert_eq!(session.todays_facts()?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn stop_without_active_fact() {
        let session = create_session(true, MockRedmineApiImpl::new());
        assert!(matches!(
            session.stop_tracking(None).await,
            Err(HamsterError::NoActiveFact)
        ));
    }

    #[tokio::test]
    async fn listings_require_integration() {
        let session = create_session(false, MockRedmineApiImpl::new());
        assert!(matches!(
            session.assigned_issues().await,
            Err(HamsterError::RedmineIntegrationDisabled)
        ));
        assert!(matches!(
            session.activities().await,
            Err(HamsterError::RedmineIntegrationDisabled)
        ));
    }
}
