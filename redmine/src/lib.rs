//!
//! `redmine` is a small client for the Redmine REST interface.
//!
//! Only the resources needed for time tracking are covered: the current user, the issues
//! assigned to the current user, the time entry activities and the creation of time
//! entries.
//!
//! Every call is fire-once: no retries, no caching and no pooled connections.
use std::time::Duration;

use log::debug;
use hyper::ext::ReasonPhrase;
use reqwest::{
    header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use config::RedmineClientConfiguration;
use endpoint::RedmineEndpoint;
use models::{
    activity::{self, ActivityType, TimeEntryActivities},
    issue::{self, Issue, IssuesPage, SingleIssue},
    time_entry::{NewTimeEntry, TimeEntry},
    user::CurrentUser,
};

pub mod builder;
pub mod config;
pub mod endpoint;
pub mod models;

pub use reqwest::StatusCode;

type Result<T> = std::result::Result<T, RedmineError>;

/// Name of the header carrying the Redmine API key
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// Connect and read timeout applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum RedmineError {
    /// The server replied with a status we did not expect
    #[error("HTTP replied: {} {}", .code.as_u16(), .reason)]
    Connection { code: StatusCode, reason: String },
    /// The request never produced a response
    #[error("Unable to reach Redmine: {0}")]
    Transport(#[from] reqwest::Error),
    /// Redmine refused the request as semantically invalid (422). Holds the raw body.
    #[error("Error while adding the time entry: Unprocessable Entity: {0}")]
    Action(String),
    #[error("Could not serialize/deserialize: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid Redmine URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported URL scheme '{0}', use http or https")]
    UnsupportedScheme(String),
}

impl RedmineError {
    /// Transport failures and unexpected HTTP status codes are connection errors, which
    /// the user can do nothing about except trying again later.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            RedmineError::Connection { .. } | RedmineError::Transport(_)
        )
    }

    #[must_use]
    pub fn is_action_error(&self) -> bool {
        matches!(self, RedmineError::Action(_))
    }

    fn from_reply(reply: Reply) -> Self {
        RedmineError::Connection {
            code: reply.status,
            reason: reply.reason,
        }
    }
}

/// What came back from a single request
struct Reply {
    status: StatusCode,
    /// The reason phrase sent by the server, or the canonical one
    reason: String,
    body: String,
}

/// Servers may send their own reason phrase, i.e. `520 Origin Error`
fn reason_phrase(response: &Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or("Unknown")
        .to_string()
}

#[derive(Clone, Debug)]
pub struct Redmine {
    endpoint: RedmineEndpoint,
    client: Client,
}

impl Redmine {
    /// Creates a client for the Redmine server found at `url`, authenticating with `api_key`
    ///
    /// # Errors
    /// Returns an error if the url is not a valid http(s) URL or if the HTTP client could
    /// not be initialised.
    pub fn new<U>(url: U, api_key: &str) -> Result<Redmine>
    where
        U: AsRef<str>,
    {
        let endpoint = RedmineEndpoint::parse(url.as_ref(), api_key)?;
        let client = http_client(DEFAULT_TIMEOUT)?;
        Ok(Redmine { endpoint, client })
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn from(cfg: &RedmineClientConfiguration) -> Result<Redmine> {
        Redmine::new(&cfg.url, &cfg.api_key)
    }

    pub(crate) fn with_client(endpoint: RedmineEndpoint, client: Client) -> Redmine {
        Redmine { endpoint, client }
    }

    #[must_use]
    pub fn endpoint(&self) -> &RedmineEndpoint {
        &self.endpoint
    }

    /// Sends a single request and hands back the status together with the body
    async fn request(
        &self,
        method: Method,
        resource: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Reply> {
        let url = self.endpoint.url_for(resource)?;
        // Not the request builder, the headers hold the api key
        debug!("request {method} '{url}'");

        let mut request = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, &self.endpoint.api_key)
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .header(CONTENT_LENGTH, body.len())
                .body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let reason = reason_phrase(&response);
        let body = response.text().await?;
        debug!("status {:?} body '{:?}'", status, body);

        Ok(Reply {
            status,
            reason,
            body,
        })
    }

    async fn get<D>(&self, resource: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let reply = self.request(Method::GET, resource, None).await?;
        match reply.status {
            StatusCode::OK => Ok(serde_json::from_str::<D>(&reply.body)?),
            _ => Err(RedmineError::from_reply(reply)),
        }
    }

    /// Id of the user owning the API key
    #[allow(clippy::missing_errors_doc)]
    pub async fn resolve_current_user(&self) -> Result<u64> {
        let current = self.get::<CurrentUser>("users/current.json").await?;
        Ok(current.user.id)
    }

    /// Checks the URL and API key by resolving the current user.
    ///
    /// # Errors
    /// Connection errors are reported as `Ok(false)`, only errors like an unparseable
    /// response are returned.
    pub async fn check_connection(&self) -> Result<bool> {
        match self.resolve_current_user().await {
            Ok(_) => Ok(true),
            Err(err) if err.is_connection_error() => {
                debug!("Redmine connection check failed: {err}");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Issues assigned to the current user
    #[allow(clippy::missing_errors_doc)]
    pub async fn list_assigned_issues(&self) -> Result<Vec<Issue>> {
        let user_id = self.resolve_current_user().await?;
        let page = self
            .get::<IssuesPage>(&format!("issues.json?assigned_to_id={user_id}"))
            .await?;
        debug!("Retrieved {} issues assigned to user {}", page.issues.len(), user_id);
        Ok(page.issues)
    }

    /// Retrieves a single issue. Any id typed in by a user may be supplied, an
    /// unknown or malformed one results in a connection error.
    #[allow(clippy::missing_errors_doc)]
    pub async fn get_issue(&self, issue_id: &str) -> Result<Issue> {
        let resource = format!("issues/{}.json", urlencoding::encode(issue_id.trim()));
        let single = self.get::<SingleIssue>(&resource).await?;
        Ok(single.issue)
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn list_activities(&self) -> Result<Vec<ActivityType>> {
        let activities = self
            .get::<TimeEntryActivities>("enumerations/time_entry_activities.json")
            .await?;
        Ok(activities.time_entry_activities)
    }

    /// Registers `hours` spent today on the issue.
    ///
    /// # Errors
    /// A 422 reply results in `RedmineError::Action` holding the response body, any
    /// other reply than 201 in `RedmineError::Connection`.
    pub async fn add_time_entry(
        &self,
        issue_id: u64,
        hours: f64,
        activity_id: u64,
        comments: &str,
    ) -> Result<bool> {
        let time_entry = TimeEntry::new(issue_id, hours, activity_id, comments);
        let data = serde_json::to_string(&NewTimeEntry { time_entry })?;
        debug!("Sending: {data}");

        let reply = self
            .request(Method::POST, "time_entries.json", Some(data.into_bytes()))
            .await?;
        match reply.status {
            StatusCode::CREATED => Ok(true),
            StatusCode::UNPROCESSABLE_ENTITY => Err(RedmineError::Action(reply.body)),
            _ => Err(RedmineError::from_reply(reply)),
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn find_activity_id_by_name(&self, name: &str) -> Result<Option<u64>> {
        let activities = self.list_activities().await?;
        Ok(activity::find_id_by_name(&activities, name))
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn find_issue_id_by_subject(&self, subject: &str) -> Result<Option<u64>> {
        let issues = self.list_assigned_issues().await?;
        Ok(issue::find_id_by_subject(&issues, subject))
    }
}

/// Idle connections are never kept, every request opens a fresh one
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .build()?)
}
