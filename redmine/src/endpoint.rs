//! Connection parameters of a single Redmine server, derived from its base URL.

use std::fmt::{self, Formatter};

use url::Url;

use crate::RedmineError;

/// Scheme used to talk to the Redmine server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    #[must_use]
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// Everything needed to address the Redmine REST interface.
///
/// `path_prefix` always starts and ends with a `/`, so the resource names like
/// `users/current.json` may be appended directly.
#[derive(Clone, PartialEq, Eq)]
pub struct RedmineEndpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path_prefix: String,
    pub api_key: String,
}

impl RedmineEndpoint {
    /// Derives the endpoint from a base URL like `https://redmine.example.com/tracker/`
    ///
    /// # Errors
    /// Returns an error if the URL can not be parsed, has no host or uses a scheme other
    /// than `http` or `https`.
    pub fn parse(base_url: &str, api_key: &str) -> Result<RedmineEndpoint, RedmineError> {
        let url = Url::parse(base_url.trim())?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => return Err(RedmineError::UnsupportedScheme(other.to_string())),
        };
        let host = url
            .host_str()
            .ok_or_else(|| RedmineError::InvalidUrl(url::ParseError::EmptyHost))?
            .to_string();
        let port = url.port().unwrap_or_else(|| scheme.default_port());

        let mut path_prefix = url.path().to_string();
        if path_prefix.is_empty() {
            path_prefix.push('/');
        }
        if !path_prefix.ends_with('/') {
            path_prefix.push('/');
        }

        Ok(RedmineEndpoint {
            scheme,
            host,
            port,
            path_prefix,
            api_key: api_key.to_string(),
        })
    }

    /// The URL of the supplied resource, which is relative to the path prefix
    ///
    /// # Errors
    /// Returns an error if the resulting URL is not valid
    pub fn url_for(&self, resource: &str) -> Result<Url, RedmineError> {
        let url = format!(
            "{}://{}:{}{}{}",
            self.scheme,
            self.host,
            self.port,
            self.path_prefix,
            resource.trim_start_matches('/')
        );
        Ok(Url::parse(&url)?)
    }
}

// The api key is a secret and must never end up in the log files
impl fmt::Debug for RedmineEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedmineEndpoint")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path_prefix", &self.path_prefix)
            .field("api_key", &"***")
            .finish()
    }
}
