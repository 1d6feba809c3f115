//! Creates a client for the Redmine instance used for integration testing.
//!
//! The instance is named by the environment variables `REDMINE_URL` and `REDMINE_API_KEY`.
use redmine::builder::RedmineBuilder;
use redmine::Redmine;

pub fn create_redmine_client() -> Redmine {
    RedmineBuilder::create_from_env().expect(
        "Unable to create the Redmine client. Set REDMINE_URL to something like \
         'https://redmine.example.com/' and REDMINE_API_KEY to your API access key",
    )
}
