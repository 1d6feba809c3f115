use std::sync::Arc;

use hamster::config::StaticConfiguration;
use hamster::{error::HamsterError, ApplicationRuntime, ApplicationRuntimeBuilder};

use crate::test_helpers::fixtures::redmine_settings;

/// Creates a test runtime with an in memory database, talking to the Redmine server at `url`
pub fn create_test_runtime(
    url: &str,
    integration_enabled: bool,
) -> Result<(ApplicationRuntime, Arc<StaticConfiguration>), HamsterError> {
    let configuration = Arc::new(StaticConfiguration::new(redmine_settings(
        url,
        integration_enabled,
    )));

    let runtime = ApplicationRuntimeBuilder::new()
        .use_in_memory_db()
        .with_configuration(configuration.clone())
        .build()?;

    Ok((runtime, configuration))
}
