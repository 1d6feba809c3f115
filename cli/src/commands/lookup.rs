use hamster::error::HamsterError;

use crate::get_runtime;

pub async fn list_issues() -> Result<(), HamsterError> {
    let issues = get_runtime().tracking_session().assigned_issues().await?;
    if issues.is_empty() {
        println!("No issues assigned to you");
    }
    for issue in issues {
        println!("{:>7} {}", issue.id, issue.subject);
    }
    Ok(())
}

pub async fn list_activities() -> Result<(), HamsterError> {
    for activity in get_runtime().tracking_session().activities().await? {
        let default = if activity.is_default { " (default)" } else { "" };
        println!("{:>4} {}{}", activity.id, activity.name, default);
    }
    Ok(())
}

pub async fn check() -> Result<(), HamsterError> {
    if get_runtime().tracking_session().check_connection().await? {
        println!("Connection to Redmine OK");
    } else {
        println!("Unable to connect to Redmine, check the url and API key");
    }
    Ok(())
}
