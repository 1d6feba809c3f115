use hamster::date;
use hamster::error::HamsterError;
use hamster::service::tracking::{RedmineSelection, StartRequest};

use crate::cli::Start;
use crate::get_runtime;

pub async fn execute(start: Start) -> Result<(), HamsterError> {
    let start_time = start
        .at
        .as_deref()
        .map(date::str_to_date_time)
        .transpose()?;

    let redmine = match (start.issue, start.issue_id) {
        (Some(subject), _) => Some(RedmineSelection::Issue {
            subject,
            activity: start.activity,
        }),
        (None, Some(id)) => Some(RedmineSelection::IssueId {
            id,
            activity: start.activity,
        }),
        (None, None) => None,
    };

    let runtime = get_runtime();
    match runtime
        .tracking_session()
        .start_tracking(StartRequest {
            fact: start.fact,
            tags: start.tags,
            start_time,
            redmine,
        })
        .await
    {
        Ok(fact) => {
            println!(
                "Started tracking {} at {}",
                fact,
                fact.start_time.format("%Y-%m-%d %H:%M")
            );
            if !fact.tags.is_empty() {
                println!("Tags: {}", fact.tags.join(", "));
            }
        }
        Err(e @ HamsterError::ActiveFactExists) => {
            if let Ok(Some(current)) = runtime.tracking_session().current_fact() {
                eprintln!("Currently tracking {current}, use 'hamster stop' first");
            }
            return Err(e);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
