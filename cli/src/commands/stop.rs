use hamster::date;
use hamster::error::HamsterError;
use hamster::service::tracking::Submission;

use crate::cli::Stop;
use crate::get_runtime;

pub async fn execute(stop: Stop) -> Result<(), HamsterError> {
    let end_time = stop
        .at
        .as_deref()
        .map(date::str_to_date_time)
        .transpose()?;

    let outcome = get_runtime()
        .tracking_session()
        .stop_tracking(end_time)
        .await?;
    let duration = outcome.fact.duration().map_or(0, |d| d.num_seconds());
    println!(
        "Stopped tracking {}, duration: {}",
        outcome.fact,
        date::seconds_to_hour_and_min(duration)
    );

    match outcome.submission {
        Submission::Submitted {
            issue_id, hours, ..
        } => println!("Registered {hours} hours on Redmine issue #{issue_id}"),
        Submission::TooShort { hours } => {
            println!("Only {hours:.3} hours spent, nothing registered in Redmine");
        }
        Submission::Failed(HamsterError::Redmine(e)) if e.is_action_error() => {
            eprintln!("ERROR: Redmine rejected the time entry, register it manually: {e}");
        }
        Submission::Failed(e) => {
            eprintln!("ERROR: Unable to register the time spent in Redmine: {e}");
        }
        Submission::Disabled | Submission::NotLinked => {}
    }
    Ok(())
}
