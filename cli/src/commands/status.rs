use chrono::Local;
use hamster::date;
use hamster::error::HamsterError;

use crate::get_runtime;

pub fn execute() -> Result<(), HamsterError> {
    let runtime = get_runtime();
    let session = runtime.tracking_session();
    let now = Local::now();

    let facts = session.todays_facts()?;
    if facts.is_empty() {
        println!("Nothing tracked today");
    } else {
        println!("{:5} {:5} {:6} Activity", "Start", "End", "Time");
        let mut total = 0;
        for fact in &facts {
            let elapsed = fact.elapsed(now).num_seconds();
            total += elapsed;
            println!(
                "{:5} {:5} {:6} {}",
                fact.start_time.format("%H:%M").to_string(),
                fact.end_time
                    .map_or_else(String::new, |end| end.format("%H:%M").to_string()),
                date::seconds_to_hour_and_min(elapsed),
                fact
            );
        }
        println!("Total {}", date::seconds_to_hour_and_min(total));
    }
    println!();

    match session.current_fact()? {
        Some(fact) => println!(
            "Tracking {}, started at {} and current elapsed time is {}",
            fact,
            fact.start_time.format("%Y-%m-%d %H:%M"),
            date::seconds_to_hour_and_min(fact.elapsed(now).num_seconds())
        ),
        None => println!("No activity"),
    }
    Ok(())
}
