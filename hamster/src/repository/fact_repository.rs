use crate::error::HamsterError;
use crate::types::Fact;
use chrono::{DateTime, Local};

/// Persistence of the facts tracked locally.
///
/// At most one fact may be open (have no end time) at any time.
pub trait FactRepository: Send + Sync {
    /// Stores a new fact and returns the id assigned to it.
    ///
    /// # Errors
    /// * `HamsterError::ActiveFactExists` if `fact` is open and another open fact exists
    fn add_fact(&self, fact: &Fact) -> Result<i64, HamsterError>;

    /// Facts started today, together with the running fact, ordered by start time
    #[allow(clippy::missing_errors_doc)]
    fn get_todays_facts(&self) -> Result<Vec<Fact>, HamsterError>;

    #[allow(clippy::missing_errors_doc)]
    fn find_active_fact(&self) -> Result<Option<Fact>, HamsterError>;

    /// Closes the running fact at `end_time` and returns it.
    ///
    /// # Errors
    /// * `HamsterError::NoActiveFact` if nothing is being tracked
    /// * `HamsterError::BadInput` if `end_time` is before the start of the fact
    fn stop_tracking(&self, end_time: DateTime<Local>) -> Result<Fact, HamsterError>;
}
