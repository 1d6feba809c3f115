pub mod activity;
pub mod issue;
pub mod time_entry;
pub mod user;
