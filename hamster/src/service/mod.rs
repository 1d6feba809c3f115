pub mod redmine_api;
pub mod tracking;
