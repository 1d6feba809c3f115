pub mod redmine_client;
