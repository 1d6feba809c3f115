use serde::{Deserialize, Serialize};

/// Wrapper returned by `users/current.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user: User,
}

/// Only the id is needed, to find the issues assigned to the user
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
}
