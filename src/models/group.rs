use serde::{Deserialize, Serialize};

use crate::models::Training;

/// A named collection of members and coaches that can be assigned to
/// trainings. The association lists are populated only when the server
/// chooses to expand them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub coaches: Vec<Coach>,
    #[serde(default)]
    pub trainings: Vec<Training>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub id: i64,
    pub name: String,
}
