use serde::{Deserialize, Serialize};

/// A physical venue a training can be scheduled at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
}
