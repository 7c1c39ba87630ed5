use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Group, Location};

/// A scheduled session with a type, time range, location, and associated
/// groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TrainingType,
    pub location: Location,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Training {
    /// Ids of the groups currently associated with this training, in the
    /// order the server returned them.
    pub fn group_ids(&self) -> Vec<i64> {
        self.groups.iter().map(|group| group.id).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingType {
    #[serde(rename = "Off Ice")]
    OffIce,
    Ice,
    Ballet,
}

impl TrainingType {
    pub const ALL: [TrainingType; 3] = [TrainingType::OffIce, TrainingType::Ice, TrainingType::Ballet];
}

impl std::fmt::Display for TrainingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingType::OffIce => write!(f, "Off Ice"),
            TrainingType::Ice => write!(f, "Ice"),
            TrainingType::Ballet => write!(f, "Ballet"),
        }
    }
}

impl std::str::FromStr for TrainingType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off ice" | "off-ice" | "office" => Ok(TrainingType::OffIce),
            "ice" => Ok(TrainingType::Ice),
            "ballet" => Ok(TrainingType::Ballet),
            _ => Err(anyhow::anyhow!("Invalid training type: {}", s)),
        }
    }
}

/// Filter criteria for listing trainings
#[derive(Debug, Default)]
pub struct TrainingFilter {
    pub location_id: Option<i64>,
    pub group_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TrainingFilter {
    pub fn matches(&self, training: &Training) -> bool {
        if let Some(location_id) = self.location_id {
            if training.location.id != location_id {
                return false;
            }
        }

        if let Some(group_id) = self.group_id {
            if !training.groups.iter().any(|group| group.id == group_id) {
                return false;
            }
        }

        if let Some(from) = self.from {
            if training.start_time < from {
                return false;
            }
        }

        if let Some(to) = self.to {
            if training.start_time > to {
                return false;
            }
        }

        true
    }
}
