pub mod group;
pub mod location;
pub mod training;

pub use group::{Coach, Group, User};
pub use location::Location;
pub use training::{Training, TrainingFilter, TrainingType};
