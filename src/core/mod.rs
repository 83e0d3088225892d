pub mod catalog;
pub mod chain;
pub mod mentor;
pub mod progress;
pub mod quiz;
pub mod roadmap;
pub mod stress;
pub mod timetable;

pub use crate::domain::model::{TimetablePlan, TimetableRequest};
pub use crate::domain::ports::{BackendStore, ConfigProvider};
pub use crate::utils::error::Result;
