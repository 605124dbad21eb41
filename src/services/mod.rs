// Service exports
pub mod activity;

pub use activity::{ActivityClient, ActivityError};
