pub mod achievement;
pub mod clock;
pub mod collaborator;
pub mod config;
pub mod content;
pub mod day;
pub mod error;
pub mod io;
pub mod journey;
pub mod paths;
pub mod pomodoro;
pub mod reflection;
pub mod reminder;
pub mod store;
pub mod types;
pub mod unlock;
pub mod usage;

pub use error::{JourneyError, Result};
