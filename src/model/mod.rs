pub mod calendar;
pub mod config;
pub mod task;

pub use calendar::*;
pub use config::*;
pub use task::*;
