pub mod calendar;
pub mod filter;
pub mod task_ops;
