pub mod blob_store;
pub mod config_io;
pub mod state;
pub mod task_io;
