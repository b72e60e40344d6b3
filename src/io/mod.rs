pub mod config_io;
pub mod state;
pub mod store;
pub mod task_io;
pub mod watcher;
