pub mod config;
pub mod node;
pub mod project_tree;
pub mod task;

pub use config::*;
pub use node::*;
pub use project_tree::*;
pub use task::*;
