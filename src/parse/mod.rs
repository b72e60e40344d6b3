pub mod task_parser;

pub use task_parser::{parse_tasks, parse_title_and_tags};
