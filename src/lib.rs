pub mod cli;
pub mod io;
pub mod model;
pub mod parse;
pub mod tree;
pub mod tui;
pub mod util;
