use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use grove::cli::commands::Cli;
use grove::cli::handlers;
use grove::io::config_io::read_config;
use grove::io::store::FileStore;
use grove::io::task_io::{state_dir_for, state_file_for};
use grove::util::logging;

const DEFAULT_CONFIG: &str = "grove.toml";

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = match read_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let task_file = match &cli.command {
        None => cli.file.clone(),
        Some(_) => None,
    };
    let log_dir = state_dir_for(
        task_file.as_deref().unwrap_or(Path::new(".")),
        cli.state_dir.as_deref(),
    );

    match task_file {
        Some(file) => {
            let _log_guard = logging::init(&log_dir);
            let store = Rc::new(FileStore::new(state_file_for(
                &file,
                cli.state_dir.as_deref(),
            )));
            if let Err(e) = grove::tui::run(&file, &config, store) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            // Only log CLI runs when a directory was asked for
            let _log_guard = cli.state_dir.is_some().then(|| logging::init(&log_dir)).flatten();
            if let Err(e) = handlers::dispatch(cli, &config) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
