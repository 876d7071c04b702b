use std::process::ExitCode;

use clap::Parser;

mod boot;
mod calendar;
mod cli;
mod config;
mod confirm;
mod db;
mod guestbook;
mod lazy;
mod models;
mod mood;
mod nav;
mod notify;
mod render;
mod store;
mod visitors;


use config::SiteConfig;
use store::{MemoryStorage, SqliteStorage, Storage};

fn main() -> ExitCode {
    env_logger::init();

    let cli = cli::Cli::parse();

    let config = match SiteConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Boot check: create directories, validate settings
    boot::run(&config, cli.ephemeral);

    let storage: Box<dyn Storage> = if cli.ephemeral {
        Box::new(MemoryStorage::new())
    } else {
        match SqliteStorage::open(&config.database) {
            Ok(s) => Box::new(s),
            Err(e) => {
                eprintln!("Failed to open storage at {}: {}", config.database, e);
                return ExitCode::FAILURE;
            }
        }
    };

    match cli::run(&cli, &config, storage.as_ref()) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
