use crate::config::{load_config, ConfigOverrides};
use crate::core::purge_scratch_base;
use std::path::PathBuf;

/// Explicit reset: removes every session's scratch data.
pub fn handle_reset_command(config_path: Option<PathBuf>) {
    let config = match load_config(config_path, ConfigOverrides::default()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    match purge_scratch_base(&config.scratch_dir) {
        Ok(true) => println!("Removed {}", config.scratch_dir.display()),
        Ok(false) => println!("Nothing to reset"),
        Err(e) => {
            eprintln!("Error removing {}: {}", config.scratch_dir.display(), e);
            std::process::exit(1);
        }
    }
}
