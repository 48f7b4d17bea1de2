use crate::config::{initialize_config_file, DEFAULT_CONFIG_FILE};

pub fn handle_init_command() {
    match initialize_config_file(None) {
        Ok(true) => println!("Created {}", DEFAULT_CONFIG_FILE),
        Ok(false) => println!("{} already exists, left unchanged", DEFAULT_CONFIG_FILE),
        Err(e) => {
            eprintln!("Error during initialization: {}", e);
            std::process::exit(1);
        }
    }
}
