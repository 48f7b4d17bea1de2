pub mod adapters;
pub mod init;
pub mod reset;
pub mod scan;

pub use adapters::handle_adapters_command;
pub use init::handle_init_command;
pub use reset::handle_reset_command;
pub use scan::{handle_scan_command, ScanArgs};
