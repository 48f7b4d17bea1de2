pub mod error;
pub mod fallback;
pub mod orchestrator;
pub mod registry;
pub mod session;

pub use orchestrator::Orchestrator;
pub use session::{purge_scratch_base, ScanSession};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
