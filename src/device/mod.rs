pub mod bridge;
pub mod logs;

pub use bridge::DeviceBridge;
pub use logs::{analyze_logs, capture_runtime_logs};
