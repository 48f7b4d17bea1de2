pub mod burp;
pub mod device;
pub mod zap;

pub use burp::BurpAdapter;
pub use device::DeviceAutomationAdapter;
pub use zap::ZapAdapter;
