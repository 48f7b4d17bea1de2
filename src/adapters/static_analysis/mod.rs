pub mod androguard;
pub mod mobsf;
pub mod qark;

pub use androguard::AndroguardAdapter;
pub use mobsf::MobsfAdapter;
pub use qark::QarkAdapter;
