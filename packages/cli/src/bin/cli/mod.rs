pub mod insights;
pub mod session;
