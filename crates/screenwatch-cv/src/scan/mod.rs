//! Periodic scan loop

pub mod config;
pub mod scanner;

pub use config::ScanConfig;
pub use scanner::Scanner;
