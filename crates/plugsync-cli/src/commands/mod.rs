//! Command implementations for plugsync-cli

pub mod config;
pub mod doctor;
pub mod scan;
pub mod sync;

pub use config::{run_config_init, run_config_show, run_set_token};
pub use doctor::run_doctor;
pub use scan::run_scan;
pub use sync::run_sync;
